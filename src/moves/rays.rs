//! Sliding piece attacks computed by sweeping rays against an occupancy mask.
//!
//! The teacher engine precomputes magic-bitboard tables for this; magic numbers and the
//! machinery to find them are out of scope for a search-core reimplementation, so this
//! walks each of the (at most) four directions per piece one square at a time and stops
//! at the first blocker. It is asymptotically slower than a magic lookup but behaviorally
//! identical, which is all the search core's collaborator contract requires.

use crate::types::bitboard::Bitboard;
use crate::types::square::Square;

const ROOK_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

fn sweep(sq: Square, occupied: Bitboard, dirs: [(i32, i32); 4]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    let (f0, r0) = (sq.file() as i32, sq.rank() as i32);
    for (df, dr) in dirs {
        let (mut f, mut r) = (f0 + df, r0 + dr);
        while (0..8).contains(&f) && (0..8).contains(&r) {
            let target = Square::new(f as u8, r as u8);
            attacks |= target.bitboard();
            if occupied.occupied(target) {
                break;
            }
            f += df;
            r += dr;
        }
    }
    attacks
}

pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    sweep(sq, occupied, ROOK_DIRS)
}

pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    sweep(sq, occupied, BISHOP_DIRS)
}

pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_stops_at_first_blocker() {
        let sq = Square::new(3, 3);
        let blocker = Square::new(3, 5);
        let occ = blocker.bitboard();
        let attacks = rook_attacks(sq, occ);
        assert!(attacks.occupied(blocker));
        assert!(!attacks.occupied(Square::new(3, 6)));
    }

    #[test]
    fn bishop_attacks_all_four_diagonals_when_open() {
        let sq = Square::new(3, 3);
        let attacks = bishop_attacks(sq, Bitboard::EMPTY);
        assert!(attacks.occupied(Square::new(0, 0)));
        assert!(attacks.occupied(Square::new(7, 7)));
        assert!(attacks.occupied(Square::new(0, 6)));
        assert!(attacks.occupied(Square::new(6, 0)));
    }
}
