//! Static exchange evaluation: used by the move picker to separate winning from losing
//! captures without needing a full search. Implements the standard "swap" algorithm —
//! walk the capture sequence on the target square, least-valuable-attacker first, then
//! fold the per-ply gains back up assuming each side stops recapturing when it's no
//! longer profitable.

use crate::board::board::Board;
use crate::moves::moves::Move;
use crate::types::bitboard::Bitboard;
use crate::types::pieces::{Color, Piece, PieceName};
use crate::types::square::Square;

const MAX_DEPTH: usize = 32;

fn least_valuable_attacker(board: &Board, attackers: Bitboard, by: Color) -> Option<(Square, PieceName)> {
    for name in [
        PieceName::Pawn,
        PieceName::Knight,
        PieceName::Bishop,
        PieceName::Rook,
        PieceName::Queen,
        PieceName::King,
    ] {
        let candidates = attackers & board.bitboard(by, name);
        if !candidates.is_empty() {
            return Some((candidates.lsb(), name));
        }
    }
    None
}

/// Returns whether the capture sequence starting with `mv` nets at least `threshold`
/// centipawns for the side to move, assuming both sides always recapture with their
/// least valuable attacker and stop as soon as recapturing stops being profitable.
pub fn see(board: &Board, mv: Move, threshold: i32) -> bool {
    let to = mv.to();
    let Some(mut attacker) = board.piece_at(mv.from()) else { return 0 >= threshold };

    let mut gain = [0i32; MAX_DEPTH];
    gain[0] = if mv.is_en_passant() {
        PieceName::Pawn.value()
    } else {
        board.piece_at(to).map_or(0, Piece::value)
    };

    let mut occ = board.occupied();
    occ ^= mv.from().bitboard();
    if mv.is_en_passant() {
        occ ^= Square::new(to.file(), mv.from().rank()).bitboard();
    }

    let mut side = !board.stm;
    let mut depth = 0;
    while depth + 1 < MAX_DEPTH {
        // Masking by `occ` discards pieces this loop has already "moved" — their bitboard
        // entry on the real board is untouched, only their presence in the simulated
        // occupancy is, so candidacy must be checked against `occ`, not just attack reach.
        let attackers_here = board.attackers_to(to, occ, side) & occ;
        let Some((from, name)) = least_valuable_attacker(board, attackers_here, side) else {
            break;
        };
        depth += 1;
        gain[depth] = attacker.value() - gain[depth - 1];
        if gain[depth].max(-gain[depth - 1]) < 0 {
            break;
        }
        occ ^= from.bitboard();
        attacker = Piece::new(name, side);
        side = !side;
    }

    while depth > 0 {
        gain[depth - 1] = -gain[depth].max(-gain[depth - 1]);
        depth -= 1;
    }
    gain[0] >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::from_fen;

    #[test]
    fn pawn_takes_defended_queen_is_winning() {
        let board = from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let mv = Move::new(Square::from_str("e4").unwrap(), Square::from_str("d5").unwrap(), true);
        assert!(see(&board, mv, 0));
    }

    #[test]
    fn queen_takes_pawn_defended_by_pawn_is_losing() {
        let board = from_fen("4k3/8/2p5/3p4/4Q3/8/8/4K3 w - - 0 1").unwrap();
        let mv = Move::new(Square::from_str("e4").unwrap(), Square::from_str("d5").unwrap(), true);
        assert!(!see(&board, mv, 0));
    }
}
