use crate::types::bitboard::Bitboard;
use crate::types::square::Square;

const FILE_A_U64: u64 = 0x0101_0101_0101_0101;
const RANK1_U64: u64 = 0xff;

pub const FILE_A: Bitboard = Bitboard(FILE_A_U64);
pub const FILE_H: Bitboard = Bitboard(FILE_A_U64 << 7);

pub const RANK1: Bitboard = Bitboard(RANK1_U64);
pub const RANK2: Bitboard = Bitboard(RANK1_U64 << 8);
pub const RANK4: Bitboard = Bitboard(RANK1_U64 << 24);
pub const RANK5: Bitboard = Bitboard(RANK1_U64 << 32);
pub const RANK7: Bitboard = Bitboard(RANK1_U64 << 48);
pub const RANK8: Bitboard = Bitboard(RANK1_U64 << 56);

fn knight_attacks_from(sq: Square) -> Bitboard {
    let f = sq.file() as i32;
    let r = sq.rank() as i32;
    const DELTAS: [(i32, i32); 8] =
        [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
    let mut bb = Bitboard::EMPTY;
    for (df, dr) in DELTAS {
        let (nf, nr) = (f + df, r + dr);
        if (0..8).contains(&nf) && (0..8).contains(&nr) {
            bb |= Square::new(nf as u8, nr as u8).bitboard();
        }
    }
    bb
}

fn king_attacks_from(sq: Square) -> Bitboard {
    let f = sq.file() as i32;
    let r = sq.rank() as i32;
    let mut bb = Bitboard::EMPTY;
    for df in -1..=1 {
        for dr in -1..=1 {
            if df == 0 && dr == 0 {
                continue;
            }
            let (nf, nr) = (f + df, r + dr);
            if (0..8).contains(&nf) && (0..8).contains(&nr) {
                bb |= Square::new(nf as u8, nr as u8).bitboard();
            }
        }
    }
    bb
}

fn pawn_attacks_from(sq: Square, side: crate::types::pieces::Color) -> Bitboard {
    use crate::types::pieces::Color;
    let f = sq.file() as i32;
    let r = sq.rank() as i32;
    let dr = if side == Color::White { 1 } else { -1 };
    let mut bb = Bitboard::EMPTY;
    for df in [-1, 1] {
        let (nf, nr) = (f + df, r + dr);
        if (0..8).contains(&nf) && (0..8).contains(&nr) {
            bb |= Square::new(nf as u8, nr as u8).bitboard();
        }
    }
    bb
}

lazy_static::lazy_static! {
    static ref KNIGHT_ATTACKS: [Bitboard; 64] = {
        let mut t = [Bitboard::EMPTY; 64];
        for sq in Square::iter() {
            t[sq.idx()] = knight_attacks_from(sq);
        }
        t
    };
    static ref KING_ATTACKS: [Bitboard; 64] = {
        let mut t = [Bitboard::EMPTY; 64];
        for sq in Square::iter() {
            t[sq.idx()] = king_attacks_from(sq);
        }
        t
    };
    static ref PAWN_ATTACKS: [[Bitboard; 64]; 2] = {
        let mut t = [[Bitboard::EMPTY; 64]; 2];
        for sq in Square::iter() {
            t[0][sq.idx()] = pawn_attacks_from(sq, crate::types::pieces::Color::White);
            t[1][sq.idx()] = pawn_attacks_from(sq, crate::types::pieces::Color::Black);
        }
        t
    };
}

pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.idx()]
}

pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.idx()]
}

pub fn pawn_attacks(sq: Square, side: crate::types::pieces::Color) -> Bitboard {
    PAWN_ATTACKS[side.idx()][sq.idx()]
}
