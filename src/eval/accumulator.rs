use crate::types::pieces::{Color, Piece, PieceName};
use crate::types::square::{Square, NUM_SQUARES};

/// Per-piece, per-square value tables from white's perspective (rank 1 at index 0..8).
/// Values are deliberately approximate hand-tuned constants in the style of PeSTO-family
/// piece-square tables, not a trained network — see `eval::evaluate`'s doc comment.
#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10,-20,-20, 10, 10,  5,
     5, -5,-10,  0,  0,-10, -5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5,  5, 10, 25, 25, 10,  5,  5,
    10, 10, 20, 30, 30, 20, 10, 10,
    50, 50, 50, 50, 50, 50, 50, 50,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
     0,  0,  0,  5,  5,  0,  0,  0,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     5, 10, 10, 10, 10, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -10,  5,  5,  5,  5,  5,  0,-10,
      0,  0,  5,  5,  5,  5,  0, -5,
     -5,  0,  5,  5,  5,  5,  0, -5,
    -10,  0,  5,  5,  5,  5,  0,-10,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_PST: [i32; 64] = [
     20, 30, 10,  0,  0, 10, 30, 20,
     20, 20,  0,  0,  0,  0, 20, 20,
    -10,-20,-20,-20,-20,-20,-20,-10,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
];

fn pst(name: PieceName) -> &'static [i32; 64] {
    match name {
        PieceName::Pawn => &PAWN_PST,
        PieceName::Knight => &KNIGHT_PST,
        PieceName::Bishop => &BISHOP_PST,
        PieceName::Rook => &ROOK_PST,
        PieceName::Queen => &QUEEN_PST,
        PieceName::King => &KING_PST,
    }
}

fn feature_value(piece: Piece, sq: Square) -> i32 {
    let table = pst(piece.name);
    let idx = match piece.color {
        Color::White => sq.idx(),
        Color::Black => sq.flip_vertical().idx(),
    };
    piece.value() + table[idx]
}

/// An evaluation snapshot: the summed material + piece-square value for each color.
/// `Copy` and cheap (two `i32`s) so pushing/popping it per ply in the search stack costs
/// nothing, matching spec §3's "copyable in O(1)" invariant for `Accumulator`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Accumulator {
    totals: [i32; 2],
}

const _: () = assert!(NUM_SQUARES == 64);

impl Accumulator {
    pub fn score(&self, color: Color) -> i32 {
        self.totals[color.idx()]
    }

    pub fn add_piece(&mut self, piece: Piece, sq: Square) {
        self.totals[piece.color.idx()] += feature_value(piece, sq);
    }

    pub fn remove_piece(&mut self, piece: Piece, sq: Square) {
        self.totals[piece.color.idx()] -= feature_value(piece, sq);
    }
}
