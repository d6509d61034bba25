use lazy_static::lazy_static;

use crate::types::pieces::{Color, PieceName};
use crate::types::square::Square;

/// Minimal splitmix64, used only to seed the Zobrist tables deterministically (no need
/// for cryptographic quality, just non-degenerate bit patterns that don't collide).
struct SplitMix64(u64);

impl SplitMix64 {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

pub struct Zobrist {
    pub piece_square: [[[u64; 64]; 6]; 2],
    pub turn: u64,
    pub castling: [u64; 4],
    pub en_passant_file: [u64; 8],
}

impl Default for Zobrist {
    fn default() -> Self {
        let mut rng = SplitMix64(0x5A17_A1C9);
        let mut piece_square = [[[0u64; 64]; 6]; 2];
        for color in &mut piece_square {
            for piece in color.iter_mut() {
                for sq in piece.iter_mut() {
                    *sq = rng.next();
                }
            }
        }
        let mut castling = [0u64; 4];
        castling.iter_mut().for_each(|c| *c = rng.next());
        let mut en_passant_file = [0u64; 8];
        en_passant_file.iter_mut().for_each(|e| *e = rng.next());
        Self { piece_square, turn: rng.next(), castling, en_passant_file }
    }
}

lazy_static! {
    pub static ref ZOBRIST: Zobrist = Zobrist::default();
}

impl Zobrist {
    pub fn piece(&self, piece: PieceName, color: Color, sq: Square) -> u64 {
        self.piece_square[color.idx()][piece.idx()][sq.idx()]
    }
}
