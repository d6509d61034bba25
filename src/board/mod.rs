pub mod board;
pub mod fen;
pub mod zobrist;

pub use board::{Board, CastlingRights};
