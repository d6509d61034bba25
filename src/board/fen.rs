use thiserror::Error;

use crate::types::pieces::{Color, Piece};
use crate::types::square::Square;

use super::board::{Board, CastlingRights};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Boundary error for malformed FEN input (spec §6.1 `getFEN`/`parseFEN`, §7 `[AMBIENT]`
/// error type). Never produced from inside the search core itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN must have 6 space-separated fields, got {0}")]
    WrongFieldCount(usize),
    #[error("piece placement must have 8 ranks, got {0}")]
    WrongRankCount(usize),
    #[error("unrecognized piece character '{0}'")]
    BadPieceChar(char),
    #[error("unrecognized castling character '{0}'")]
    BadCastlingChar(char),
    #[error("side to move must be 'w' or 'b', got '{0}'")]
    BadSideToMove(String),
    #[error("malformed en passant target '{0}'")]
    BadEnPassant(String),
    #[error("malformed half-move or full-move counter")]
    BadCounter,
}

pub fn from_fen(fen: &str) -> Result<Board, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(FenError::WrongFieldCount(fields.len()));
    }
    let [placement, side, castling, ep, halfmove, fullmove] = fields[..] else {
        return Err(FenError::WrongFieldCount(fields.len()));
    };

    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount(ranks.len()));
    }

    let stm = match side {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::BadSideToMove(other.to_string())),
    };

    let mut board = Board::new_empty(stm);
    for (rank_from_top, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_from_top as u8;
        let mut file = 0u8;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
                continue;
            }
            let piece = Piece::from_char(c).ok_or(FenError::BadPieceChar(c))?;
            board.place_piece(piece, Square::new(file, rank));
            file += 1;
        }
    }

    let mut rights = CastlingRights::NONE;
    if castling != "-" {
        for c in castling.chars() {
            let bit = match c {
                'K' => CastlingRights::WHITE_KING,
                'Q' => CastlingRights::WHITE_QUEEN,
                'k' => CastlingRights::BLACK_KING,
                'q' => CastlingRights::BLACK_QUEEN,
                other => return Err(FenError::BadCastlingChar(other)),
            };
            rights.add(bit);
        }
    }
    board.castling = rights;

    board.en_passant = match ep {
        "-" => None,
        s => Some(Square::from_str(s).ok_or_else(|| FenError::BadEnPassant(s.to_string()))?),
    };

    board.half_move_clock = halfmove.parse().map_err(|_| FenError::BadCounter)?;
    board.full_moves = fullmove.parse().map_err(|_| FenError::BadCounter)?;

    board.zobrist_hash = rehash(&board);
    Ok(board)
}

/// Recomputes the Zobrist hash from scratch, used once at FEN load time (incremental
/// updates in `Board::place_piece` already folded in the piece terms; this adds the
/// side-to-move, castling, and en-passant terms that `from_fen` doesn't touch per-square).
fn rehash(board: &Board) -> u64 {
    let mut h = board.zobrist_hash;
    if board.stm == Color::Black {
        h ^= super::zobrist::ZOBRIST.turn;
    }
    h ^= board.castling.zobrist();
    if let Some(ep) = board.en_passant {
        h ^= super::zobrist::ZOBRIST.en_passant_file[ep.file() as usize];
    }
    h
}

pub fn to_fen(board: &Board) -> String {
    let mut out = String::new();
    for rank_from_top in 0..8u8 {
        let rank = 7 - rank_from_top;
        let mut empty_run = 0u8;
        for file in 0..8u8 {
            match board.piece_at(Square::new(file, rank)) {
                Some(piece) => {
                    if empty_run > 0 {
                        out.push((b'0' + empty_run) as char);
                        empty_run = 0;
                    }
                    out.push(piece.char());
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            out.push((b'0' + empty_run) as char);
        }
        if rank_from_top != 7 {
            out.push('/');
        }
    }
    out.push(' ');
    out.push(if board.stm == Color::White { 'w' } else { 'b' });
    out.push(' ');
    let mut any_rights = false;
    for (bit, c) in [
        (CastlingRights::WHITE_KING, 'K'),
        (CastlingRights::WHITE_QUEEN, 'Q'),
        (CastlingRights::BLACK_KING, 'k'),
        (CastlingRights::BLACK_QUEEN, 'q'),
    ] {
        if board.castling.has(bit) {
            out.push(c);
            any_rights = true;
        }
    }
    if !any_rights {
        out.push('-');
    }
    out.push(' ');
    match board.en_passant {
        Some(sq) => out.push_str(&sq.to_string()),
        None => out.push('-'),
    }
    out.push_str(&format!(" {} {}", board.half_move_clock, board.full_moves));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_round_trips() {
        let board = from_fen(STARTING_FEN).unwrap();
        assert_eq!(to_fen(&board), STARTING_FEN);
    }

    #[test]
    fn rejects_malformed_piece_placement() {
        assert_eq!(from_fen("8/8/8/8/8/8/8 w - - 0 1"), Err(FenError::WrongRankCount(7)));
    }

    #[test]
    fn preserves_en_passant_target() {
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let board = from_fen(fen).unwrap();
        assert_eq!(board.en_passant, Square::from_str("d6"));
        assert_eq!(to_fen(&board), fen);
    }
}
