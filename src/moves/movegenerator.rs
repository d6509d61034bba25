//! Pseudo-legal move generation: does not check whether the mover's own king ends up in
//! check. `Board::make_move` performs that filter (spec §6.1 `isLegalMove`), so the
//! generator here stays cheap and branch-light.

use crate::board::board::Board;
use crate::moves::attack_boards::{king_attacks, knight_attacks, pawn_attacks, RANK1, RANK2, RANK4, RANK5, RANK7, RANK8};
use crate::moves::movelist::MoveList;
use crate::moves::moves::{Move, Promotion};
use crate::moves::rays::{bishop_attacks, queen_attacks, rook_attacks};
use crate::types::bitboard::Bitboard;
use crate::types::pieces::{Color, PieceName};
use crate::board::board::CastlingRights;
use crate::types::square::Square;

fn push_promotions(list: &mut MoveList, from: Square, to: Square, is_capture: bool) {
    for promo in [Promotion::Queen, Promotion::Rook, Promotion::Bishop, Promotion::Knight] {
        list.push(Move::new_promotion(from, to, promo, is_capture));
    }
}

fn pawn_moves(board: &Board, list: &mut MoveList, captures_only: bool) {
    let us = board.stm;
    let (start_rank, promo_rank, push_dir): (Bitboard, Bitboard, i32) = match us {
        Color::White => (RANK2, RANK8, 1),
        Color::Black => (RANK7, RANK1, -1),
    };
    let occ = board.occupied();
    let enemy = board.color_occupancy(!us);
    let pawns = board.bitboard(us, PieceName::Pawn);

    for from in pawns {
        let one_step = Square::new(from.file(), (from.rank() as i32 + push_dir) as u8);
        let blocked = occ.occupied(one_step);
        if !blocked {
            if promo_rank.occupied(one_step) {
                // A quiet queen promotion is tactical (`Move::is_tactical`) and must stay
                // in the captures-only set quiescence searches; under-promotions aren't.
                if captures_only {
                    list.push(Move::new_promotion(from, one_step, Promotion::Queen, false));
                } else {
                    push_promotions(list, from, one_step, false);
                }
            } else if !captures_only {
                list.push(Move::new(from, one_step, false));
                if start_rank.occupied(from) {
                    let two_step = Square::new(from.file(), (from.rank() as i32 + 2 * push_dir) as u8);
                    if !occ.occupied(two_step) {
                        list.push(Move::new(from, two_step, false));
                    }
                }
            }
        }

        for to in pawn_attacks(from, us) {
            if enemy.occupied(to) {
                if promo_rank.occupied(to) {
                    push_promotions(list, from, to, true);
                } else {
                    list.push(Move::new(from, to, true));
                }
            } else if board.en_passant == Some(to) {
                list.push(Move::new_en_passant(from, to));
            }
        }
    }
}

fn stepper_moves(
    board: &Board,
    list: &mut MoveList,
    name: PieceName,
    attacks_from: impl Fn(Square) -> Bitboard,
    captures_only: bool,
) {
    let us = board.stm;
    let friendly = board.color_occupancy(us);
    let enemy = board.color_occupancy(!us);
    for from in board.bitboard(us, name) {
        let targets = attacks_from(from) & !friendly;
        for to in targets {
            if captures_only && !enemy.occupied(to) {
                continue;
            }
            list.push(Move::new(from, to, enemy.occupied(to)));
        }
    }
}

fn slider_moves(
    board: &Board,
    list: &mut MoveList,
    name: PieceName,
    attacks_from: impl Fn(Square, Bitboard) -> Bitboard,
    captures_only: bool,
) {
    let us = board.stm;
    let occ = board.occupied();
    let friendly = board.color_occupancy(us);
    let enemy = board.color_occupancy(!us);
    for from in board.bitboard(us, name) {
        let targets = attacks_from(from, occ) & !friendly;
        for to in targets {
            if captures_only && !enemy.occupied(to) {
                continue;
            }
            list.push(Move::new(from, to, enemy.occupied(to)));
        }
    }
}

fn castle_moves(board: &Board, list: &mut MoveList) {
    let us = board.stm;
    let occ = board.occupied();
    let rank = if us == Color::White { 0 } else { 7 };
    let king_sq = Square::new(4, rank);
    if board.square_attacked_by(king_sq, !us) {
        return;
    }

    let (kingside_right, queenside_right) = match us {
        Color::White => (CastlingRights::WHITE_KING, CastlingRights::WHITE_QUEEN),
        Color::Black => (CastlingRights::BLACK_KING, CastlingRights::BLACK_QUEEN),
    };

    if board.castling.has(kingside_right) {
        let f = Square::new(5, rank);
        let g = Square::new(6, rank);
        if occ.empty(f)
            && occ.empty(g)
            && !board.square_attacked_by(f, !us)
            && !board.square_attacked_by(g, !us)
        {
            list.push(Move::new_castle(king_sq, g));
        }
    }
    if board.castling.has(queenside_right) {
        let d = Square::new(3, rank);
        let c = Square::new(2, rank);
        let b_sq = Square::new(1, rank);
        if occ.empty(d)
            && occ.empty(c)
            && occ.empty(b_sq)
            && !board.square_attacked_by(d, !us)
            && !board.square_attacked_by(c, !us)
        {
            list.push(Move::new_castle(king_sq, c));
        }
    }
}

/// Generates every pseudo-legal move (or, with `captures_only`, every pseudo-legal
/// tactical move: captures, en passant, and queen promotions) for the side to move.
pub fn generate_moves(board: &Board, captures_only: bool) -> MoveList {
    let mut list = MoveList::default();

    pawn_moves(board, &mut list, captures_only);
    stepper_moves(board, &mut list, PieceName::Knight, knight_attacks, captures_only);
    stepper_moves(board, &mut list, PieceName::King, king_attacks, captures_only);
    slider_moves(board, &mut list, PieceName::Bishop, bishop_attacks, captures_only);
    slider_moves(board, &mut list, PieceName::Rook, rook_attacks, captures_only);
    slider_moves(board, &mut list, PieceName::Queen, queen_attacks, captures_only);
    if !captures_only {
        castle_moves(board, &mut list);
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::from_fen;

    #[test]
    fn starting_position_has_twenty_moves() {
        let board = Board::default();
        assert_eq!(board.pseudo_legal_moves().len(), 20);
    }

    #[test]
    fn captures_only_excludes_quiet_moves() {
        let board = from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1").unwrap();
        for entry in board.pseudo_legal_captures() {
            assert!(entry.m.is_tactical());
        }
    }

    #[test]
    fn kingside_castle_is_generated_when_clear_and_safe() {
        let board = from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castles = board.pseudo_legal_moves().into_iter().filter(|e| e.m.is_castle()).count();
        assert_eq!(castles, 2);
    }
}
