use crate::board::board::Board;
use crate::eval::evaluate;
use crate::moves::movepicker::MovePicker;
use crate::moves::moves::Move;

use super::{SearchThread, CHECKMATE, DRAW};

/// Leaf extension: keeps resolving tactical sequences until the position is quiet before
/// handing back a static evaluation, avoiding the horizon effect on hanging captures
/// (spec §4.1). Fail-soft, negamax convention.
pub fn quiescence(th: &mut SearchThread, board: &Board, mut alpha: i32, beta: i32) -> i32 {
    th.nodes += 1;
    if board.is_draw() || th.is_repetition(board) {
        return DRAW;
    }

    let in_check = board.in_check(board.stm);
    let stand_pat = if in_check { -CHECKMATE + th.ply } else { evaluate(&board.acc, board.stm) };

    if stand_pat >= beta {
        return stand_pat;
    }
    let mut best_score = stand_pat;
    alpha = alpha.max(stand_pat);

    let mut picker =
        if in_check { MovePicker::new(Move::NULL, [Move::NULL; 2]) } else { MovePicker::new_captures_only(Move::NULL) };

    while let Some(entry) = picker.next(board, &th.history) {
        let Some(child) = board.make_move(entry.m) else { continue };
        th.ply += 1;
        th.hash_history.push(child.zobrist_hash);
        let score = -quiescence(th, &child, -beta, -alpha);
        th.hash_history.pop();
        th.ply -= 1;

        if score > best_score {
            best_score = score;
            if score > alpha {
                if score >= beta {
                    return best_score;
                }
                alpha = score;
            }
        }
    }

    best_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::from_fen;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    use crate::search::game_time::Clock;

    #[test]
    fn stand_pat_cuts_off_without_descending_into_a_losing_capture() {
        let board = from_fen("4k3/8/8/3p4/8/8/4P3/4K2R w - - 0 1").unwrap();
        let stop = AtomicBool::new(false);
        let mut th = SearchThread::new(&stop, Clock::fixed(Duration::from_secs(1)), false, Vec::new());
        let beta = evaluate(&board.acc, board.stm) - 50;
        let score = quiescence(&mut th, &board, beta - 1, beta);
        assert!(score >= beta);
    }

    #[test]
    fn draw_position_returns_draw_score() {
        let board = from_fen("8/8/4k3/8/4K3/8/8/8 w - - 0 1").unwrap();
        let stop = AtomicBool::new(false);
        let mut th = SearchThread::new(&stop, Clock::fixed(Duration::from_secs(1)), false, Vec::new());
        assert_eq!(quiescence(&mut th, &board, -CHECKMATE, CHECKMATE), DRAW);
    }
}
