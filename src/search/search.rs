use std::sync::atomic::Ordering;

use arrayvec::ArrayVec;

use crate::board::board::Board;
use crate::engine::transposition::{from_tt_score, to_tt_score, Bound, TranspositionTable};
use crate::eval::evaluate;
use crate::moves::movelist::{MoveListEntry, MAX_LEN};
use crate::moves::movepicker::MovePicker;
use crate::moves::moves::Move;

use super::quiescence::quiescence;
use super::thread::Pv;
use super::{SearchThread, CHECKMATE, DRAW, GUARANTEE_CHECKMATE, INFINITE};

/// Recursive negamax/alpha-beta search (spec §4.2). `PV` is a compile-time flag rather
/// than a runtime enum: the teacher's search core monomorphizes on node kind so the
/// compiler can fold away the dead branch at each call site, which matters here because
/// this function is the hottest path in the crate.
pub fn negamax<const PV: bool>(
    th: &mut SearchThread,
    tt: &mut TranspositionTable,
    board: &Board,
    mut alpha: i32,
    beta: i32,
    depth: i32,
    out_pv: &mut Pv,
) -> i32 {
    out_pv.clear();
    if depth <= 0 {
        return quiescence(th, board, alpha, beta);
    }
    th.nodes += 1;
    if PV {
        th.sel_depth = th.sel_depth.max(th.ply);
    }

    let is_root = th.ply == 0;
    if !is_root && (board.is_draw() || th.is_repetition(board) || th.out_of_time()) {
        return DRAW;
    }

    let key = board.zobrist_hash;
    let tt_entry = tt.probe(key);
    let tt_move = tt_entry.map_or(Move::NULL, |e| e.best_move);
    if let Some(entry) = tt_entry {
        if !PV && entry.depth >= depth {
            let score = from_tt_score(entry.node_score, th.ply);
            let hits = match entry.bound {
                Bound::Exact => true,
                Bound::Lower => score >= beta,
                Bound::Upper => score <= alpha,
            };
            if hits {
                return score;
            }
        }
    }

    let in_check = board.in_check(board.stm);
    let static_eval = if in_check {
        -INFINITE
    } else {
        tt_entry.map_or_else(|| evaluate(&board.acc, board.stm), |e| e.static_eval)
    };

    if !PV && !in_check && depth > 3 && static_eval >= beta && board.has_non_pawn_material(board.stm) {
        let null_child = board.make_null_move();
        th.ply += 1;
        th.hash_history.push(null_child.zobrist_hash);
        let mut unused_pv = Pv::default();
        let score = -negamax::<false>(th, tt, &null_child, -beta, -beta + 1, depth - 4, &mut unused_pv);
        th.hash_history.pop();
        th.ply -= 1;
        if score >= beta {
            return score;
        }
    }

    // Reverse futility pruning. The margin matches the futility threshold below
    // (both `150 * depth`); the original source leaves a TODO that they could diverge,
    // which this keeps as a note rather than a behavior change.
    if !PV && !in_check && static_eval - 150 * depth >= beta {
        return static_eval;
    }

    let original_alpha = alpha;
    let mut best_score = -INFINITE;
    let mut best_move = Move::NULL;
    let mut legal_moves = 0;
    let mut tried_quiets: ArrayVec<MoveListEntry, MAX_LEN> = ArrayVec::new();

    let killers = th.stack[th.ply].killers;
    let mut picker = MovePicker::new(tt_move, killers);

    while let Some(entry) = picker.next(board, &th.history) {
        let Some(child) = board.make_move(entry.m) else { continue };
        legal_moves += 1;
        let expected_non_pv = !PV || legal_moves > 1;

        if expected_non_pv
            && depth < 4
            && !in_check
            && !entry.m.is_tactical()
            && static_eval + 150 * depth <= alpha
        {
            continue;
        }

        let reductions = if legal_moves > 1 && depth > 1 { 2 } else { 1 };

        th.ply += 1;
        th.hash_history.push(child.zobrist_hash);
        let mut child_pv = Pv::default();
        let mut score = if expected_non_pv {
            -negamax::<false>(th, tt, &child, -alpha - 1, -alpha, depth - reductions, &mut child_pv)
        } else {
            alpha
        };
        if PV && (legal_moves == 1 || score > alpha) {
            score = -negamax::<true>(th, tt, &child, -beta, -alpha, depth - 1, &mut child_pv);
        }
        th.hash_history.pop();
        th.ply -= 1;

        if !entry.m.is_tactical() {
            tried_quiets.push(entry);
        }

        if score > best_score {
            best_score = score;
            best_move = entry.m;
            if score > alpha {
                if score >= beta {
                    if !entry.m.is_tactical() {
                        let slot = &mut th.stack[th.ply].killers;
                        if slot[0] != entry.m {
                            slot[1] = slot[0];
                            slot[0] = entry.m;
                        }
                        th.history.update(board.stm, entry.m, &tried_quiets, depth);
                    }
                    if !th.stop.load(Ordering::Relaxed) {
                        tt.store(key, entry.m, depth, Bound::Lower, to_tt_score(score, th.ply), static_eval);
                    }
                    return score;
                }
                out_pv.update(entry.m, &child_pv);
                alpha = score;
            }
        }
    }

    if legal_moves == 0 {
        best_score = if in_check { -CHECKMATE + th.ply } else { DRAW };
    }

    if !th.stop.load(Ordering::Relaxed) {
        let bound = if alpha > original_alpha { Bound::Exact } else { Bound::Upper };
        let stored_score = if best_score == -INFINITE { static_eval } else { best_score };
        tt.store(key, best_move, depth, bound, to_tt_score(stored_score, th.ply), static_eval);
    }

    best_score
}

/// Iterative deepener (spec §4.3): widens/contracts an aspiration window around the
/// previous depth's score and republishes `bestMove`/PV only on a successful (in-window)
/// result.
pub fn iterative_deepen(th: &mut SearchThread, tt: &mut TranspositionTable, board: &Board) -> (Move, i32) {
    th.reset_for_new_search();
    tt.new_search();

    let mut alpha = -INFINITE;
    let mut beta = INFINITE;
    let mut depth = 1;
    let mut pv = Pv::default();

    loop {
        let score = negamax::<true>(th, tt, board, alpha, beta, depth, &mut pv);

        if th.out_of_time() {
            break;
        }

        if score > alpha && score < beta {
            alpha = score - 25;
            beta = score + 25;
            th.best_move = pv.best_move();
            th.best_score = score;
            if th.print {
                print_info(th, tt, depth, score, &pv);
            }
            depth += 1;
            if depth > super::MAX_DEPTH {
                break;
            }
        } else {
            if score <= alpha {
                alpha = -INFINITE;
            }
            if score >= beta {
                beta = INFINITE;
            }
        }
    }

    if th.print {
        match pv.ponder_move() {
            Some(ponder) => println!("bestmove {} ponder {}", th.best_move, ponder),
            None => println!("bestmove {}", th.best_move),
        }
    }

    (th.best_move, th.best_score)
}

fn print_info(th: &SearchThread, tt: &TranspositionTable, depth: i32, score: i32, pv: &Pv) {
    let _ = tt;
    let elapsed = th.start.elapsed();
    let nps = if elapsed.as_secs_f64() > 0.0 { (th.nodes as f64 / elapsed.as_secs_f64()) as u64 } else { 0 };

    let score_str = if score.abs() >= GUARANTEE_CHECKMATE {
        let mate_in = if score > 0 { (CHECKMATE - score + 1) / 2 } else { (-CHECKMATE - score) / 2 };
        format!("mate {mate_in}")
    } else {
        format!("cp {score}")
    };

    let pv_str = pv.as_slice().iter().map(Move::to_string).collect::<Vec<_>>().join(" ");
    println!(
        "info depth {} score {} nodes {} nps {} time {} pv {}",
        depth,
        score_str,
        th.nodes,
        nps,
        elapsed.as_millis(),
        pv_str
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::from_fen;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    use crate::search::game_time::Clock;

    fn fresh_thread(stop: &AtomicBool) -> SearchThread<'_> {
        SearchThread::new(stop, Clock::fixed(Duration::from_millis(200)), false, Vec::new())
    }

    #[test]
    fn mate_in_one_is_found() {
        let board = from_fen("4k3/4Q3/4K3/8/8/8/8/8 w - - 0 1").unwrap();
        let stop = AtomicBool::new(false);
        let mut th = fresh_thread(&stop);
        let mut tt = TranspositionTable::new(1);
        let (_, score) = iterative_deepen(&mut th, &mut tt, &board);
        assert!(score >= GUARANTEE_CHECKMATE);
    }

    #[test]
    fn stalemate_returns_draw_with_no_legal_moves() {
        let board = from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!board.has_legal_move());
        let stop = AtomicBool::new(false);
        let mut th = fresh_thread(&stop);
        let mut tt = TranspositionTable::new(1);
        let mut pv = Pv::default();
        let score = negamax::<true>(&mut th, &mut tt, &board, -INFINITE, INFINITE, 1, &mut pv);
        assert_eq!(score, DRAW);
    }

    #[test]
    fn insufficient_material_is_a_draw_at_depth_one() {
        let board = from_fen("8/8/4k3/8/4K3/8/8/8 w - - 0 1").unwrap();
        let stop = AtomicBool::new(false);
        let mut th = fresh_thread(&stop);
        let mut tt = TranspositionTable::new(1);
        let mut pv = Pv::default();
        let score = negamax::<true>(&mut th, &mut tt, &board, -INFINITE, INFINITE, 1, &mut pv);
        assert_eq!(score, DRAW);
    }
}
