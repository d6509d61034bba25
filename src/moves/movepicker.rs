//! Staged move selector (spec §6.1 `createMoveSelector`/`getNextBestMove`): hands back
//! the transposition-table move first, then captures sorted by MVV + SEE verdict, then
//! up to two killer quiets, then the remaining quiets sorted by history score. Lazily
//! generates each stage so a cutoff on an early stage skips the work of scoring the rest.

use crate::board::board::Board;
use crate::search::history_table::HistoryTable;
use crate::search::see;
use crate::types::pieces::PieceName;

use super::movelist::{MoveList, MoveListEntry};
use super::moves::Move;

pub const NUM_KILLERS: usize = 2;

const TT_MOVE_SCORE: i32 = i32::MAX - 1000;
const GOOD_CAPTURE: i32 = 10_000_000;
const BAD_CAPTURE: i32 = -10_000;
const KILLER_SCORES: [i32; NUM_KILLERS] = [1_000_000, 900_000];

#[derive(Default, Copy, Clone, PartialEq, Eq)]
enum Phase {
    #[default]
    TtMove,
    GenerateCaptures,
    GoodAndBadCaptures,
    Killers(u8),
    GenerateQuiets,
    Quiets,
    Done,
}

pub struct MovePicker {
    phase: Phase,
    moves: MoveList,
    current: usize,
    tt_move: Move,
    killers: [Move; NUM_KILLERS],
    captures_only: bool,
}

impl MovePicker {
    pub fn new(tt_move: Move, killers: [Move; NUM_KILLERS]) -> Self {
        Self {
            phase: Phase::TtMove,
            moves: MoveList::default(),
            current: 0,
            tt_move,
            killers,
            captures_only: false,
        }
    }

    /// A picker restricted to tactical moves, used inside quiescence search.
    pub fn new_captures_only(tt_move: Move) -> Self {
        Self {
            phase: Phase::TtMove,
            moves: MoveList::default(),
            current: 0,
            tt_move,
            killers: [Move::NULL; NUM_KILLERS],
            captures_only: true,
        }
    }

    fn already_returned(&self, m: Move, upto_killer: usize) -> bool {
        m == self.tt_move || self.killers[..upto_killer].contains(&m)
    }

    pub fn next(&mut self, board: &Board, history: &HistoryTable) -> Option<MoveListEntry> {
        if self.phase == Phase::TtMove {
            self.phase = Phase::GenerateCaptures;
            if self.tt_move != Move::NULL && is_pseudo_legal_guess(board, self.tt_move) {
                return Some(MoveListEntry { m: self.tt_move, score: TT_MOVE_SCORE });
            }
        }

        if self.phase == Phase::GenerateCaptures {
            self.phase = Phase::GoodAndBadCaptures;
            self.moves = board.pseudo_legal_captures();
            score_captures(board, &mut self.moves.arr[self.current..]);
        }

        if self.phase == Phase::GoodAndBadCaptures {
            while self.current < self.moves.len() {
                let entry = self.moves.pick_move(self.current);
                self.current += 1;
                if entry.m == self.tt_move {
                    continue;
                }
                return Some(entry);
            }
            self.phase =
                if self.captures_only { Phase::Done } else { Phase::Killers(0) };
        }

        if !self.captures_only {
            while let Phase::Killers(i) = self.phase {
                let idx = i as usize;
                self.phase = if idx + 1 < NUM_KILLERS { Phase::Killers(i + 1) } else { Phase::GenerateQuiets };
                let killer = self.killers[idx];
                if killer != Move::NULL
                    && !self.already_returned(killer, idx)
                    && is_pseudo_legal_guess(board, killer)
                {
                    return Some(MoveListEntry { m: killer, score: KILLER_SCORES[idx] });
                }
            }
        }

        if self.phase == Phase::GenerateQuiets {
            self.phase = Phase::Quiets;
            if !self.captures_only {
                self.current = self.moves.len();
                for entry in board.pseudo_legal_moves() {
                    if !entry.m.is_tactical() {
                        self.moves.push(entry.m);
                    }
                }
                score_quiets(board, history, &mut self.moves.arr[self.current..]);
            }
        }

        if self.phase == Phase::Quiets {
            while self.current < self.moves.len() {
                let entry = self.moves.pick_move(self.current);
                self.current += 1;
                if entry.m == self.tt_move || self.killers.contains(&entry.m) {
                    continue;
                }
                return Some(entry);
            }
            self.phase = Phase::Done;
        }

        None
    }
}

/// The move picker trusts the generator's own legality filtering via `Board::make_move`
/// rather than maintaining a separate pseudo-legality check for cached moves (TT move,
/// killers): a stale cached move simply fails to find a matching entry and is skipped.
fn is_pseudo_legal_guess(board: &Board, m: Move) -> bool {
    board.pseudo_legal_moves().into_iter().any(|e| e.m == m)
}

fn score_captures(board: &Board, moves: &mut [MoveListEntry]) {
    const MVV: [i32; 6] = [100, 320, 330, 500, 900, 0];
    for MoveListEntry { m, score } in moves {
        *score = match m.promotion() {
            Some(crate::moves::moves::Promotion::Queen) => GOOD_CAPTURE + MVV[PieceName::Queen.idx()],
            Some(_) => BAD_CAPTURE,
            None => {
                let victim_value = board.piece_at(m.to()).map_or(100, |p| MVV[p.name.idx()]);
                if see::see(board, *m, 0) {
                    GOOD_CAPTURE + victim_value
                } else {
                    BAD_CAPTURE + victim_value
                }
            }
        };
    }
}

fn score_quiets(board: &Board, history: &HistoryTable, moves: &mut [MoveListEntry]) {
    for MoveListEntry { m, score } in moves {
        *score = history.get(board.stm, *m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board::Board;

    #[test]
    fn returns_tt_move_first_when_pseudo_legal() {
        let board = Board::default();
        let tt_move = board.pseudo_legal_moves()[0];
        let mut picker = MovePicker::new(tt_move, [Move::NULL; NUM_KILLERS]);
        let history = HistoryTable::default();
        let first = picker.next(&board, &history).unwrap();
        assert_eq!(first.m, tt_move);
    }

    #[test]
    fn visits_every_pseudo_legal_move_exactly_once() {
        let board = Board::default();
        let mut picker = MovePicker::new(Move::NULL, [Move::NULL; NUM_KILLERS]);
        let history = HistoryTable::default();
        let mut seen = Vec::new();
        while let Some(entry) = picker.next(&board, &history) {
            seen.push(entry.m);
        }
        assert_eq!(seen.len(), board.pseudo_legal_moves().len());
    }
}
