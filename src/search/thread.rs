use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::board::board::Board;
use crate::moves::movepicker::NUM_KILLERS;
use crate::moves::moves::Move;

use super::game_time::Clock;
use super::history_table::HistoryTable;
use super::MAX_PLY;

/// Principal variation buffer for one node, terminated implicitly by `len` rather than a
/// `NO_MOVE` sentinel scan (spec §3 `SearchHelper`).
#[derive(Clone, Copy)]
pub struct Pv {
    line: [Move; MAX_PLY],
    len: usize,
}

impl Default for Pv {
    fn default() -> Self {
        Self { line: [Move::NULL; MAX_PLY], len: 0 }
    }
}

impl Pv {
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Prepends `m` to `child`'s line, becoming this node's PV (spec §4.2 step 7h).
    pub fn update(&mut self, m: Move, child: &Pv) {
        self.line[0] = m;
        self.line[1..=child.len].copy_from_slice(&child.line[..child.len]);
        self.len = child.len + 1;
    }

    pub fn best_move(&self) -> Move {
        if self.len > 0 {
            self.line[0]
        } else {
            Move::NULL
        }
    }

    pub fn ponder_move(&self) -> Option<Move> {
        (self.len > 1).then_some(self.line[1])
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.line[..self.len]
    }
}

#[derive(Clone, Copy)]
pub struct SearchStackEntry {
    pub killers: [Move; NUM_KILLERS],
}

impl Default for SearchStackEntry {
    fn default() -> Self {
        Self { killers: [Move::NULL; NUM_KILLERS] }
    }
}

/// Fixed-height, ply-indexed scratch (spec §3 `SearchHelper`, §9 "ply-indexed stacks
/// instead of deep argument passing"). Does not carry accumulators: `Board` is `Copy` and
/// owns its own `Accumulator`, which the copy-make recursion already threads through
/// naturally — see `DESIGN.md` for the full rationale.
pub struct SearchStack {
    entries: Vec<SearchStackEntry>,
}

impl Default for SearchStack {
    fn default() -> Self {
        Self { entries: vec![SearchStackEntry::default(); MAX_PLY] }
    }
}

impl std::ops::Index<i32> for SearchStack {
    type Output = SearchStackEntry;
    fn index(&self, ply: i32) -> &Self::Output {
        &self.entries[ply as usize]
    }
}

impl std::ops::IndexMut<i32> for SearchStack {
    fn index_mut(&mut self, ply: i32) -> &mut Self::Output {
        &mut self.entries[ply as usize]
    }
}

/// Per-thread state carried through recursion (spec §3 `SearchThread`).
pub struct SearchThread<'a> {
    pub ply: i32,
    pub sel_depth: i32,
    pub nodes: u64,
    pub stack: SearchStack,
    pub history: HistoryTable,
    /// Zobrist hashes of every position reached so far this game, plus every position on
    /// the current search path (callers push the child's hash before recursing into it
    /// and pop it on return) — seeds `is_repetition` with both game history and in-search
    /// history, same as the teacher's `ThreadData::hash_history`.
    pub hash_history: Vec<u64>,
    pub start: Instant,
    pub clock: Clock,
    pub best_move: Move,
    pub best_score: i32,
    pub print: bool,
    pub stop: &'a AtomicBool,
}

/// How often (in node count) `out_of_time` actually checks the clock: the clock read is
/// the one part of a node visit that isn't free, so it is sampled rather than checked on
/// every node (spec §5: "time checks therefore happen once per non-leaf node entry").
const TIME_CHECK_INTERVAL: u64 = 1024;

impl<'a> SearchThread<'a> {
    /// `hash_history` should already contain the zobrist hash of `board` itself (the
    /// position the search is being asked to analyze) as its last entry, followed
    /// backwards by the rest of the game played so far.
    pub fn new(stop: &'a AtomicBool, clock: Clock, print: bool, hash_history: Vec<u64>) -> Self {
        Self {
            ply: 0,
            sel_depth: 0,
            nodes: 0,
            stack: SearchStack::default(),
            history: HistoryTable::default(),
            hash_history,
            start: Instant::now(),
            clock,
            best_move: Move::NULL,
            best_score: 0,
            print,
            stop,
        }
    }

    /// `isRepetition` contract (spec §6.1): true once `board`'s own position already
    /// occurred earlier within the fifty-move window, counting both positions played
    /// earlier in the actual game and positions visited earlier on the current search
    /// path. One earlier occurrence is enough (not a true third occurrence) — the
    /// standard engine shortcut, since by the time a real threefold would register the
    /// search has already steered away from it. Grounded on the teacher's
    /// `ThreadData::is_repetition`.
    pub fn is_repetition(&self, board: &Board) -> bool {
        let window = (board.half_move_clock as usize + 1).min(self.hash_history.len());
        // Index 0 of the reversed, windowed slice is `board` itself (always a trivial
        // self-match) and index 1 is one ply back with the opponent to move; both are
        // skipped so only same-side-to-move positions (index 2, 4, ...) are compared.
        self.hash_history.iter().rev().take(window).skip(2).step_by(2).any(|&h| h == board.zobrist_hash)
    }

    /// `outOfTime` contract (spec §4.2 step 2): sticky once tripped.
    pub fn out_of_time(&mut self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        if self.nodes % TIME_CHECK_INTERVAL != 0 {
            return false;
        }
        if self.start.elapsed() >= self.clock.budget {
            self.stop.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }

    pub fn reset_for_new_search(&mut self) {
        self.ply = 0;
        self.sel_depth = 0;
        self.nodes = 0;
        self.start = Instant::now();
        self.best_move = Move::NULL;
        self.best_score = 0;
        self.stop.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::from_fen;
    use crate::search::game_time::Clock;
    use std::time::Duration;

    #[test]
    fn flags_a_position_that_already_occurred_earlier_in_history() {
        let board = from_fen("8/8/4k3/8/4K3/8/8/8 w - - 4 10").unwrap();
        let stop = AtomicBool::new(false);
        let th = SearchThread::new(
            &stop,
            Clock::fixed(Duration::from_millis(100)),
            false,
            vec![0xAAAA, board.zobrist_hash, 0xBBBB, board.zobrist_hash],
        );
        assert!(th.is_repetition(&board));
    }

    #[test]
    fn does_not_flag_a_position_seen_only_once() {
        let board = from_fen("8/8/4k3/8/4K3/8/8/8 w - - 4 10").unwrap();
        let stop = AtomicBool::new(false);
        let th = SearchThread::new(
            &stop,
            Clock::fixed(Duration::from_millis(100)),
            false,
            vec![0xAAAA, 0xBBBB, board.zobrist_hash],
        );
        assert!(!th.is_repetition(&board));
    }

    #[test]
    fn ignores_matches_outside_the_fifty_move_window() {
        let board = from_fen("8/8/4k3/8/4K3/8/8/8 w - - 0 10").unwrap();
        let stop = AtomicBool::new(false);
        // half_move_clock is 0, so the window only covers `board` itself; an earlier
        // match beyond that window (an irreversible move reset the clock) must not count.
        let th = SearchThread::new(&stop, Clock::fixed(Duration::from_millis(100)), false, vec![board.zobrist_hash, board.zobrist_hash]);
        assert!(!th.is_repetition(&board));
    }
}
