//! Transposition table: depth-preferred replacement with an age tiebreak. The search core
//! depends only on `probe`/`store` and the existence of `age` (spec §9), not on any
//! particular replacement scheme beyond that.

use crate::moves::moves::Move;
use crate::search::GUARANTEE_CHECKMATE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Copy, Debug)]
pub struct PositionEvaluation {
    pub key: u64,
    pub best_move: Move,
    pub depth: i32,
    pub bound: Bound,
    pub node_score: i32,
    pub static_eval: i32,
    age: u8,
}

/// Converts a search-local score into the ply-neutral form stored in the TT: mate scores
/// are expressed as a distance from the search root rather than from the current node, so
/// a later probe at a different ply still recovers the correct mate distance.
pub fn to_tt_score(score: i32, ply: i32) -> i32 {
    if score >= GUARANTEE_CHECKMATE {
        score + ply
    } else if score <= -GUARANTEE_CHECKMATE {
        score - ply
    } else {
        score
    }
}

/// Inverse of `to_tt_score`, applied when a stored score is read back at a given ply.
pub fn from_tt_score(score: i32, ply: i32) -> i32 {
    if score >= GUARANTEE_CHECKMATE {
        score - ply
    } else if score <= -GUARANTEE_CHECKMATE {
        score + ply
    } else {
        score
    }
}

pub struct TranspositionTable {
    entries: Vec<Option<PositionEvaluation>>,
    age: u8,
}

impl TranspositionTable {
    pub fn new(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let capacity = (bytes / std::mem::size_of::<PositionEvaluation>()).max(1);
        Self { entries: vec![None; capacity], age: 0 }
    }

    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// Bumped once at the start of each new search so the replacement policy can prefer
    /// entries written during the current search over stale ones from a previous call.
    pub fn new_search(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        self.entries.iter_mut().for_each(|e| *e = None);
        self.age = 0;
    }

    pub fn probe(&self, key: u64) -> Option<PositionEvaluation> {
        let slot = self.entries[self.index(key)]?;
        (slot.key == key).then_some(slot)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        key: u64,
        best_move: Move,
        depth: i32,
        bound: Bound,
        node_score: i32,
        static_eval: i32,
    ) {
        let idx = self.index(key);
        let replace = match &self.entries[idx] {
            None => true,
            Some(existing) => existing.key != key || existing.depth <= depth || existing.age != self.age,
        };
        if replace {
            self.entries[idx] = Some(PositionEvaluation {
                key,
                best_move,
                depth,
                bound,
                node_score,
                static_eval,
                age: self.age,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tt_score_round_trips_for_plain_scores() {
        assert_eq!(from_tt_score(to_tt_score(137, 5), 5), 137);
        assert_eq!(from_tt_score(to_tt_score(-137, 9), 9), -137);
    }

    #[test]
    fn tt_score_round_trips_for_mate_scores_independent_of_ply() {
        use crate::search::CHECKMATE;
        let v = CHECKMATE - 3;
        for ply in [0, 4, 12] {
            assert_eq!(from_tt_score(to_tt_score(v, ply), ply), v);
        }
    }

    #[test]
    fn deeper_search_replaces_shallower_entry_same_age() {
        let mut tt = TranspositionTable::new(1);
        tt.store(42, Move::NULL, 3, Bound::Exact, 10, 10);
        tt.store(42, Move::NULL, 8, Bound::Exact, 20, 20);
        assert_eq!(tt.probe(42).unwrap().depth, 8);
    }
}
