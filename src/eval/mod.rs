pub mod accumulator;

use crate::types::pieces::Color;

pub use accumulator::Accumulator;

/// Static evaluation from `stm`'s point of view (spec §6.1 `evaluation(acc, stm)`).
///
/// The teacher engine (and the original C source this spec distills) derive this from a
/// trained NNUE accumulator. NNUE architecture is an explicit non-goal of the search-core
/// spec ("does not prescribe a particular NNUE architecture... pluggable"), so this crate
/// plugs in a classical material + piece-square accumulator instead. The contract the
/// search core depends on — O(1) copy, incremental update on make/unmake, side-relative
/// sign — is identical either way.
pub fn evaluate(acc: &Accumulator, stm: Color) -> i32 {
    let white = acc.score(Color::White);
    let black = acc.score(Color::Black);
    match stm {
        Color::White => white - black,
        Color::Black => black - white,
    }
}
