use thiserror::Error;

use crate::board::fen::FenError;

/// Boundary errors: UCI input parsing and training file I/O. Never produced from inside
/// `negamax`/`quiescence` — interior search failure is value-returning per the search
/// core's contract (timeout, no legal moves, aspiration miss all resolve to a `Score`).
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid position: {0}")]
    Fen(#[from] FenError),
    #[error("unrecognized UCI command: {0}")]
    UnknownCommand(String),
    #[error("training output I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
