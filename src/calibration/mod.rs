//! Offline selection of the filter's blend coefficient from labeled data.

mod candidates;
mod optimizer;

pub use candidates::{AlphaCandidates, DEFAULT_GRID_SIZE, MAX_GRID_SIZE};
pub use optimizer::{AlphaOptimizer, CalibrationReport, CandidateScore};
