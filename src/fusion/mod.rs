//! Streaming fusion of a drifting signal with a noisy one.

mod filter;

pub use filter::{
    validate_alpha, ComplementaryFilter, FilterPhase, FilterState, DEFAULT_ALPHA,
};
pub(crate) use filter::check_paired;
