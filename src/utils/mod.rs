//! Utility functions and types shared across the crate.

pub mod error;
mod logging;

pub use error::{Error, Result};
pub use logging::{init_logging, parse_level, LOG_ENV, LOG_STYLE_ENV};

#[cfg(test)]
pub(crate) use logging::init_test_logging;
