//! # Sensor Fusion
//! Complementary filtering of two scalar signals with complementary errors.
//!
//! `signal1` is smooth but drifts, `signal2` is unbiased but noisy. A
//! [`ComplementaryFilter`] follows the *changes* of `signal1` and is pulled
//! toward the *value* of `signal2` with weight `alpha`:
//!
//! ```rust
//! use sensorfusion::prelude::*;
//!
//! let mut filter = ComplementaryFilter::new(0.5)?;
//! assert_eq!(filter.fuse(0.0, 0.0), 0.0);
//! assert_eq!(filter.fuse(2.0, 3.0), 2.5);
//! assert_eq!(filter.fuse(5.0, 4.0), 4.75);
//! # Ok::<(), sensorfusion::Error>(())
//! ```
//!
//! When ground truth is available offline, [`ComplementaryFilter::optimize_alpha`]
//! grid-searches the alpha with the lowest mean absolute error:
//!
//! ```rust
//! use sensorfusion::prelude::*;
//!
//! let truth = [10.0, 11.0, 12.0, 13.0];
//! let drifting = [10.0, 11.5, 13.0, 14.5];
//! let noisy = [10.0, 11.2, 11.9, 13.1];
//!
//! let mut filter = ComplementaryFilter::default();
//! let report = filter.optimize_alpha(&drifting, &noisy, &truth, None)?;
//! assert_eq!(filter.alpha(), report.best_alpha);
//! # Ok::<(), sensorfusion::Error>(())
//! ```

pub use crate::utils::error::{Error, Result};

pub mod calibration;
pub mod config;
pub mod fusion;
pub mod metrics;
pub mod utils;

pub use crate::calibration::{AlphaCandidates, AlphaOptimizer, CalibrationReport, CandidateScore};
pub use crate::config::{CalibrationConfig, FusionConfig};
pub use crate::fusion::{ComplementaryFilter, FilterPhase, FilterState, DEFAULT_ALPHA};

/// Re-export of commonly used types
pub mod prelude {
    pub use crate::calibration::{AlphaCandidates, AlphaOptimizer, CalibrationReport};
    pub use crate::config::FusionConfig;
    pub use crate::fusion::{ComplementaryFilter, FilterPhase};
    pub use crate::metrics::{mean_absolute_error, ErrorSummary};
    pub use crate::utils::{
        error::{Error, Result},
        init_logging,
    };
}
