//! Streaming complementary filter.
//!
//! Fuses two synchronized scalar readings of the same quantity:
//!
//! - `signal1` has low noise but a slowly drifting bias (e.g. an integrated
//!   odometer or gyro). Only its *changes* are trusted.
//! - `signal2` has no long-term bias but a lot of noise (e.g. GPS or an
//!   accelerometer). Its *absolute value* pulls the estimate back.
//!
//! ```text
//! fused = (1 - alpha) * (fused_prev + (signal1 - signal1_prev)) + alpha * signal2
//! ```
//!
//! Small alpha keeps the estimate smooth but lets drift accumulate, large alpha
//! removes drift but lets noise through.

use log::trace;
use serde::Serialize;
use ta::{Next, Reset};

use crate::calibration::{AlphaCandidates, AlphaOptimizer, CalibrationReport};
use crate::config::FusionConfig;
use crate::utils::error::{Error, Result};

/// Blend coefficient used when none is supplied.
pub const DEFAULT_ALPHA: f64 = 0.1;

/// Check that `alpha` lies in `[0, 1]`. NaN is rejected.
pub fn validate_alpha(alpha: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(alpha)
    } else {
        Err(Error::invalid_alpha(alpha))
    }
}

/// Check that two index-paired sequences have the same length.
pub(crate) fn check_paired(reference: &[f64], other: &[f64]) -> Result<()> {
    if reference.len() != other.len() {
        return Err(Error::DimensionMismatch {
            expected: reference.len(),
            actual: other.len(),
        });
    }
    Ok(())
}

/// Lifecycle phase of a [`ComplementaryFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterPhase {
    /// No sample has been seen since construction or the last reset.
    Uninitialized,
    /// A prior estimate and a prior `signal1` reading are held.
    Running,
}

/// Values remembered between two fuse calls. They only exist together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct Memory {
    fused_estimate: f64,
    previous_signal1: f64,
}

/// Snapshot of the filter's internal state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterState {
    alpha: f64,
    memory: Option<Memory>,
}

impl FilterState {
    fn new(alpha: f64) -> Self {
        Self { alpha, memory: None }
    }

    /// Stored blend coefficient.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current fused estimate, `None` before the first sample.
    pub fn fused_estimate(&self) -> Option<f64> {
        self.memory.map(|m| m.fused_estimate)
    }

    /// Last raw `signal1` reading, `None` before the first sample.
    pub fn previous_signal1(&self) -> Option<f64> {
        self.memory.map(|m| m.previous_signal1)
    }

    pub fn is_initialized(&self) -> bool {
        self.memory.is_some()
    }

    pub fn phase(&self) -> FilterPhase {
        if self.is_initialized() {
            FilterPhase::Running
        } else {
            FilterPhase::Uninitialized
        }
    }
}

/// Complementary filter fusing a drifting signal with a noisy one.
///
/// Each instance fuses a single axis; fuse several axes with several filters.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplementaryFilter {
    state: FilterState,
}

impl Default for ComplementaryFilter {
    fn default() -> Self {
        Self {
            state: FilterState::new(DEFAULT_ALPHA),
        }
    }
}

impl ComplementaryFilter {
    /// Create a filter with the given blend coefficient.
    pub fn new(alpha: f64) -> Result<Self> {
        Ok(Self {
            state: FilterState::new(validate_alpha(alpha)?),
        })
    }

    /// Create a filter from a validated configuration.
    pub fn from_config(config: &FusionConfig) -> Result<Self> {
        Self::new(config.alpha)
    }

    pub fn alpha(&self) -> f64 {
        self.state.alpha
    }

    /// Replace the stored blend coefficient. The running estimate is kept.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<()> {
        self.state.alpha = validate_alpha(alpha)?;
        Ok(())
    }

    /// Current fused estimate, `None` until the first sample pair is fused.
    pub fn estimate(&self) -> Option<f64> {
        self.state.fused_estimate()
    }

    pub fn previous_signal1(&self) -> Option<f64> {
        self.state.previous_signal1()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    pub fn phase(&self) -> FilterPhase {
        self.state.phase()
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Forget the running estimate. The stored alpha is kept.
    pub fn reset(&mut self) {
        self.state.memory = None;
    }

    /// Fuse one synchronized pair of readings using the stored alpha.
    ///
    /// The first call after construction or [`reset`](Self::reset) returns
    /// `signal2` unchanged and records `signal1` as the reference point.
    /// Non-finite inputs are not checked and propagate through the arithmetic.
    pub fn fuse(&mut self, signal1: f64, signal2: f64) -> f64 {
        self.step(signal1, signal2, self.state.alpha)
    }

    /// Fuse one pair, optionally overriding alpha for this call only.
    pub fn fuse_with(&mut self, signal1: f64, signal2: f64, alpha: Option<f64>) -> Result<f64> {
        let alpha = self.resolve_alpha(alpha)?;
        Ok(self.step(signal1, signal2, alpha))
    }

    /// Fuse a batch of pairs as a continuation of the current stream.
    ///
    /// Unlike [`fuse_sequence`](Self::fuse_sequence) this keeps any prior
    /// estimate. Lengths are checked before any sample is processed.
    pub fn fuse_stream(
        &mut self,
        signal1: &[f64],
        signal2: &[f64],
        alpha: Option<f64>,
    ) -> Result<Vec<f64>> {
        check_paired(signal1, signal2)?;
        let alpha = self.resolve_alpha(alpha)?;

        Ok(signal1
            .iter()
            .zip(signal2)
            .map(|(&s1, &s2)| self.step(s1, s2, alpha))
            .collect())
    }

    /// Reset, then fuse a whole batch of pairs from scratch.
    ///
    /// On error the filter is left untouched.
    pub fn fuse_sequence(
        &mut self,
        signal1: &[f64],
        signal2: &[f64],
        alpha: Option<f64>,
    ) -> Result<Vec<f64>> {
        check_paired(signal1, signal2)?;
        let alpha = self.resolve_alpha(alpha)?;
        self.reset();
        self.fuse_stream(signal1, signal2, Some(alpha))
    }

    /// Pick the alpha that minimizes mean absolute error against `truth` and
    /// store it.
    ///
    /// Uses the default 0.00..=0.99 grid when `candidates` is `None`. On
    /// success the filter is left reset; on error nothing changes.
    pub fn optimize_alpha(
        &mut self,
        signal1: &[f64],
        signal2: &[f64],
        truth: &[f64],
        candidates: Option<AlphaCandidates>,
    ) -> Result<CalibrationReport> {
        let optimizer = AlphaOptimizer::new(candidates.unwrap_or_default());
        self.calibrate(&optimizer, signal1, signal2, truth)
    }

    /// Same as [`optimize_alpha`](Self::optimize_alpha) with a preconfigured
    /// optimizer.
    pub fn calibrate(
        &mut self,
        optimizer: &AlphaOptimizer,
        signal1: &[f64],
        signal2: &[f64],
        truth: &[f64],
    ) -> Result<CalibrationReport> {
        let report = optimizer.evaluate(signal1, signal2, truth)?;
        self.set_alpha(report.best_alpha)?;
        self.reset();
        Ok(report)
    }

    fn resolve_alpha(&self, alpha: Option<f64>) -> Result<f64> {
        match alpha {
            Some(alpha) => validate_alpha(alpha),
            None => Ok(self.state.alpha),
        }
    }

    fn step(&mut self, signal1: f64, signal2: f64, alpha: f64) -> f64 {
        let fused = match self.state.memory {
            None => signal2,
            Some(memory) => {
                let delta = signal1 - memory.previous_signal1;
                (1.0 - alpha) * (memory.fused_estimate + delta) + alpha * signal2
            }
        };

        trace!("fuse s1={} s2={} alpha={} -> {}", signal1, signal2, alpha, fused);

        self.state.memory = Some(Memory {
            fused_estimate: fused,
            previous_signal1: signal1,
        });
        fused
    }
}

impl Next<(f64, f64)> for ComplementaryFilter {
    type Output = f64;

    /// Feed the next `(signal1, signal2)` pair and return the fused value.
    fn next(&mut self, input: (f64, f64)) -> Self::Output {
        let (signal1, signal2) = input;
        self.fuse(signal1, signal2)
    }
}

impl Reset for ComplementaryFilter {
    fn reset(&mut self) {
        self.state.memory = None;
    }
}
