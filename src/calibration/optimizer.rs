//! Brute-force search for the blend coefficient.
//!
//! Every candidate is replayed over the full calibration history on its own
//! fresh filter and scored by mean absolute error against ground truth. The
//! first candidate (in candidate order) reaching the lowest error wins, so the
//! result is the same whether scoring runs sequentially or on rayon.

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use super::candidates::AlphaCandidates;
use crate::config::CalibrationConfig;
use crate::fusion::{check_paired, ComplementaryFilter};
use crate::metrics::ErrorSummary;
use crate::utils::error::{Error, Result};

/// Error of one candidate alpha over the calibration history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateScore {
    pub alpha: f64,
    /// Mean absolute error, the selection criterion
    pub mae: f64,
    pub rmse: f64,
    /// Worst single-sample deviation
    pub max_abs: f64,
}

/// Outcome of an alpha search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationReport {
    pub best_alpha: f64,
    /// Mean absolute error achieved by `best_alpha`
    pub best_error: f64,
    /// Scores for every candidate, in candidate order
    pub scores: Vec<CandidateScore>,
}

/// Grid search over a fixed set of alpha candidates.
#[derive(Debug, Clone, Default)]
pub struct AlphaOptimizer {
    candidates: AlphaCandidates,
    parallel: bool,
}

impl AlphaOptimizer {
    pub fn new(candidates: AlphaCandidates) -> Self {
        Self {
            candidates,
            parallel: false,
        }
    }

    /// Build the optimizer described by a `[calibration]` config section.
    pub fn from_config(config: &CalibrationConfig) -> Result<Self> {
        Ok(Self::new(config.candidates()?).with_parallel(config.parallel))
    }

    /// Score candidates on the rayon thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn candidates(&self) -> &AlphaCandidates {
        &self.candidates
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Score every candidate and pick the best.
    ///
    /// All three sequences must have the same, non-zero length; this is
    /// checked before any candidate is evaluated.
    pub fn evaluate(
        &self,
        signal1: &[f64],
        signal2: &[f64],
        truth: &[f64],
    ) -> Result<CalibrationReport> {
        check_paired(signal1, signal2)?;
        check_paired(signal1, truth)?;
        if signal1.is_empty() {
            return Err(Error::InsufficientData(
                "calibration history is empty".to_string(),
            ));
        }

        debug!(
            "evaluating {} alpha candidates over {} samples (parallel={})",
            self.candidates.len(),
            signal1.len(),
            self.parallel
        );

        let candidates = self.candidates.as_slice();
        let scores = if self.parallel {
            candidates
                .par_iter()
                .map(|&alpha| score_candidate(alpha, signal1, signal2, truth))
                .collect::<Result<Vec<_>>>()?
        } else {
            candidates
                .iter()
                .map(|&alpha| score_candidate(alpha, signal1, signal2, truth))
                .collect::<Result<Vec<_>>>()?
        };

        let best = select_best(&scores).ok_or_else(|| {
            Error::InsufficientData(
                "no alpha candidate produced a finite error".to_string(),
            )
        })?;

        info!(
            "calibrated alpha={} (mae={:.6}) out of {} candidates",
            best.alpha,
            best.mae,
            scores.len()
        );

        Ok(CalibrationReport {
            best_alpha: best.alpha,
            best_error: best.mae,
            scores,
        })
    }
}

fn score_candidate(
    alpha: f64,
    signal1: &[f64],
    signal2: &[f64],
    truth: &[f64],
) -> Result<CandidateScore> {
    let mut filter = ComplementaryFilter::new(alpha)?;
    let fused = filter.fuse_sequence(signal1, signal2, None)?;
    let summary = ErrorSummary::compute(&fused, truth)?;

    debug!(
        "alpha={:.4} mae={:.6} rmse={:.6} max_abs={:.6}",
        alpha, summary.mae, summary.rmse, summary.max_abs
    );

    Ok(CandidateScore {
        alpha,
        mae: summary.mae,
        rmse: summary.rmse,
        max_abs: summary.max_abs,
    })
}

/// First score with the strictly lowest error. NaN never wins.
fn select_best(scores: &[CandidateScore]) -> Option<CandidateScore> {
    let mut best = None;
    let mut min_error = f64::INFINITY;
    for score in scores {
        if score.mae < min_error {
            min_error = score.mae;
            best = Some(*score);
        }
    }
    best
}
