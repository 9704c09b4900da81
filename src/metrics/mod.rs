//! Error metrics between an estimated sequence and ground truth.
//!
//! Mean absolute error is the criterion the alpha search minimizes; the others
//! are reported alongside it.

use serde::Serialize;

use crate::fusion::check_paired;
use crate::utils::error::{Error, Result};

/// Summary of how far an estimate is from the truth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorSummary {
    pub mae: f64,
    pub rmse: f64,
    pub max_abs: f64,
}

impl ErrorSummary {
    /// Compute all metrics in a single pass.
    pub fn compute(estimate: &[f64], truth: &[f64]) -> Result<Self> {
        validate(estimate, truth)?;

        let n = estimate.len() as f64;
        let mut abs_sum = 0.0;
        let mut sq_sum = 0.0;
        let mut max_abs: f64 = 0.0;
        for (e, t) in estimate.iter().zip(truth) {
            let diff = (e - t).abs();
            abs_sum += diff;
            sq_sum += diff * diff;
            max_abs = max_abs.max(diff);
        }

        Ok(Self {
            mae: abs_sum / n,
            rmse: (sq_sum / n).sqrt(),
            max_abs,
        })
    }
}

/// Mean of `|estimate[i] - truth[i]|`.
pub fn mean_absolute_error(estimate: &[f64], truth: &[f64]) -> Result<f64> {
    validate(estimate, truth)?;
    let sum: f64 = estimate.iter().zip(truth).map(|(e, t)| (e - t).abs()).sum();
    Ok(sum / estimate.len() as f64)
}

/// Square root of the mean squared difference.
pub fn root_mean_squared_error(estimate: &[f64], truth: &[f64]) -> Result<f64> {
    validate(estimate, truth)?;
    let sum: f64 = estimate.iter().zip(truth).map(|(e, t)| (e - t).powi(2)).sum();
    Ok((sum / estimate.len() as f64).sqrt())
}

fn validate(estimate: &[f64], truth: &[f64]) -> Result<()> {
    check_paired(estimate, truth)?;
    if estimate.is_empty() {
        return Err(Error::InsufficientData(
            "cannot compute an error over empty sequences".to_string(),
        ));
    }
    Ok(())
}
