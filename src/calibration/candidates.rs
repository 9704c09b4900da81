//! Ordered sets of alpha values for the calibration grid search.

use serde::{Deserialize, Serialize};

use crate::fusion::validate_alpha;
use crate::utils::error::{Error, Result};

/// Number of values in [`AlphaCandidates::default_grid`].
pub const DEFAULT_GRID_SIZE: usize = 100;

/// Largest grid `linspace` and `arange` will build.
pub const MAX_GRID_SIZE: usize = 1_000_000;

fn check_grid_size(points: f64) -> Result<()> {
    if points > MAX_GRID_SIZE as f64 {
        return Err(Error::InvalidParameter(format!(
            "candidate grid of {} points exceeds the limit of {}",
            points, MAX_GRID_SIZE
        )));
    }
    Ok(())
}

/// Non-empty, ordered list of alpha values, each in `[0, 1]`.
///
/// Order matters: the optimizer resolves ties in favour of the earliest value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct AlphaCandidates(Vec<f64>);

impl AlphaCandidates {
    /// `0.00, 0.01, ..., 0.99`.
    pub fn default_grid() -> Self {
        Self(
            (0..DEFAULT_GRID_SIZE)
                .map(|i| i as f64 / DEFAULT_GRID_SIZE as f64)
                .collect(),
        )
    }

    /// Use the given values as-is, in the given order.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::InvalidParameter(
                "alpha candidate set is empty".to_string(),
            ));
        }
        for &alpha in &values {
            validate_alpha(alpha)?;
        }
        Ok(Self(values))
    }

    /// `count` evenly spaced values from `start` to `stop`, both inclusive.
    ///
    /// `start > stop` gives a descending grid.
    pub fn linspace(start: f64, stop: f64, count: usize) -> Result<Self> {
        validate_alpha(start)?;
        validate_alpha(stop)?;
        check_grid_size(count as f64)?;

        let (lo, hi) = (start.min(stop), start.max(stop));
        let values = match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let last = (count - 1) as f64;
                let mut values: Vec<f64> = (0..count)
                    .map(|i| (start + (stop - start) * (i as f64 / last)).clamp(lo, hi))
                    .collect();
                values[count - 1] = stop;
                values
            }
        };
        Self::from_values(values)
    }

    /// Values `start + i * step` strictly below `stop`.
    pub fn arange(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "candidate step must be positive, got {}",
                step
            )));
        }
        if !stop.is_finite() {
            return Err(Error::InvalidParameter(
                "candidate range bounds must be finite".to_string(),
            ));
        }
        validate_alpha(start)?;
        // the last value is at least `stop - step`
        if stop > 1.0 + step {
            return Err(Error::InvalidParameter(format!(
                "candidate range stop {} would produce alphas above 1",
                stop
            )));
        }

        // Tolerance keeps e.g. (0, 1, 0.01) at 100 values despite rounding.
        let span = (stop - start) / step;
        check_grid_size(span)?;
        let count = if span > 0.0 { (span - 1e-9).ceil() as usize } else { 0 };
        Self::from_values((0..count).map(|i| start + i as f64 * step).collect())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }
}

impl Default for AlphaCandidates {
    fn default() -> Self {
        Self::default_grid()
    }
}

impl TryFrom<Vec<f64>> for AlphaCandidates {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::from_values(values)
    }
}

impl From<AlphaCandidates> for Vec<f64> {
    fn from(candidates: AlphaCandidates) -> Self {
        candidates.0
    }
}

impl<'a> IntoIterator for &'a AlphaCandidates {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let grid = AlphaCandidates::default_grid();
        assert_eq!(grid.len(), 100);
        assert_eq!(grid.as_slice()[0], 0.0);
        assert_eq!(grid.as_slice()[1], 0.01);
        assert_eq!(grid.as_slice()[99], 0.99);
        assert!(grid.iter().all(|&a| a < 1.0));
    }

    #[test]
    fn test_arange_matches_half_open_grid() {
        let grid = AlphaCandidates::arange(0.0, 1.0, 0.01).unwrap();
        assert_eq!(grid.len(), 100);
        assert!((grid.as_slice()[99] - 0.99).abs() < 1e-12);

        let coarse = AlphaCandidates::arange(0.0, 1.0, 0.25).unwrap();
        assert_eq!(coarse.as_slice(), &[0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_linspace_inclusive() {
        let grid = AlphaCandidates::linspace(0.0, 1.0, 5).unwrap();
        assert_eq!(grid.as_slice(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(AlphaCandidates::linspace(0.3, 0.9, 1).unwrap().as_slice(), &[0.3]);
    }

    #[test]
    fn test_rejects_bad_sets() {
        assert!(AlphaCandidates::from_values(vec![]).is_err());
        assert!(AlphaCandidates::from_values(vec![0.5, 1.5]).is_err());
        assert!(AlphaCandidates::linspace(0.0, 1.0, 0).is_err());
        assert!(AlphaCandidates::arange(0.0, 1.0, 0.0).is_err());
        assert!(AlphaCandidates::arange(0.5, 0.5, 0.1).is_err());
        assert!(AlphaCandidates::arange(0.0, 2.0, 0.5).is_err());
    }

    #[test]
    fn test_arange_rejects_huge_grids_without_allocating() {
        assert!(matches!(
            AlphaCandidates::arange(0.0, 1e30, 1.0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            AlphaCandidates::arange(0.0, 1.0, 1e-20),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            AlphaCandidates::arange(-0.5, 1.0, 0.1),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            AlphaCandidates::arange(0.0, f64::INFINITY, 0.1),
            Err(Error::InvalidParameter(_))
        ));
        assert_eq!(AlphaCandidates::arange(0.0, 1.0, 1e-5).unwrap().len(), 100_000);
    }

    #[test]
    fn test_linspace_bounds() {
        let descending = AlphaCandidates::linspace(1.0, 0.0, 3).unwrap();
        assert_eq!(descending.as_slice(), &[1.0, 0.5, 0.0]);

        assert!(AlphaCandidates::linspace(0.0, 2.0, 3).is_err());
        assert!(AlphaCandidates::linspace(-1.0, 1.0, 3).is_err());
        assert!(AlphaCandidates::linspace(0.0, 1.0, MAX_GRID_SIZE + 1).is_err());
        assert!(AlphaCandidates::linspace(0.0, 1.0, usize::MAX).is_err());

        let fine = AlphaCandidates::linspace(0.3, 1.0, 1001).unwrap();
        assert!(fine.iter().all(|&a| (0.3..=1.0).contains(&a)));
        assert_eq!(fine.as_slice()[1000], 1.0);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: AlphaCandidates = serde_json::from_str("[0.1, 0.2]").unwrap();
        assert_eq!(ok.as_slice(), &[0.1, 0.2]);
        assert!(serde_json::from_str::<AlphaCandidates>("[0.1, 3.0]").is_err());
        assert!(serde_json::from_str::<AlphaCandidates>("[]").is_err());
    }
}
