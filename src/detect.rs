//! Interval-based anomaly flagging.
//!
//! Held-out observations falling outside a forecast quantile band are
//! anomaly candidates: the model, given the preceding context, did not
//! consider them plausible.

use crate::core::Prediction;
use crate::error::{ClientError, Result};

/// Flag observations outside a (lower, upper) band.
///
/// `flags[i]` is true when `actual[i]` lies strictly below `lower[i]`
/// or strictly above `upper[i]`. NaN bounds flag nothing.
pub fn outside_interval(actual: &[f64], lower: &[f64], upper: &[f64]) -> Result<Vec<bool>> {
    if lower.len() != actual.len() {
        return Err(ClientError::DimensionMismatch {
            expected: actual.len(),
            got: lower.len(),
        });
    }
    if upper.len() != actual.len() {
        return Err(ClientError::DimensionMismatch {
            expected: actual.len(),
            got: upper.len(),
        });
    }

    Ok(actual
        .iter()
        .zip(lower.iter().zip(upper.iter()))
        .map(|(&a, (&lo, &hi))| {
            if a.is_nan() || lo.is_nan() || hi.is_nan() {
                false
            } else {
                a < lo || a > hi
            }
        })
        .collect())
}

/// Flag a held-out horizon against a prediction's quantile band.
///
/// Returns `None` when the prediction does not carry both quantiles.
/// The default band for decile-producing endpoints is `p10`/`p90`.
pub fn flag_horizon(
    actual: &[f64],
    prediction: &Prediction,
    lower: &str,
    upper: &str,
) -> Option<Result<Vec<bool>>> {
    let (lo, hi) = prediction.interval(lower, upper)?;
    let take = actual.len().min(lo.len()).min(hi.len());
    Some(outside_interval(&actual[..take], &lo[..take], &hi[..take]))
}

/// Fraction of flagged observations.
pub fn anomaly_rate(flags: &[bool]) -> f64 {
    if flags.is_empty() {
        return 0.0;
    }
    flags.iter().filter(|&&f| f).count() as f64 / flags.len() as f64
}
