//! Timestamp spacing inference and horizon timelines.

use crate::error::{ClientError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Infer the spacing between observations from their timestamps.
///
/// Uses the modal (most common) difference between consecutive
/// timestamps. `tolerance` is the minimum fraction of gaps that must
/// share the modal spacing for the inference to be accepted.
pub fn infer_spacing(timestamps: &[DateTime<Utc>], tolerance: f64) -> Result<Duration> {
    if timestamps.len() < 2 {
        return Err(ClientError::TimestampError(format!(
            "need at least 2 timestamps to infer spacing, got {}",
            timestamps.len()
        )));
    }

    let diffs: Vec<i64> = timestamps
        .windows(2)
        .map(|w| (w[1] - w[0]).num_seconds())
        .collect();

    let mut counts: HashMap<i64, usize> = HashMap::new();
    for &diff in &diffs {
        *counts.entry(diff).or_insert(0) += 1;
    }

    let (modal_diff, modal_count) = counts
        .iter()
        .max_by_key(|(&diff, &count)| (count, std::cmp::Reverse(diff)))
        .map(|(&diff, &count)| (diff, count))
        .ok_or_else(|| ClientError::TimestampError("empty spacing data".to_string()))?;

    let modal_ratio = modal_count as f64 / diffs.len() as f64;
    if modal_ratio < tolerance {
        return Err(ClientError::TimestampError(
            "no unique modal spacing found".to_string(),
        ));
    }

    Ok(Duration::seconds(modal_diff))
}

/// Extend a context timeline across the forecast horizon.
///
/// Returns `horizon` timestamps following the last context timestamp at
/// the series' inferred spacing.
pub fn horizon_timeline(
    timestamps: &[DateTime<Utc>],
    horizon: usize,
    tolerance: f64,
) -> Result<Vec<DateTime<Utc>>> {
    let spacing = infer_spacing(timestamps, tolerance)?;
    let last = timestamps
        .last()
        .copied()
        .ok_or(ClientError::EmptyData)?;
    Ok((1..=horizon as i32).map(|i| last + spacing * i).collect())
}
