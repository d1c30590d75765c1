//! Accuracy metrics for forecast evaluation.

use crate::core::Prediction;
use crate::error::{ClientError, Result};

/// Accuracy of a point forecast against held-out observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

/// Calculate accuracy metrics between actual and predicted values.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ClientError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(ClientError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let n = actual.len() as f64;

    let mae: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n;

    let mse: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;

    let smape: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| {
            let denom = a.abs() + p.abs();
            if denom == 0.0 {
                0.0
            } else {
                2.0 * (a - p).abs() / denom
            }
        })
        .sum::<f64>()
        * 100.0
        / n;

    Ok(AccuracyMetrics {
        mae,
        rmse: mse.sqrt(),
        smape,
    })
}

/// Accuracy of a batch of predictions against their held-out horizons.
///
/// Each prediction is compared over its truth's length; predictions
/// shorter than the truth fail with a dimension mismatch. Pairs whose
/// truth is empty (pure-inference examples) are skipped.
pub fn batch_accuracy(truths: &[Vec<f64>], predictions: &[Prediction]) -> Result<AccuracyMetrics> {
    if truths.len() != predictions.len() {
        return Err(ClientError::DimensionMismatch {
            expected: truths.len(),
            got: predictions.len(),
        });
    }

    let mut actual = Vec::new();
    let mut predicted = Vec::new();
    for (truth, prediction) in truths.iter().zip(predictions) {
        if truth.is_empty() {
            continue;
        }
        if prediction.point_forecast.len() < truth.len() {
            return Err(ClientError::DimensionMismatch {
                expected: truth.len(),
                got: prediction.point_forecast.len(),
            });
        }
        actual.extend_from_slice(truth);
        predicted.extend_from_slice(&prediction.point_forecast[..truth.len()]);
    }

    calculate_metrics(&actual, &predicted)
}
