//! Parsed prediction responses from a hosted forecasting endpoint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One instance's forecast as returned by the endpoint.
///
/// The serving container replies with a `point_forecast` series, the
/// context timestamps echoed back when the request carried them, and a
/// set of decile series keyed `p10` through `p90`. Unknown numeric
/// series are kept rather than dropped so new quantile keys survive a
/// round-trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Prediction {
    /// Point (mean) forecast, one value per horizon step.
    pub point_forecast: Vec<f64>,

    /// Context timestamps echoed by the endpoint, ISO-8601 strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Vec<String>>,

    /// Quantile forecasts keyed by name (`p10`, `p20`, ... `p90`).
    #[serde(flatten)]
    pub quantiles: BTreeMap<String, Vec<f64>>,
}

impl Prediction {
    /// Create a prediction from point values only.
    pub fn from_point(point_forecast: Vec<f64>) -> Self {
        Self {
            point_forecast,
            timestamp: None,
            quantiles: BTreeMap::new(),
        }
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.point_forecast.len()
    }

    /// Check if the prediction is empty.
    pub fn is_empty(&self) -> bool {
        self.point_forecast.is_empty()
    }

    /// Get one quantile series by name.
    pub fn quantile(&self, name: &str) -> Option<&[f64]> {
        self.quantiles.get(name).map(|v| v.as_slice())
    }

    /// Get a (lower, upper) interval pair, present only when both
    /// quantile series exist.
    pub fn interval(&self, lower: &str, upper: &str) -> Option<(&[f64], &[f64])> {
        match (self.quantile(lower), self.quantile(upper)) {
            (Some(lo), Some(hi)) => Some((lo, hi)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_parses_point_and_quantiles() {
        let body = r#"{
            "point_forecast": [10.0, 11.0],
            "timestamp": ["2024-01-01T00:00:00", "2024-01-01T01:00:00"],
            "p10": [8.0, 9.0],
            "p90": [12.0, 13.0]
        }"#;

        let prediction: Prediction = serde_json::from_str(body).unwrap();
        assert_eq!(prediction.horizon(), 2);
        assert_eq!(prediction.point_forecast, vec![10.0, 11.0]);
        assert_eq!(prediction.quantile("p10"), Some([8.0, 9.0].as_slice()));
        assert_eq!(prediction.quantile("p50"), None);

        let (lo, hi) = prediction.interval("p10", "p90").unwrap();
        assert_eq!(lo, [8.0, 9.0]);
        assert_eq!(hi, [12.0, 13.0]);
    }

    #[test]
    fn prediction_interval_requires_both_bounds() {
        let mut prediction = Prediction::from_point(vec![1.0]);
        prediction.quantiles.insert("p10".to_string(), vec![0.5]);
        assert!(prediction.interval("p10", "p90").is_none());
    }

    #[test]
    fn prediction_serializes_without_timestamp_when_absent() {
        let prediction = Prediction::from_point(vec![1.0, 2.0]);
        let body = serde_json::to_string(&prediction).unwrap();
        assert!(!body.contains("timestamp"));
    }
}
