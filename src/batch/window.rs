//! Sliding-window example generation.
//!
//! Turns per-entity series into fixed-size (context, horizon) examples.
//! Consecutive windows for one entity are spaced exactly `horizon_len`
//! apart, so held-out horizons never overlap while contexts may.

use crate::core::EntitySeries;
use crate::error::{ClientError, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Window and batch geometry for one batching run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Number of historical observations fed to the model.
    pub context_len: usize,
    /// Number of future steps to forecast and hold out.
    pub horizon_len: usize,
    /// Maximum number of examples per request batch.
    pub batch_size: usize,
}

impl WindowConfig {
    /// Create a validated configuration.
    pub fn new(context_len: usize, horizon_len: usize, batch_size: usize) -> Result<Self> {
        let config = Self {
            context_len,
            horizon_len,
            batch_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject non-positive window parameters before any windowing runs.
    pub fn validate(&self) -> Result<()> {
        if self.context_len == 0 {
            return Err(ClientError::InvalidConfiguration(
                "context_len must be positive".to_string(),
            ));
        }
        if self.horizon_len == 0 {
            return Err(ClientError::InvalidConfiguration(
                "horizon_len must be positive".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ClientError::InvalidConfiguration(
                "batch_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Full span of one window: context plus held-out horizon.
    pub fn window_len(&self) -> usize {
        self.context_len + self.horizon_len
    }

    /// Number of examples one series of length `n` contributes.
    pub fn examples_in(&self, n: usize) -> usize {
        if n < self.window_len() {
            0
        } else {
            1 + (n - self.window_len()) / self.horizon_len
        }
    }
}

/// One windowed training/inference example.
///
/// The target context and timestamps cover `[start, start + C)`; the
/// held-out truth covers `[start + C, start + C + H)`. Dynamic covariates
/// are future-known and span the whole window `[start, start + C + H)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// Key of the source entity.
    pub entity_key: String,
    /// Start offset of this window within the source series.
    pub start: usize,
    /// Target history handed to the model.
    pub context: Vec<f64>,
    /// Held-out future values for evaluation.
    pub horizon_truth: Vec<f64>,
    /// Timestamps aligned with `context`.
    pub context_timestamps: Vec<DateTime<Utc>>,
    /// Dynamic numerical covariates over the full window.
    pub numerical_covariates: BTreeMap<String, Vec<f64>>,
    /// Dynamic categorical covariates over the full window.
    pub categorical_covariates: BTreeMap<String, Vec<String>>,
    /// Static per-entity attributes.
    pub static_attributes: BTreeMap<String, String>,
}

/// Lazy iterator over every example the input series produce.
///
/// Entities are visited in input order; per-entity windows in ascending
/// start offset. State is one entity cursor and one offset.
#[derive(Debug, Clone)]
pub struct ExampleWindows<'a> {
    series: &'a [EntitySeries],
    context_len: usize,
    horizon_len: usize,
    entity: usize,
    offset: usize,
}

impl<'a> ExampleWindows<'a> {
    fn cut(&self, series: &EntitySeries, start: usize) -> Example {
        let context_end = start + self.context_len;
        let window_end = context_end + self.horizon_len;

        let numerical_covariates = series
            .numerical_covariates()
            .iter()
            .map(|(name, column)| (name.clone(), column[start..window_end].to_vec()))
            .collect();
        let categorical_covariates = series
            .categorical_covariates()
            .iter()
            .map(|(name, column)| (name.clone(), column[start..window_end].to_vec()))
            .collect();

        Example {
            entity_key: series.key().to_string(),
            start,
            context: series.values()[start..context_end].to_vec(),
            horizon_truth: series.values()[context_end..window_end].to_vec(),
            context_timestamps: series.timestamps()[start..context_end].to_vec(),
            numerical_covariates,
            categorical_covariates,
            static_attributes: series.static_attributes().clone(),
        }
    }
}

impl<'a> Iterator for ExampleWindows<'a> {
    type Item = Example;

    fn next(&mut self) -> Option<Example> {
        loop {
            let series = self.series.get(self.entity)?;
            let window_end = self.offset + self.context_len + self.horizon_len;
            if window_end <= series.len() {
                let example = self.cut(series, self.offset);
                self.offset += self.horizon_len;
                return Some(example);
            }
            // Entity exhausted (possibly contributing zero examples).
            self.entity += 1;
            self.offset = 0;
        }
    }
}

/// Validate the run and return the lazy window iterator.
///
/// Fails fast on non-positive window parameters, on any series whose
/// covariate columns disagree with its target length, and on series
/// whose covariate names differ between entities (batches assume
/// uniform field presence). A series shorter than one full window
/// contributes zero examples and is not an error.
pub fn example_windows<'a>(
    series: &'a [EntitySeries],
    config: &WindowConfig,
) -> Result<ExampleWindows<'a>> {
    config.validate()?;

    for s in series {
        s.validate()?;
    }

    if let Some(first) = series.first() {
        for s in &series[1..] {
            if let Some((entity, field)) =
                missing_field(first, s).or_else(|| missing_field(s, first))
            {
                return Err(ClientError::MissingCovariate { entity, field });
            }
        }
    }

    Ok(ExampleWindows {
        series,
        context_len: config.context_len,
        horizon_len: config.horizon_len,
        entity: 0,
        offset: 0,
    })
}

/// First covariate name present on `a` but absent on `b`, if any.
fn missing_field(a: &EntitySeries, b: &EntitySeries) -> Option<(String, String)> {
    for name in a.numerical_covariates().keys() {
        if b.numerical_covariate(name).is_none() {
            return Some((b.key().to_string(), name.clone()));
        }
    }
    for name in a.categorical_covariates().keys() {
        if b.categorical_covariate(name).is_none() {
            return Some((b.key().to_string(), name.clone()));
        }
    }
    None
}

/// Materialize every example in output order.
pub fn build_examples(series: &[EntitySeries], config: &WindowConfig) -> Result<Vec<Example>> {
    Ok(example_windows(series, config)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn make_series(key: &str, values: Vec<f64>) -> EntitySeries {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..values.len())
            .map(|i| base + Duration::hours(i as i64))
            .collect();
        EntitySeries::new(key, timestamps, values).unwrap()
    }

    fn config(c: usize, h: usize, b: usize) -> WindowConfig {
        WindowConfig::new(c, h, b).unwrap()
    }

    #[test]
    fn rejects_non_positive_parameters() {
        assert!(matches!(
            WindowConfig::new(0, 2, 8),
            Err(ClientError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            WindowConfig::new(5, 0, 8),
            Err(ClientError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            WindowConfig::new(5, 2, 0),
            Err(ClientError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn windows_series_of_ten_with_context_five_horizon_two() {
        // Offsets 0 and 2: 0+5+2 <= 10, 2+5+2 <= 10, 4+5+2 = 11 > 10 stops.
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let series = vec![make_series("A", values)];
        let examples = build_examples(&series, &config(5, 2, 8)).unwrap();

        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].start, 0);
        assert_eq!(examples[0].context, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(examples[0].horizon_truth, vec![5.0, 6.0]);
        assert_eq!(examples[1].start, 2);
        assert_eq!(examples[1].context, vec![2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(examples[1].horizon_truth, vec![7.0, 8.0]);
    }

    #[test]
    fn short_series_contributes_zero_examples() {
        // 5 + 2 = 7 > 6.
        let series = vec![make_series("A", (0..6).map(|i| i as f64).collect())];
        let examples = build_examples(&series, &config(5, 2, 8)).unwrap();
        assert!(examples.is_empty());
    }

    #[test]
    fn exact_window_length_contributes_one_example() {
        let series = vec![make_series("A", (0..7).map(|i| i as f64).collect())];
        let examples = build_examples(&series, &config(5, 2, 8)).unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].start, 0);
    }

    #[test]
    fn example_count_matches_closed_form() {
        for n in 0..40 {
            let series = vec![make_series("A", (0..n).map(|i| i as f64).collect())];
            let cfg = config(5, 3, 8);
            let examples = build_examples(&series, &cfg).unwrap();
            assert_eq!(examples.len(), cfg.examples_in(n), "n = {n}");
        }
    }

    #[test]
    fn entities_stay_in_block_sequential_order() {
        let series = vec![
            make_series("A", (0..10).map(|i| i as f64).collect()),
            make_series("B", (0..6).map(|i| i as f64).collect()), // zero examples
            make_series("C", (0..9).map(|i| i as f64).collect()),
        ];
        let examples = build_examples(&series, &config(5, 2, 8)).unwrap();

        let order: Vec<(&str, usize)> = examples
            .iter()
            .map(|e| (e.entity_key.as_str(), e.start))
            .collect();
        assert_eq!(order, vec![("A", 0), ("A", 2), ("C", 0), ("C", 2)]);
    }

    #[test]
    fn covariates_span_the_full_window() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let n = 8;
        let series = vec![EntitySeries::builder("FR")
            .timestamps((0..n).map(|i| base + Duration::hours(i as i64)).collect())
            .values((0..n).map(|i| i as f64).collect())
            .numerical_covariate("gen_forecast", (0..n).map(|i| i as f64 * 10.0).collect())
            .categorical_covariate(
                "week_day",
                (0..n).map(|i| format!("d{}", i % 7)).collect(),
            )
            .static_attribute("country", "FR")
            .build()
            .unwrap()];

        let examples = build_examples(&series, &config(5, 2, 8)).unwrap();
        assert_eq!(examples.len(), 2);

        let first = &examples[0];
        assert_eq!(first.context.len(), 5);
        assert_eq!(first.context_timestamps.len(), 5);
        // Future-known: covariates cover context plus horizon.
        assert_eq!(first.numerical_covariates["gen_forecast"].len(), 7);
        assert_eq!(
            first.numerical_covariates["gen_forecast"],
            vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]
        );
        assert_eq!(first.categorical_covariates["week_day"].len(), 7);
        assert_eq!(first.static_attributes["country"], "FR");

        let second = &examples[1];
        assert_eq!(
            second.numerical_covariates["gen_forecast"],
            vec![20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0]
        );
    }

    #[test]
    fn covariate_names_must_match_across_entities() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<_> = (0..8).map(|i| base + Duration::hours(i)).collect();
        let with_cov = EntitySeries::builder("A")
            .timestamps(timestamps.clone())
            .values((0..8).map(|i| i as f64).collect())
            .numerical_covariate("gen_forecast", vec![0.0; 8])
            .build()
            .unwrap();
        let without_cov = EntitySeries::new("B", timestamps, (0..8).map(|i| i as f64).collect()).unwrap();

        let result = build_examples(&[with_cov, without_cov], &config(5, 2, 8));
        assert!(matches!(
            result,
            Err(ClientError::MissingCovariate { ref entity, ref field })
                if entity == "B" && field == "gen_forecast"
        ));
    }

    #[test]
    fn windowing_is_deterministic() {
        let series = vec![
            make_series("A", (0..20).map(|i| (i as f64).sin()).collect()),
            make_series("B", (0..15).map(|i| (i as f64).cos()).collect()),
        ];
        let cfg = config(6, 3, 4);
        let first = build_examples(&series, &cfg).unwrap();
        let second = build_examples(&series, &cfg).unwrap();
        assert_eq!(first, second);
    }
}
