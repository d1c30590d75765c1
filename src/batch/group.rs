//! Field-major grouping of examples into request-sized batches.

use crate::batch::window::Example;
use crate::error::{ClientError, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Up to `batch_size` examples regrouped by field.
///
/// Request payloads are assembled field by field, so a batch stores one
/// ordered column per field rather than a row per example. Column `j`
/// of every field describes the same example.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    entities: Vec<String>,
    inputs: Vec<Vec<f64>>,
    outputs: Vec<Vec<f64>>,
    timestamps: Vec<Vec<DateTime<Utc>>>,
    numerical_covariates: BTreeMap<String, Vec<Vec<f64>>>,
    categorical_covariates: BTreeMap<String, Vec<Vec<String>>>,
    static_attributes: BTreeMap<String, Vec<String>>,
}

impl Batch {
    fn from_examples(examples: Vec<Example>) -> Self {
        let mut batch = Batch::default();
        for example in examples {
            batch.entities.push(example.entity_key);
            batch.inputs.push(example.context);
            batch.outputs.push(example.horizon_truth);
            batch.timestamps.push(example.context_timestamps);
            for (name, column) in example.numerical_covariates {
                batch
                    .numerical_covariates
                    .entry(name)
                    .or_default()
                    .push(column);
            }
            for (name, column) in example.categorical_covariates {
                batch
                    .categorical_covariates
                    .entry(name)
                    .or_default()
                    .push(column);
            }
            for (name, value) in example.static_attributes {
                batch.static_attributes.entry(name).or_default().push(value);
            }
        }
        batch
    }

    /// Number of examples in the batch.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the batch holds no examples.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity key per example.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Context values per example.
    pub fn inputs(&self) -> &[Vec<f64>] {
        &self.inputs
    }

    /// Held-out horizon truth per example.
    pub fn outputs(&self) -> &[Vec<f64>] {
        &self.outputs
    }

    /// Context timestamps per example.
    pub fn timestamps(&self) -> &[Vec<DateTime<Utc>>] {
        &self.timestamps
    }

    /// Dynamic numerical covariate columns, one inner vec per example.
    pub fn numerical_covariates(&self) -> &BTreeMap<String, Vec<Vec<f64>>> {
        &self.numerical_covariates
    }

    /// Dynamic categorical covariate columns, one inner vec per example.
    pub fn categorical_covariates(&self) -> &BTreeMap<String, Vec<Vec<String>>> {
        &self.categorical_covariates
    }

    /// Static attribute columns, one value per example.
    pub fn static_attributes(&self) -> &BTreeMap<String, Vec<String>> {
        &self.static_attributes
    }
}

/// Partition examples into contiguous batches of at most `batch_size`.
///
/// Order is preserved; the final batch holds the remainder when the
/// example count is not a multiple of `batch_size`. Nothing is padded
/// or dropped.
pub fn into_batches(examples: Vec<Example>, batch_size: usize) -> Result<Vec<Batch>> {
    if batch_size == 0 {
        return Err(ClientError::InvalidConfiguration(
            "batch_size must be positive".to_string(),
        ));
    }

    let mut batches = Vec::with_capacity(examples.len().div_ceil(batch_size));
    let mut examples = examples.into_iter().peekable();
    while examples.peek().is_some() {
        let chunk: Vec<Example> = examples.by_ref().take(batch_size).collect();
        batches.push(Batch::from_examples(chunk));
    }
    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn make_example(key: &str, start: usize, value: f64) -> Example {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut numerical = BTreeMap::new();
        numerical.insert("gen_forecast".to_string(), vec![value * 10.0; 4]);
        let mut categorical = BTreeMap::new();
        categorical.insert("week_day".to_string(), vec!["Mon".to_string(); 4]);
        let mut statics = BTreeMap::new();
        statics.insert("country".to_string(), key.to_string());

        Example {
            entity_key: key.to_string(),
            start,
            context: vec![value; 3],
            horizon_truth: vec![value + 1.0],
            context_timestamps: (0..3).map(|i| base + Duration::hours(i)).collect(),
            numerical_covariates: numerical,
            categorical_covariates: categorical,
            static_attributes: statics,
        }
    }

    #[test]
    fn three_examples_with_batch_size_two_split_two_one() {
        let examples = vec![
            make_example("A", 0, 1.0),
            make_example("A", 2, 2.0),
            make_example("B", 0, 3.0),
        ];
        let batches = into_batches(examples, 2).unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[1].len(), 1);
        assert_eq!(batches[0].entities(), ["A", "A"]);
        assert_eq!(batches[1].entities(), ["B"]);
    }

    #[test]
    fn exact_multiple_leaves_no_short_batch() {
        let examples = vec![
            make_example("A", 0, 1.0),
            make_example("A", 2, 2.0),
            make_example("B", 0, 3.0),
            make_example("B", 2, 4.0),
        ];
        let batches = into_batches(examples, 2).unwrap();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 2));
    }

    #[test]
    fn batches_are_field_major() {
        let examples = vec![make_example("A", 0, 1.0), make_example("B", 0, 2.0)];
        let batches = into_batches(examples, 8).unwrap();

        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.inputs()[0], vec![1.0; 3]);
        assert_eq!(batch.inputs()[1], vec![2.0; 3]);
        assert_eq!(batch.outputs()[0], vec![2.0]);
        assert_eq!(batch.numerical_covariates()["gen_forecast"].len(), 2);
        assert_eq!(batch.static_attributes()["country"], ["A", "B"]);
    }

    #[test]
    fn concatenating_batches_reconstructs_the_example_stream() {
        let examples: Vec<Example> = (0..7)
            .map(|i| make_example("A", i * 2, i as f64))
            .collect();
        let batches = into_batches(examples.clone(), 3).unwrap();

        assert_eq!(
            batches.iter().map(Batch::len).collect::<Vec<_>>(),
            vec![3, 3, 1]
        );

        let inputs: Vec<&Vec<f64>> = batches.iter().flat_map(|b| b.inputs()).collect();
        for (example, input) in examples.iter().zip(inputs) {
            assert_eq!(&example.context, input);
        }
    }

    #[test]
    fn empty_example_stream_yields_no_batches() {
        let batches = into_batches(Vec::new(), 4).unwrap();
        assert!(batches.is_empty());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(matches!(
            into_batches(vec![make_example("A", 0, 1.0)], 0),
            Err(ClientError::InvalidConfiguration(_))
        ));
    }
}
