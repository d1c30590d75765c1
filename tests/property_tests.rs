//! Property-based tests for the windowed example batcher.
//!
//! These verify invariants that should hold for all valid inputs,
//! using randomly generated per-entity series and window geometries.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use tsfm_client::batch::{build_examples, into_batches, Batch, WindowConfig};
use tsfm_client::core::EntitySeries;

fn make_series(key: &str, values: Vec<f64>) -> EntitySeries {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let timestamps = (0..values.len())
        .map(|i| base + Duration::minutes(i as i64))
        .collect();
    EntitySeries::new(key, timestamps, values).unwrap()
}

fn make_all(series_values: &[Vec<f64>]) -> Vec<EntitySeries> {
    series_values
        .iter()
        .enumerate()
        .map(|(i, values)| make_series(&format!("entity-{i}"), values.clone()))
        .collect()
}

/// Number of examples one series of length `n` should contribute.
fn expected_count(n: usize, context_len: usize, horizon_len: usize) -> usize {
    if n < context_len + horizon_len {
        0
    } else {
        1 + (n - context_len - horizon_len) / horizon_len
    }
}

/// Strategy for a handful of entities with uneven lengths.
fn entities_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(-1000.0..1000.0_f64, 0..60), 1..5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn example_count_matches_closed_form(
        series_values in entities_strategy(),
        context_len in 1usize..20,
        horizon_len in 1usize..10,
    ) {
        let series = make_all(&series_values);
        let config = WindowConfig::new(context_len, horizon_len, 8).unwrap();
        let examples = build_examples(&series, &config).unwrap();

        let expected: usize = series_values
            .iter()
            .map(|v| expected_count(v.len(), context_len, horizon_len))
            .sum();
        prop_assert_eq!(examples.len(), expected);
    }

    #[test]
    fn offsets_ascend_in_horizon_steps_within_each_entity(
        series_values in entities_strategy(),
        context_len in 1usize..20,
        horizon_len in 1usize..10,
    ) {
        let series = make_all(&series_values);
        let config = WindowConfig::new(context_len, horizon_len, 8).unwrap();
        let examples = build_examples(&series, &config).unwrap();

        let mut previous: Option<(String, usize)> = None;
        for example in &examples {
            prop_assert_eq!(example.context.len(), context_len);
            prop_assert_eq!(example.horizon_truth.len(), horizon_len);
            match &previous {
                Some((entity, start)) if *entity == example.entity_key => {
                    prop_assert_eq!(example.start, start + horizon_len);
                }
                _ => prop_assert_eq!(example.start, 0),
            }
            previous = Some((example.entity_key.clone(), example.start));
        }
    }

    #[test]
    fn windows_slice_the_source_series(
        values in prop::collection::vec(-1000.0..1000.0_f64, 0..80),
        context_len in 1usize..20,
        horizon_len in 1usize..10,
    ) {
        let series = vec![make_series("A", values.clone())];
        let config = WindowConfig::new(context_len, horizon_len, 8).unwrap();
        let examples = build_examples(&series, &config).unwrap();

        for example in &examples {
            let s = example.start;
            prop_assert_eq!(&example.context[..], &values[s..s + context_len]);
            prop_assert_eq!(
                &example.horizon_truth[..],
                &values[s + context_len..s + context_len + horizon_len]
            );
        }
    }

    #[test]
    fn building_twice_yields_identical_output(
        series_values in entities_strategy(),
        context_len in 1usize..20,
        horizon_len in 1usize..10,
    ) {
        let series = make_all(&series_values);
        let config = WindowConfig::new(context_len, horizon_len, 8).unwrap();
        let first = build_examples(&series, &config).unwrap();
        let second = build_examples(&series, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn batches_chunk_without_padding_or_drops(
        series_values in entities_strategy(),
        context_len in 1usize..20,
        horizon_len in 1usize..10,
        batch_size in 1usize..10,
    ) {
        let series = make_all(&series_values);
        let config = WindowConfig::new(context_len, horizon_len, batch_size).unwrap();
        let examples = build_examples(&series, &config).unwrap();
        let total = examples.len();
        let batches = into_batches(examples, batch_size).unwrap();

        prop_assert_eq!(batches.len(), total.div_ceil(batch_size));
        for (i, batch) in batches.iter().enumerate() {
            if i + 1 < batches.len() {
                prop_assert_eq!(batch.len(), batch_size);
            } else {
                let remainder = total % batch_size;
                let expected = if remainder == 0 { batch_size } else { remainder };
                prop_assert_eq!(batch.len(), expected);
            }
        }
    }

    #[test]
    fn concatenated_batches_reconstruct_the_example_stream(
        series_values in entities_strategy(),
        context_len in 1usize..20,
        horizon_len in 1usize..10,
        batch_size in 1usize..10,
    ) {
        let series = make_all(&series_values);
        let config = WindowConfig::new(context_len, horizon_len, batch_size).unwrap();
        let examples = build_examples(&series, &config).unwrap();
        let batches = into_batches(examples.clone(), batch_size).unwrap();

        let entities: Vec<&String> = batches.iter().flat_map(Batch::entities).collect();
        let inputs: Vec<&Vec<f64>> = batches.iter().flat_map(Batch::inputs).collect();
        let outputs: Vec<&Vec<f64>> = batches.iter().flat_map(Batch::outputs).collect();

        prop_assert_eq!(entities.len(), examples.len());
        for (i, example) in examples.iter().enumerate() {
            prop_assert_eq!(entities[i], &example.entity_key);
            prop_assert_eq!(inputs[i], &example.context);
            prop_assert_eq!(outputs[i], &example.horizon_truth);
        }
    }
}
