//! Sequential forecast invocation.
//!
//! Windows the input series, batches the examples, and walks the
//! batches in order: for each one the endpoint is invoked without
//! covariates and, when the data carries any, with them, and both
//! responses are persisted as per-batch JSON files.

use crate::batch::{build_examples, into_batches, Batch, WindowConfig};
use crate::core::{EntitySeries, Prediction};
use crate::endpoint::Predictor;
use crate::error::Result;
use crate::eval::{batch_accuracy, AccuracyMetrics};
use crate::request::{batch_instances, CovariateMode};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What one forecast run produced.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Total windowed examples.
    pub examples: usize,
    /// Number of batches invoked.
    pub batches: usize,
    /// Persisted covariate-free forecast files, in batch order.
    pub raw_files: Vec<PathBuf>,
    /// Persisted covariate-aware forecast files, in batch order.
    pub covariate_files: Vec<PathBuf>,
    /// Accuracy of the covariate-free run, when truths were present.
    pub raw_accuracy: Option<AccuracyMetrics>,
    /// Accuracy of the covariate-aware run, when truths were present.
    pub covariate_accuracy: Option<AccuracyMetrics>,
}

/// Run forecasts for every batch and persist the responses.
///
/// Batches are invoked strictly in order; any endpoint failure aborts
/// the run with the error, leaving already-written files in place.
pub fn run_forecast(
    series: &[EntitySeries],
    config: &WindowConfig,
    predictor: &dyn Predictor,
    output_dir: impl AsRef<Path>,
) -> Result<RunSummary> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let examples = build_examples(series, config)?;
    let batches = into_batches(examples, config.batch_size)?;
    info!(
        entities = series.len(),
        batches = batches.len(),
        "starting forecast run"
    );

    let mut summary = RunSummary {
        examples: batches.iter().map(Batch::len).sum(),
        batches: batches.len(),
        ..RunSummary::default()
    };

    let mut raw_truths: Vec<Vec<f64>> = Vec::new();
    let mut raw_predictions: Vec<Prediction> = Vec::new();
    let mut covariate_truths: Vec<Vec<f64>> = Vec::new();
    let mut covariate_predictions: Vec<Prediction> = Vec::new();

    for (i, batch) in batches.iter().enumerate() {
        let instances = batch_instances(batch, config.horizon_len, CovariateMode::Ignore);
        let predictions = predictor.predict(&instances)?;
        let file = output_dir.join(format!("raw_forecast_batch_{}.json", i + 1));
        write_predictions(&file, &predictions)?;
        raw_truths.extend_from_slice(batch.outputs());
        raw_predictions.extend(predictions);
        summary.raw_files.push(file);

        let has_covariates = !batch.numerical_covariates().is_empty()
            || !batch.categorical_covariates().is_empty()
            || !batch.static_attributes().is_empty();
        if has_covariates {
            let instances = batch_instances(batch, config.horizon_len, CovariateMode::Include);
            let predictions = predictor.predict(&instances)?;
            let file = output_dir.join(format!("cov_forecast_batch_{}.json", i + 1));
            write_predictions(&file, &predictions)?;
            covariate_truths.extend_from_slice(batch.outputs());
            covariate_predictions.extend(predictions);
            summary.covariate_files.push(file);
        }

        info!(batch = i + 1, examples = batch.len(), "batch forecast complete");
    }

    summary.raw_accuracy = accuracy_or_warn(&raw_truths, &raw_predictions, "raw");
    summary.covariate_accuracy =
        accuracy_or_warn(&covariate_truths, &covariate_predictions, "covariate");

    if let Some(metrics) = &summary.raw_accuracy {
        info!(
            mae = metrics.mae,
            rmse = metrics.rmse,
            smape = metrics.smape,
            "covariate-free accuracy"
        );
    }
    if let Some(metrics) = &summary.covariate_accuracy {
        info!(
            mae = metrics.mae,
            rmse = metrics.rmse,
            smape = metrics.smape,
            "covariate-aware accuracy"
        );
    }

    Ok(summary)
}

fn write_predictions(path: &Path, predictions: &[Prediction]) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), predictions)?;
    Ok(())
}

fn accuracy_or_warn(
    truths: &[Vec<f64>],
    predictions: &[Prediction],
    variant: &str,
) -> Option<AccuracyMetrics> {
    if predictions.is_empty() {
        return None;
    }
    match batch_accuracy(truths, predictions) {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!(variant, error = %e, "could not evaluate forecast accuracy");
            None
        }
    }
}
