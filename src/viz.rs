//! Plot-ready CSV export.
//!
//! Rendering happens outside this crate; these exports produce
//! long-format CSV (`entity,timestamp,value,kind`) that any plotting
//! tool can consume directly.

use crate::batch::Batch;
use crate::core::{horizon_timeline, Prediction};
use crate::error::Result;
use crate::request::format_timestamps;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::info;

/// Spacing-inference tolerance used when extending timelines.
const SPACING_TOLERANCE: f64 = 0.5;

const HEADER: [&str; 4] = ["entity", "timestamp", "value", "kind"];

/// Export one forecast next to its context and optional ground truth.
///
/// Horizon timestamps are extrapolated from the context's inferred
/// spacing, continuing from the last context timestamp.
pub fn write_forecast_csv(
    entity: &str,
    context_timestamps: &[DateTime<Utc>],
    context: &[f64],
    prediction: &Prediction,
    ground_truth: Option<&[f64]>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;

    write_series(
        &mut writer,
        entity,
        &format_timestamps(context_timestamps),
        context,
        "context",
    )?;

    let timeline = horizon_timeline(
        context_timestamps,
        prediction.horizon().max(ground_truth.map_or(0, <[f64]>::len)),
        SPACING_TOLERANCE,
    )?;
    let timeline = format_timestamps(&timeline);

    write_series(
        &mut writer,
        entity,
        &timeline,
        &prediction.point_forecast,
        "forecast",
    )?;
    if let Some(truth) = ground_truth {
        write_series(&mut writer, entity, &timeline, truth, "ground_truth")?;
    }

    writer.flush()?;
    info!(path = %path.display(), "wrote forecast export");
    Ok(())
}

/// Export every example of a batch: contexts followed by their
/// held-out horizons.
pub fn write_batch_csv(batch: &Batch, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;

    for j in 0..batch.len() {
        let entity = &batch.entities()[j];
        let context_timestamps = &batch.timestamps()[j];
        write_series(
            &mut writer,
            entity,
            &format_timestamps(context_timestamps),
            &batch.inputs()[j],
            "context",
        )?;

        let truth = &batch.outputs()[j];
        if !truth.is_empty() {
            let timeline =
                horizon_timeline(context_timestamps, truth.len(), SPACING_TOLERANCE)?;
            write_series(
                &mut writer,
                entity,
                &format_timestamps(&timeline),
                truth,
                "ground_truth",
            )?;
        }
    }

    writer.flush()?;
    info!(path = %path.display(), examples = batch.len(), "wrote batch export");
    Ok(())
}

fn write_series<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    entity: &str,
    timestamps: &[String],
    values: &[f64],
    kind: &str,
) -> Result<()> {
    for (timestamp, value) in timestamps.iter().zip(values) {
        let value = value.to_string();
        writer.write_record([entity, timestamp.as_str(), value.as_str(), kind])?;
    }
    Ok(())
}
