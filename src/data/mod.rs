//! CSV dataset ingest.
//!
//! Reads one-row-per-timestep CSV files and groups rows into
//! per-entity series, preserving the order entities first appear.

use crate::core::{EntitySeries, EntitySeriesBuilder};
use crate::error::{ClientError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Column naming for a dataset file.
///
/// Defaults follow the common long-format convention: `unique_id`,
/// `ds`, `y`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatasetSchema {
    /// Column holding the entity key.
    pub entity_column: String,
    /// Column holding the observation timestamp.
    pub timestamp_column: String,
    /// Column holding the target value.
    pub target_column: String,
    /// `chrono` format string for the timestamp column. Date-only
    /// formats are accepted and read as midnight.
    pub timestamp_format: String,
    /// Columns read as dynamic numerical covariates.
    pub numerical_covariates: Vec<String>,
    /// Columns read as dynamic categorical covariates.
    pub categorical_covariates: Vec<String>,
    /// When set, the entity key is recorded as a static categorical
    /// attribute under this name (e.g. `country`).
    pub entity_attribute: Option<String>,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self {
            entity_column: "unique_id".to_string(),
            timestamp_column: "ds".to_string(),
            target_column: "y".to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            numerical_covariates: Vec::new(),
            categorical_covariates: Vec::new(),
            entity_attribute: None,
        }
    }
}

/// Accumulates one entity's rows before the series is built.
#[derive(Debug, Default)]
struct SeriesAccumulator {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    numerical: Vec<Vec<f64>>,
    categorical: Vec<Vec<String>>,
}

/// Read a CSV file into per-entity series.
///
/// Rows are grouped by the entity column in first-seen order; within
/// one entity, rows must already be in ascending timestamp order. Any
/// unparsable cell fails the whole read with the offending line number.
pub fn read_entity_series(path: impl AsRef<Path>, schema: &DatasetSchema) -> Result<Vec<EntitySeries>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ClientError::DatasetRow {
                line: 1,
                message: format!("missing required column `{name}`"),
            })
    };

    let entity_idx = column(&schema.entity_column)?;
    let timestamp_idx = column(&schema.timestamp_column)?;
    let target_idx = column(&schema.target_column)?;
    let numerical_idx: Vec<usize> = schema
        .numerical_covariates
        .iter()
        .map(|name| column(name))
        .collect::<Result<_>>()?;
    let categorical_idx: Vec<usize> = schema
        .categorical_covariates
        .iter()
        .map(|name| column(name))
        .collect::<Result<_>>()?;

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, SeriesAccumulator> = HashMap::new();
    let mut rows = 0usize;

    for (i, record) in reader.records().enumerate() {
        let line = i + 2; // header is line 1
        let record = record?;
        let cell = |idx: usize| -> Result<&str> {
            record.get(idx).ok_or_else(|| ClientError::DatasetRow {
                line,
                message: format!("row has {} fields, expected {}", record.len(), headers.len()),
            })
        };

        let entity = cell(entity_idx)?.to_string();
        let timestamp = parse_timestamp(cell(timestamp_idx)?, &schema.timestamp_format, line)?;
        let value = parse_float(cell(target_idx)?, &schema.target_column, line)?;

        let group = match groups.entry(entity.clone()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                order.push(entity);
                entry.insert(SeriesAccumulator {
                    numerical: vec![Vec::new(); numerical_idx.len()],
                    categorical: vec![Vec::new(); categorical_idx.len()],
                    ..SeriesAccumulator::default()
                })
            }
        };

        group.timestamps.push(timestamp);
        group.values.push(value);
        for (slot, &idx) in numerical_idx.iter().enumerate() {
            let name = &schema.numerical_covariates[slot];
            group.numerical[slot].push(parse_float(cell(idx)?, name, line)?);
        }
        for (slot, &idx) in categorical_idx.iter().enumerate() {
            group.categorical[slot].push(cell(idx)?.to_string());
        }
        rows += 1;
    }

    let mut series = Vec::with_capacity(order.len());
    for key in order {
        let accumulator = groups.remove(&key).unwrap_or_default();
        let mut builder = EntitySeriesBuilder::new(key.as_str())
            .timestamps(accumulator.timestamps)
            .values(accumulator.values);
        for (slot, name) in schema.numerical_covariates.iter().enumerate() {
            builder = builder.numerical_covariate(name.as_str(), accumulator.numerical[slot].clone());
        }
        for (slot, name) in schema.categorical_covariates.iter().enumerate() {
            builder =
                builder.categorical_covariate(name.as_str(), accumulator.categorical[slot].clone());
        }
        if let Some(attribute) = &schema.entity_attribute {
            builder = builder.static_attribute(attribute.as_str(), key.as_str());
        }
        series.push(builder.build()?);
    }

    info!(
        path = %path.display(),
        rows,
        entities = series.len(),
        "loaded dataset"
    );
    Ok(series)
}

fn parse_timestamp(raw: &str, format: &str, line: usize) -> Result<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
        return Ok(dt.and_utc());
    }
    // Date-only formats parse as a date, not a datetime.
    if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    Err(ClientError::DatasetRow {
        line,
        message: format!("timestamp `{raw}` does not match format `{format}`"),
    })
}

fn parse_float(raw: &str, column: &str, line: usize) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| ClientError::DatasetRow {
        line,
        message: format!("column `{column}` value `{raw}` is not a number"),
    })
}
