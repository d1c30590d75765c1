//! Request payload construction for the prediction endpoint.

use crate::batch::Batch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timestamp rendering used in request payloads.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Whether instance payloads carry the batch's covariate columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CovariateMode {
    /// Target history and timestamps only.
    Ignore,
    /// Attach dynamic and static covariates.
    Include,
}

/// One instance of a prediction request.
///
/// Mirrors the serving container's instance schema: a numeric `input`
/// history, the requested `horizon`, ISO-8601 context timestamps, and
/// optional covariate mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastInstance {
    pub input: Vec<f64>,
    pub horizon: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_numerical_covariates: Option<BTreeMap<String, Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_categorical_covariates: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_categorical_covariates: Option<BTreeMap<String, String>>,
}

impl ForecastInstance {
    /// Create a bare instance from a history and a horizon.
    pub fn new(input: Vec<f64>, horizon: usize) -> Self {
        Self {
            input,
            horizon,
            timestamp: None,
            timestamp_format: None,
            dynamic_numerical_covariates: None,
            dynamic_categorical_covariates: None,
            static_categorical_covariates: None,
        }
    }

    /// Attach ISO-8601 context timestamps.
    pub fn with_timestamps(mut self, timestamps: &[DateTime<Utc>]) -> Self {
        self.timestamp = Some(format_timestamps(timestamps));
        self
    }
}

/// Render timestamps the way the endpoint expects them.
pub fn format_timestamps(timestamps: &[DateTime<Utc>]) -> Vec<String> {
    timestamps
        .iter()
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .collect()
}

/// Build one request instance per example in the batch.
///
/// With [`CovariateMode::Include`], every covariate column present on
/// the batch is attached to each instance; otherwise only the history
/// and timestamps are sent. Instance order matches example order.
pub fn batch_instances(batch: &Batch, horizon: usize, mode: CovariateMode) -> Vec<ForecastInstance> {
    (0..batch.len())
        .map(|j| {
            let mut instance = ForecastInstance::new(batch.inputs()[j].clone(), horizon)
                .with_timestamps(&batch.timestamps()[j]);

            if mode == CovariateMode::Include {
                let numerical: BTreeMap<String, Vec<f64>> = batch
                    .numerical_covariates()
                    .iter()
                    .map(|(name, columns)| (name.clone(), columns[j].clone()))
                    .collect();
                let categorical: BTreeMap<String, Vec<String>> = batch
                    .categorical_covariates()
                    .iter()
                    .map(|(name, columns)| (name.clone(), columns[j].clone()))
                    .collect();
                let statics: BTreeMap<String, String> = batch
                    .static_attributes()
                    .iter()
                    .map(|(name, values)| (name.clone(), values[j].clone()))
                    .collect();

                if !numerical.is_empty() {
                    instance.dynamic_numerical_covariates = Some(numerical);
                }
                if !categorical.is_empty() {
                    instance.dynamic_categorical_covariates = Some(categorical);
                }
                if !statics.is_empty() {
                    instance.static_categorical_covariates = Some(statics);
                }
            }

            instance
        })
        .collect()
}
