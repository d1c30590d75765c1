//! Per-entity time series with aligned covariates.

use crate::error::{ClientError, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// An ordered series of observations for one entity, with aligned
/// timestamps and optional covariate columns.
///
/// All per-timestep sequences share the length of the target series;
/// the constructor rejects anything ragged. Covariate maps are ordered
/// by name so downstream field iteration is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySeries {
    key: String,
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    numerical_covariates: BTreeMap<String, Vec<f64>>,
    categorical_covariates: BTreeMap<String, Vec<String>>,
    static_attributes: BTreeMap<String, String>,
}

/// Builder for constructing a validated [`EntitySeries`].
#[derive(Debug, Clone, Default)]
pub struct EntitySeriesBuilder {
    key: String,
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    numerical_covariates: BTreeMap<String, Vec<f64>>,
    categorical_covariates: BTreeMap<String, Vec<String>>,
    static_attributes: BTreeMap<String, String>,
}

impl EntitySeriesBuilder {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }

    /// Add a dynamic numerical covariate column (e.g. a generation forecast).
    pub fn numerical_covariate(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.numerical_covariates.insert(name.into(), values);
        self
    }

    /// Add a dynamic categorical covariate column (e.g. day of week).
    pub fn categorical_covariate(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.categorical_covariates.insert(name.into(), values);
        self
    }

    /// Add a static per-entity attribute (e.g. country code).
    pub fn static_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_attributes.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> Result<EntitySeries> {
        let series = EntitySeries {
            key: self.key,
            timestamps: self.timestamps,
            values: self.values,
            numerical_covariates: self.numerical_covariates,
            categorical_covariates: self.categorical_covariates,
            static_attributes: self.static_attributes,
        };
        series.validate()?;
        Ok(series)
    }
}

impl EntitySeries {
    /// Create a covariate-free series.
    pub fn new(
        key: impl Into<String>,
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<f64>,
    ) -> Result<Self> {
        EntitySeriesBuilder::new(key)
            .timestamps(timestamps)
            .values(values)
            .build()
    }

    pub fn builder(key: impl Into<String>) -> EntitySeriesBuilder {
        EntitySeriesBuilder::new(key)
    }

    /// Check the alignment invariant: every per-timestep field has the
    /// same length as the target series, and timestamps strictly increase.
    pub fn validate(&self) -> Result<()> {
        let n = self.values.len();

        if self.timestamps.len() != n {
            return Err(ClientError::MalformedSeries {
                entity: self.key.clone(),
                field: "timestamps".to_string(),
                expected: n,
                got: self.timestamps.len(),
            });
        }

        for w in self.timestamps.windows(2) {
            if w[1] <= w[0] {
                return Err(ClientError::TimestampError(format!(
                    "timestamps for `{}` must be strictly increasing",
                    self.key
                )));
            }
        }

        for (name, column) in &self.numerical_covariates {
            if column.len() != n {
                return Err(ClientError::MalformedSeries {
                    entity: self.key.clone(),
                    field: name.clone(),
                    expected: n,
                    got: column.len(),
                });
            }
        }

        for (name, column) in &self.categorical_covariates {
            if column.len() != n {
                return Err(ClientError::MalformedSeries {
                    entity: self.key.clone(),
                    field: name.clone(),
                    expected: n,
                    got: column.len(),
                });
            }
        }

        Ok(())
    }

    /// Get the entity key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get target values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get all dynamic numerical covariate columns.
    pub fn numerical_covariates(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.numerical_covariates
    }

    /// Get all dynamic categorical covariate columns.
    pub fn categorical_covariates(&self) -> &BTreeMap<String, Vec<String>> {
        &self.categorical_covariates
    }

    /// Get static per-entity attributes.
    pub fn static_attributes(&self) -> &BTreeMap<String, String> {
        &self.static_attributes
    }

    /// Get one numerical covariate column by name.
    pub fn numerical_covariate(&self, name: &str) -> Option<&[f64]> {
        self.numerical_covariates.get(name).map(|v| v.as_slice())
    }

    /// Get one categorical covariate column by name.
    pub fn categorical_covariate(&self, name: &str) -> Option<&[String]> {
        self.categorical_covariates.get(name).map(|v| v.as_slice())
    }

    /// Check if the series carries any dynamic covariates.
    pub fn has_covariates(&self) -> bool {
        !self.numerical_covariates.is_empty() || !self.categorical_covariates.is_empty()
    }
}
