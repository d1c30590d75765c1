//! Blocking HTTP predictor for a hosted serving container.

use crate::core::Prediction;
use crate::endpoint::Predictor;
use crate::error::{ClientError, Result};
use crate::request::ForecastInstance;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Talks to one deployed endpoint over its `/predict` and `/health`
/// routes.
#[derive(Debug)]
pub struct HttpPredictor {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: &'a [ForecastInstance],
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<Prediction>,
}

impl HttpPredictor {
    /// Create a predictor for the given endpoint base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(endpoint = %base_url, "created endpoint predictor");
        Ok(Self { base_url, client })
    }

    /// The endpoint this predictor targets.
    pub fn endpoint(&self) -> &str {
        &self.base_url
    }

    /// Probe the serving container's health route.
    pub fn health(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::EndpointStatus {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(())
    }
}

impl Predictor for HttpPredictor {
    fn predict(&self, instances: &[ForecastInstance]) -> Result<Vec<Prediction>> {
        debug!(
            endpoint = %self.base_url,
            instances = instances.len(),
            "posting predict request"
        );

        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&PredictRequest { instances })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::EndpointStatus {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let parsed: PredictResponse = response
            .json()
            .map_err(|e| ClientError::Response(e.to_string()))?;

        if parsed.predictions.len() != instances.len() {
            return Err(ClientError::Response(format!(
                "expected {} predictions, got {}",
                instances.len(),
                parsed.predictions.len()
            )));
        }

        Ok(parsed.predictions)
    }
}
