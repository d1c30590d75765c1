//! Application configuration.
//!
//! One explicit [`AppConfig`] is loaded from a TOML file at process
//! start and passed into whatever needs it; there is no process-wide
//! settings singleton and no lazy first-use initialization.

use crate::batch::WindowConfig;
use crate::data::DatasetSchema;
use crate::error::{ClientError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration for a forecast run.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub endpoint: EndpointConfig,
    pub batching: BatchingConfig,
    pub dataset: DatasetConfig,
    /// Directory where per-batch forecast JSON files are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// How to reach the hosted prediction endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Registry file holding deployed endpoint URLs in creation order.
    pub registry: PathBuf,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Window and batch geometry.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BatchingConfig {
    pub context_len: usize,
    pub horizon_len: usize,
    pub batch_size: usize,
}

impl BatchingConfig {
    /// Convert into a validated [`WindowConfig`].
    pub fn window(&self) -> Result<WindowConfig> {
        WindowConfig::new(self.context_len, self.horizon_len, self.batch_size)
    }
}

/// Where the input data lives and how its columns are named.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// CSV file with one row per (entity, timestep).
    pub path: PathBuf,
    #[serde(flatten)]
    pub schema: DatasetSchema,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/output/forecasts")
}

fn default_request_timeout_secs() -> u64 {
    300
}

impl AppConfig {
    /// Load and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ClientError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: AppConfig = toml::from_str(&raw).map_err(|e| ClientError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // Surface bad window parameters at load time, not mid-run.
        config.batching.window()?;
        Ok(config)
    }
}
