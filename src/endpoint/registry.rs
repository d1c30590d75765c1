//! Registry file of deployed endpoint URLs.
//!
//! Deployment tooling appends each new endpoint here; the invoke side
//! reads the file and talks to the first entry.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Ordered list of deployed endpoints, persisted as TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointRegistry {
    #[serde(default)]
    endpoints: Vec<String>,
    #[serde(skip)]
    path: PathBuf,
}

impl EndpointRegistry {
    /// Load a registry file. A missing file is an empty registry, so
    /// first use before any deployment works without setup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self {
                endpoints: Vec::new(),
                path: path.to_path_buf(),
            });
        }

        let raw = fs::read_to_string(path)?;
        let mut registry: EndpointRegistry =
            toml::from_str(&raw).map_err(|e| ClientError::ConfigFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        registry.path = path.to_path_buf();
        Ok(registry)
    }

    /// Append an endpoint and persist the registry.
    pub fn register(&mut self, endpoint: impl Into<String>) -> Result<()> {
        let endpoint = endpoint.into();
        info!(endpoint = %endpoint, "registering endpoint");
        self.endpoints.push(endpoint);
        self.save()
    }

    /// Write the registry back to its file.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = toml::to_string_pretty(self).map_err(|e| ClientError::ConfigFile {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// The endpoint a forecast run should use: the first one registered.
    pub fn first(&self) -> Result<&str> {
        self.endpoints
            .first()
            .map(String::as_str)
            .ok_or_else(|| ClientError::NoEndpoints(self.path.clone()))
    }

    /// All registered endpoints, oldest first.
    pub fn list(&self) -> &[String] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
