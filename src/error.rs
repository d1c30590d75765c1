//! Error types for the tsfm-client library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while batching series or talking to an endpoint.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Window or batch parameters are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A per-entity field does not line up with the target series.
    #[error("malformed series `{entity}`: field `{field}` has length {got}, expected {expected}")]
    MalformedSeries {
        entity: String,
        field: String,
        expected: usize,
        got: usize,
    },

    /// A covariate column exists for some entities but not others.
    #[error("series `{entity}` is missing covariate `{field}` present on other entities")]
    MissingCovariate { entity: String, field: String },

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Dimension mismatch between aligned sequences.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// A configuration file could not be read or parsed.
    #[error("config file {}: {message}", .path.display())]
    ConfigFile { path: PathBuf, message: String },

    /// A dataset row failed schema validation.
    #[error("dataset row {line}: {message}")]
    DatasetRow { line: usize, message: String },

    /// The endpoint registry holds no endpoints.
    #[error("endpoint registry {} is empty", .0.display())]
    NoEndpoints(PathBuf),

    /// The endpoint replied with a non-success status.
    #[error("endpoint returned {status}: {body}")]
    EndpointStatus { status: u16, body: String },

    /// The endpoint reply could not be interpreted.
    #[error("unexpected endpoint response: {0}")]
    Response(String),

    /// HTTP transport failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// CSV read/write failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
