//! # tsfm-client
//!
//! Client toolkit for hosted TimesFM-style forecasting endpoints.
//!
//! Turns raw per-entity time series into non-overlapping-horizon
//! (context, horizon) examples, groups them into request-sized
//! batches, invokes a deployed prediction endpoint with and without
//! covariates, and evaluates and exports the resulting forecasts.
//!
//! The windowing/batching core is pure and deterministic; everything
//! network-shaped sits behind the [`endpoint::Predictor`] trait.

pub mod batch;
pub mod config;
pub mod core;
pub mod data;
pub mod detect;
pub mod endpoint;
pub mod error;
pub mod eval;
pub mod invoke;
pub mod request;
pub mod viz;

pub use error::{ClientError, Result};

pub mod prelude {
    pub use crate::batch::{build_examples, into_batches, Batch, Example, WindowConfig};
    pub use crate::core::{EntitySeries, Prediction};
    pub use crate::endpoint::{EndpointRegistry, HttpPredictor, Predictor};
    pub use crate::error::{ClientError, Result};
    pub use crate::request::{batch_instances, CovariateMode, ForecastInstance};
}
