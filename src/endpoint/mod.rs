//! Hosted endpoint access: the predictor seam, its HTTP
//! implementation, and the endpoint registry file.

mod http;
mod registry;

pub use http::HttpPredictor;
pub use registry::EndpointRegistry;

use crate::core::Prediction;
use crate::error::Result;
use crate::request::ForecastInstance;

/// A deployed model able to serve prediction requests.
///
/// Implementations must return exactly one prediction per instance,
/// aligned by index.
pub trait Predictor {
    fn predict(&self, instances: &[ForecastInstance]) -> Result<Vec<Prediction>>;
}
