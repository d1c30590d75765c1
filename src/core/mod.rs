//! Core data structures shared by batching and endpoint invocation.

mod entity_series;
mod prediction;
mod timeline;

pub use entity_series::{EntitySeries, EntitySeriesBuilder};
pub use prediction::Prediction;
pub use timeline::{horizon_timeline, infer_spacing};
