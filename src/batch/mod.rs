//! Windowed example batching.
//!
//! The pipeline is `example_windows` (or `build_examples`) followed by
//! `into_batches`: raw entity series become fixed-size (context, horizon)
//! examples, which are regrouped field-major into request-sized batches.
//!
//! # Example
//!
//! ```
//! use tsfm_client::batch::{build_examples, into_batches, WindowConfig};
//! use tsfm_client::core::EntitySeries;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let timestamps: Vec<_> = (0..10).map(|i| base + Duration::hours(i)).collect();
//! let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
//! let series = vec![EntitySeries::new("demo", timestamps, values).unwrap()];
//!
//! let config = WindowConfig::new(5, 2, 8).unwrap();
//! let examples = build_examples(&series, &config).unwrap();
//! assert_eq!(examples.len(), 2);
//!
//! let batches = into_batches(examples, config.batch_size).unwrap();
//! assert_eq!(batches.len(), 1);
//! ```

mod group;
mod window;

pub use group::{into_batches, Batch};
pub use window::{build_examples, example_windows, Example, ExampleWindows, WindowConfig};
