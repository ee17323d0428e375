//! Stream model, scoring and classification
//!
//! Structure:
//! - `series.rs`: validated input (series set, date axis, thresholds)
//! - `scores.rs`: amplitude and fluctuation scores
//! - `classifier.rs`: population-relative categories and salience
//! - `colors.rs` / `palettes.rs`: category ramps
//! - `axis.rs`: index and time scales, adaptive ticks
//! - `properties.rs`: property registry and typed reader
//! - `error.rs`: error types

pub mod axis;
pub mod classifier;
pub mod colors;
pub mod error;
pub mod palettes;
pub mod properties;
pub mod scores;
pub mod series;

// Re-exports for convenience
pub use axis::{TimeAxis, TimeAxisBuilder};
pub use classifier::{classify, classify_with, Classification, ClassificationResult};
pub use colors::{ColorMapper, RampSelection, Rgb, StreamCategory};
pub use error::{Result, StreamGraphError};
pub use series::{ClassificationThresholds, DateAxis, SeriesSet};
