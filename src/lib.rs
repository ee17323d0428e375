//! Visual query stream graph
//!
//! Classifies the time series sampled along a visual query path and renders
//! them as stacked mirrored areas with a synchronized cursor.
//!
//! - `stream`: input model, scoring, classification, colors, time axis, properties
//! - `render`: layout, drawing surfaces, renderer lifecycle, cursor
//! - `config`: typed configuration built from properties
//! - `pipeline`: request document → SVG + export document

pub mod config;
pub mod pipeline;
pub mod render;
pub mod stream;

pub use config::StreamGraphConfig;
pub use stream::error::{Result, StreamGraphError};
