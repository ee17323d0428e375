//! Stream graph rendering
//!
//! Structure:
//! - `commands.rs`: retained draw commands and path segments
//! - `curve.rs`: basis-spline smoothing
//! - `layout.rs`: pure layout producing a scene
//! - `surface.rs`: drawing surface adapter and in-memory scene surface
//! - `svg.rs`: SVG serialization
//! - `renderer.rs`: mount / clear lifecycle and pointer routing
//! - `cursor.rs`: synchronized cursor and tooltip

pub mod commands;
pub mod cursor;
pub mod curve;
pub mod layout;
pub mod renderer;
pub mod surface;
pub mod svg;

// Re-exports for convenience
pub use commands::{DrawCommand, PathSegment, Point};
pub use cursor::{IndexResolution, PointerEvent, SynchronizedCursor, TooltipStyle};
pub use layout::{Margins, RenderLayout, RenderOptions, StreamGraphScene};
pub use renderer::{RowHandle, StreamGraphRenderer};
pub use surface::{DrawingSurface, ListenerHandle, NodeId, SceneSurface};
