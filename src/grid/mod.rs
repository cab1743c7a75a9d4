//! Pannable, zoomable millimeter grid.
//!
//! - [`config`] holds every option and its defaults
//! - [`viewport`] is the atomic pan/zoom state
//! - [`input`] turns pointer events into pan deltas
//! - [`render`] draws one frame onto any [`DrawSurface`](crate::surface::DrawSurface)
//! - [`engine`] ties them to a surface and a render worker

pub mod config;
pub mod engine;
pub mod input;
pub mod render;
pub mod viewport;

pub use config::{GridConfig, Tier};
pub use engine::{ChangeListener, EngineState, GridEngine, GridReading, GridSource};
pub use input::{PointerEvent, PointerId, PointerTracker};
pub use render::GridFrame;
pub use viewport::{AtomicF32, Viewport, ViewportSnapshot};
