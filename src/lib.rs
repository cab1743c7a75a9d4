//! # Logic Board
//!
//! A pannable, zoomable millimeter grid for laying out logic circuits. Parts
//! carry gendered contacts that link pairwise, and wires stretch between the
//! contacts they are plugged into.
//!
//! ## Features
//! - Grid rendering on a background worker with density-aware line spacing
//! - Interval selection that keeps grid lines readable at every zoom level
//! - A scale-bar that follows the grid and labels its length in mm, cm, m or km
//! - Connector graph with gender rules and symmetric links
//! - An egui demo host that persists its settings between runs

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod board;
pub mod circuit;
pub mod component;
pub mod connector;
pub mod constants;
pub mod error;
pub mod grid;
pub mod interval;
pub mod scale_bar;
pub mod surface;
pub mod units;
mod ui;

// Re-export the types most callers need
pub use board::Board;
pub use circuit::{Circuit, ContactAddress};
pub use component::{Component, ComponentId, ComponentKind};
pub use connector::{Contact, ContactId, Gender};
pub use error::{ConfigError, ConnectError};
pub use grid::{GridConfig, GridEngine, GridSource, ViewportSnapshot};
pub use interval::{IntervalPriority, IntervalSet, IntervalStrategy};
pub use scale_bar::{ScaleBar, ScaleBarStyle};
pub use ui::{BoardApp, BoardSettings};
pub use units::{mm_to_pixels, Density, DensityProvider};

/// Runs the board demo with settings restored from the previous session.
///
/// # Returns
///
/// Returns `Ok(())` once the window closes, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), eframe::Error> {
///     logic_board::run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Logic Board",
        options,
        Box::new(|cc| Ok(Box::new(BoardApp::from_storage(cc.storage)))),
    )
}
