//! Millimeter to pixel conversion.

use crate::constants::{DEFAULT_DPI, MILLIMETERS_PER_INCH};
use serde::{Deserialize, Serialize};

/// Converts a millimeter distance to pixels for a display axis with `dpi` dots per inch.
///
/// Results below one pixel are floored to `1.0` so a spacing never collapses into a
/// zero-width draw. `NaN` input also yields the floor.
pub fn mm_to_pixels(mm: f32, dpi: f32) -> f32 {
    (dpi / MILLIMETERS_PER_INCH * mm).max(1.0)
}

/// Horizontal and vertical display density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Density {
    /// Dots per inch along x
    pub x_dpi: f32,
    /// Dots per inch along y
    pub y_dpi: f32,
}

impl Density {
    /// Creates a density with separate axis values.
    pub fn new(x_dpi: f32, y_dpi: f32) -> Self {
        Self { x_dpi, y_dpi }
    }

    /// Same density on both axes.
    pub fn uniform(dpi: f32) -> Self {
        Self::new(dpi, dpi)
    }

    /// Converts a horizontal millimeter distance to pixels.
    pub fn mm_to_px_x(&self, mm: f32) -> f32 {
        mm_to_pixels(mm, self.x_dpi)
    }

    /// Converts a vertical millimeter distance to pixels.
    pub fn mm_to_px_y(&self, mm: f32) -> f32 {
        mm_to_pixels(mm, self.y_dpi)
    }

    /// Pixels per millimeter as `(x, y)`, without the one-pixel floor. Positions
    /// map through this; spacings go through [`mm_to_pixels`].
    pub fn px_per_mm(&self) -> (f32, f32) {
        (
            self.x_dpi / MILLIMETERS_PER_INCH,
            self.y_dpi / MILLIMETERS_PER_INCH,
        )
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::uniform(DEFAULT_DPI)
    }
}

/// Anything that can report the display density of the board's surface.
pub trait DensityProvider {
    /// Current horizontal and vertical dots per inch.
    fn density(&self) -> Density;
}

impl DensityProvider for Density {
    fn density(&self) -> Density {
        *self
    }
}
