//! The render pass: background, two gridline tiers and the primary axes.
//!
//! Everything here is a pure function of the configuration, density, surface
//! size and a viewport snapshot, so the worker thread and tests share it.

use super::config::{GridConfig, Tier};
use super::viewport::ViewportSnapshot;
use crate::interval::{round_interval, ActiveIntervals};
use crate::surface::{DrawSurface, LineStyle, Segment};
use crate::units::Density;

/// Gridline positions from `origin` towards `extent`, including `origin` itself
/// when it is visible. If the origin lies before `0`, the walk starts at the first
/// multiple of `spacing` inside the surface.
pub fn forward_positions(origin: f32, spacing: f32, extent: f32) -> Vec<f32> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Vec::new();
    }
    let start = if origin < 0.0 {
        origin + round_interval(spacing, -origin)
    } else {
        origin
    };
    walk(start, spacing, |x| x <= extent)
}

/// Gridline positions from `origin` back towards `0`. If the origin lies past
/// `extent`, the walk starts at the last multiple of `spacing` inside the surface.
pub fn backward_positions(origin: f32, spacing: f32, extent: f32) -> Vec<f32> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Vec::new();
    }
    let start = if origin > extent {
        origin - round_interval(spacing, origin - extent)
    } else {
        origin
    };
    walk(start, -spacing, |x| x >= 0.0)
}

fn walk(start: f32, step: f32, inside: impl Fn(f32) -> bool) -> Vec<f32> {
    // positions are computed from the start to keep long walks drift free
    (0u32..)
        .map(|i| start + step * i as f32)
        .take_while(|x| inside(*x))
        .collect()
}

/// One frame of the grid.
#[derive(Debug, Clone, Copy)]
pub struct GridFrame<'a> {
    config: &'a GridConfig,
    density: Density,
    width: f32,
    height: f32,
    view: ViewportSnapshot,
}

impl<'a> GridFrame<'a> {
    /// Prepares a frame for a `(width, height)` surface.
    pub fn new(
        config: &'a GridConfig,
        density: Density,
        (width, height): (f32, f32),
        view: ViewportSnapshot,
    ) -> Self {
        Self {
            config,
            density,
            width,
            height,
            view,
        }
    }

    /// Screen position of the board origin: surface center plus pan offset.
    pub fn origin(&self) -> (f32, f32) {
        (
            self.width / 2.0 + self.view.offset_x,
            self.height / 2.0 + self.view.offset_y,
        )
    }

    /// The tiers this frame shows.
    pub fn active_intervals(&self) -> ActiveIntervals {
        self.config.select_intervals(self.view.multiplier)
    }

    /// Draws the full frame and returns the tiers that were used.
    ///
    /// The tertiary tier goes first so the secondary tier overdraws shared lines;
    /// the axes are drawn last.
    pub fn draw(&self, canvas: &mut impl DrawSurface) -> ActiveIntervals {
        canvas.clear(self.config.background);

        let active = self.active_intervals();
        if let Some(interval) = active.tertiary {
            self.draw_tier(canvas, interval, Tier::Tertiary);
        }
        if let Some(interval) = active.secondary {
            self.draw_tier(canvas, interval, Tier::Secondary);
        }
        self.draw_axes(canvas);

        active
    }

    fn draw_tier(&self, canvas: &mut impl DrawSurface, interval_mm: f32, tier: Tier) {
        let ((x_style, show_x), (y_style, show_y)) = self.config.tier_styles(tier);
        let (origin_x, origin_y) = self.origin();
        let multiplier = self.view.multiplier;

        if show_x {
            let spacing = self.density.mm_to_px_x(interval_mm) * multiplier;
            self.draw_vertical(canvas, &forward_positions(origin_x, spacing, self.width), &x_style);
            self.draw_vertical(canvas, &backward_positions(origin_x, spacing, self.width), &x_style);
        }
        if show_y {
            let spacing = self.density.mm_to_px_y(interval_mm) * multiplier;
            self.draw_horizontal(canvas, &forward_positions(origin_y, spacing, self.height), &y_style);
            self.draw_horizontal(canvas, &backward_positions(origin_y, spacing, self.height), &y_style);
        }
    }

    fn draw_vertical(&self, canvas: &mut impl DrawSurface, xs: &[f32], style: &LineStyle) {
        let segments: Vec<Segment> = xs.iter().map(|x| Segment::vertical(*x, self.height)).collect();
        canvas.draw_lines(&segments, style);
    }

    fn draw_horizontal(&self, canvas: &mut impl DrawSurface, ys: &[f32], style: &LineStyle) {
        let segments: Vec<Segment> = ys.iter().map(|y| Segment::horizontal(*y, self.width)).collect();
        canvas.draw_lines(&segments, style);
    }

    fn draw_axes(&self, canvas: &mut impl DrawSurface) {
        let (origin_x, origin_y) = self.origin();
        if self.config.show_x_axis && (0.0..=self.width).contains(&origin_x) {
            canvas.draw_line(Segment::vertical(origin_x, self.height), &self.config.x_axis);
        }
        if self.config.show_y_axis && (0.0..=self.height).contains(&origin_y) {
            canvas.draw_line(Segment::horizontal(origin_y, self.width), &self.config.y_axis);
        }
    }
}
