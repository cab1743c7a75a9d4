//! A labeled reference segment showing the length of one grid interval on screen.
//!
//! The scale-bar is passive: after each render pass the grid engine hands it a
//! [`GridSource`] and the bar pulls the interval at its configured priority and the
//! current multiplier. Drawing happens on the host's own canvas, separate from
//! the grid surface.

use crate::constants::*;
use crate::grid::GridSource;
use crate::interval::IntervalPriority;
use crate::surface::{Color, DrawSurface, LineStyle, Segment, TextStyle};
use crate::units::mm_to_pixels;
use serde::{Deserialize, Serialize};

/// Horizontal placement of the bar inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalGravity {
    /// Flush left
    Left,
    /// Centered
    #[default]
    Center,
    /// Flush right
    Right,
}

/// Vertical placement of the bar inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalGravity {
    /// Flush top
    Top,
    /// Centered
    #[default]
    Center,
    /// Flush bottom
    Bottom,
}

/// Look of the scale-bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleBarStyle {
    /// Label font size in pixels
    pub text_size: f32,
    /// Label color
    pub text_color: Color,
    /// Bar color
    pub line_color: Color,
    /// Bar stroke in pixels
    pub line_thickness: f32,
    /// Gap between label and bar
    pub line_top_padding: f32,
    /// Horizontal placement
    pub horizontal: HorizontalGravity,
    /// Vertical placement
    pub vertical: VerticalGravity,
    /// Which tier the bar reports
    pub priority: IntervalPriority,
}

impl Default for ScaleBarStyle {
    fn default() -> Self {
        Self {
            text_size: SCALE_BAR_TEXT_SIZE,
            text_color: Color::BLACK,
            line_color: Color::BLACK,
            line_thickness: SCALE_BAR_LINE_THICKNESS,
            line_top_padding: SCALE_BAR_LINE_TOP_PADDING,
            horizontal: HorizontalGravity::default(),
            vertical: VerticalGravity::default(),
            priority: IntervalPriority::default(),
        }
    }
}

impl ScaleBarStyle {
    fn text(&self) -> TextStyle {
        TextStyle {
            color: self.text_color,
            size: self.text_size,
        }
    }

    fn line(&self) -> LineStyle {
        LineStyle::new(self.line_color, self.line_thickness)
    }
}

/// Where the label and bar go inside a box.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBarLayout {
    /// Label, including the overflow prefix when capped
    pub text: String,
    /// Label x
    pub text_x: f32,
    /// Label baseline y
    pub text_y: f32,
    /// The bar
    pub line: Segment,
}

/// Formats a length given in millimeters with the largest unit that keeps it at or
/// above one: mm, cm, m or km.
pub fn format_length(mm: f32) -> String {
    let mm = f64::from(mm);
    let cm = mm / 10.0;
    if cm < 1.0 {
        return format!("{}mm", trim_number(mm));
    }
    let m = cm / 100.0;
    if m < 1.0 {
        return format!("{}cm", trim_number(cm));
    }
    let km = m / 1000.0;
    if km < 1.0 {
        return format!("{}m", trim_number(m));
    }
    format!("{}km", trim_number(km))
}

fn trim_number(value: f64) -> String {
    let text = format!("{:.3}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Scale readout fed by the grid engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBar {
    style: ScaleBarStyle,
    max_interval_pixel: f32,
    interval_mm: f32,
    interval_pixel: f32,
    multiplier: f32,
}

impl Default for ScaleBar {
    fn default() -> Self {
        Self::new(ScaleBarStyle::default())
    }
}

impl ScaleBar {
    /// Creates a bar reserving room for the default maximum showing interval.
    pub fn new(style: ScaleBarStyle) -> Self {
        Self {
            style,
            max_interval_pixel: mm_to_pixels(MAX_SHOWING_INTERVAL_MM, DEFAULT_DPI),
            interval_mm: 0.0,
            interval_pixel: 0.0,
            multiplier: 0.0,
        }
    }

    /// Current look.
    pub fn style(&self) -> &ScaleBarStyle {
        &self.style
    }

    /// Replaces the look.
    pub fn set_style(&mut self, style: ScaleBarStyle) {
        self.style = style;
    }

    /// Widest the bar may be drawn, in pixels.
    pub fn max_interval_pixel(&self) -> f32 {
        self.max_interval_pixel
    }

    /// Sets the reserved width, normally from the grid's maximum showing interval.
    pub fn set_max_interval_pixel(&mut self, pixels: f32) {
        self.max_interval_pixel = pixels;
    }

    /// Pulls the interval and multiplier from the grid.
    pub fn update<G: GridSource + ?Sized>(&mut self, grid: &G) {
        self.interval_mm = grid.interval_mm(self.style.priority);
        self.interval_pixel = mm_to_pixels(self.interval_mm, grid.density().x_dpi);
        self.multiplier = grid.multiplier();
    }

    /// Interval reported by the last update, in millimeters.
    pub fn interval_mm(&self) -> f32 {
        self.interval_mm
    }

    /// Interval of the last update in pixels, before zoom.
    pub fn interval_pixel(&self) -> f32 {
        self.interval_pixel
    }

    /// Multiplier of the last update.
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// On-screen length of one interval at the current zoom.
    pub fn natural_length(&self) -> f32 {
        self.interval_pixel * self.multiplier
    }

    /// Whether the natural length does not fit the reserved width.
    pub fn overflows(&self) -> bool {
        self.natural_length() > self.max_interval_pixel
    }

    /// Drawn length, capped at the reserved width.
    pub fn line_length(&self) -> f32 {
        self.natural_length().min(self.max_interval_pixel)
    }

    /// Label text, prefixed with `"> "` when the bar is capped.
    pub fn label(&self) -> String {
        let length = format_length(self.interval_mm);
        if self.overflows() {
            format!("{}{}", SCALE_BAR_OVERFLOW_PREFIX, length)
        } else {
            length
        }
    }

    /// Preferred `(width, height)` of the box: the reserved bar width or the label,
    /// whichever is wider, over two label heights plus padding and stroke.
    pub fn measure(&self, canvas: &impl DrawSurface) -> (f32, f32) {
        let bounds = canvas.text_bounds(&format_length(self.interval_mm), &self.style.text());
        let width = bounds.width.max(self.max_interval_pixel);
        let height = bounds.height * 2.0 + self.style.line_top_padding + self.style.line_thickness;
        (width, height)
    }

    /// Places label and bar in a `width` by `height` box according to the gravity.
    pub fn layout(&self, canvas: &impl DrawSurface, width: f32, height: f32) -> ScaleBarLayout {
        let text = self.label();
        let bounds = canvas.text_bounds(&text, &self.style.text());
        let length = self.line_length();

        let (text_x, start_x) = match self.style.horizontal {
            HorizontalGravity::Left => (-bounds.left, 0.0),
            HorizontalGravity::Center => (
                width / 2.0 - bounds.width / 2.0 - bounds.left,
                width / 2.0 - length / 2.0,
            ),
            HorizontalGravity::Right => (width - bounds.width - bounds.left, width - length),
        };

        // label, padding and stroke form one block
        let block = bounds.height + self.style.line_top_padding + self.style.line_thickness;
        let block_top = match self.style.vertical {
            VerticalGravity::Top => 0.0,
            VerticalGravity::Center => (height - block) / 2.0,
            VerticalGravity::Bottom => height - block,
        };
        let line_y = block_top
            + bounds.height
            + self.style.line_top_padding
            + self.style.line_thickness / 2.0;

        ScaleBarLayout {
            text,
            text_x,
            text_y: block_top - bounds.top,
            line: Segment::new(start_x, line_y, start_x + length, line_y),
        }
    }

    /// Draws the label and bar into a `width` by `height` box.
    pub fn draw(&self, canvas: &mut impl DrawSurface, width: f32, height: f32) {
        let layout = self.layout(canvas, width, height);
        canvas.draw_text(&layout.text, layout.text_x, layout.text_y, &self.style.text());
        canvas.draw_line(layout.line, &self.style.line());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridReading;
    use crate::interval::ActiveIntervals;
    use crate::surface::{DrawCommand, DrawList};
    use crate::units::Density;

    fn reading(secondary: Option<f32>, tertiary: Option<f32>, multiplier: f32) -> GridReading {
        GridReading {
            active: ActiveIntervals {
                secondary,
                tertiary,
            },
            multiplier,
            // 10 px per millimeter
            density: Density::uniform(254.0),
        }
    }

    fn bar_with(style: ScaleBarStyle, grid: &GridReading) -> ScaleBar {
        let mut bar = ScaleBar::new(style);
        bar.update(grid);
        bar
    }

    // ========================================================================
    // Labels
    // ========================================================================

    #[test]
    fn test_format_picks_unit_by_magnitude() {
        assert_eq!(format_length(1.25), "1.25mm");
        assert_eq!(format_length(5.0), "5mm");
        assert_eq!(format_length(12.5), "1.25cm");
        assert_eq!(format_length(80.0), "8cm");
        assert_eq!(format_length(2500.0), "2.5m");
        assert_eq!(format_length(3_000_000.0), "3km");
        assert_eq!(format_length(0.0), "0mm");
    }

    // ========================================================================
    // Updates
    // ========================================================================

    #[test]
    fn test_update_pulls_preferred_tier() {
        let grid = reading(Some(1.25), Some(2.5), 2.0);
        let bar = bar_with(ScaleBarStyle::default(), &grid);
        assert_eq!(bar.interval_mm(), 1.25);
        assert!((bar.natural_length() - 25.0).abs() < 1e-3);
        assert_eq!(bar.label(), "1.25mm");

        let tertiary = ScaleBarStyle {
            priority: IntervalPriority::Tertiary,
            ..Default::default()
        };
        assert_eq!(bar_with(tertiary, &grid).interval_mm(), 2.5);
    }

    #[test]
    fn test_update_falls_back_to_other_tier_then_zero() {
        let tertiary = ScaleBarStyle {
            priority: IntervalPriority::Tertiary,
            ..Default::default()
        };
        let bar = bar_with(tertiary, &reading(Some(320.0), None, 0.001));
        assert_eq!(bar.interval_mm(), 320.0);

        let empty = bar_with(ScaleBarStyle::default(), &reading(None, None, 1.0));
        assert_eq!(empty.interval_mm(), 0.0);
        assert_eq!(empty.label(), "0mm");
    }

    #[test]
    fn test_overflow_caps_length_and_prefixes_label() {
        let mut bar = bar_with(ScaleBarStyle::default(), &reading(Some(10.0), None, 2.0));
        bar.set_max_interval_pixel(150.0);
        assert!(bar.overflows());
        assert_eq!(bar.line_length(), 150.0);
        assert_eq!(bar.label(), "> 1cm");

        bar.set_max_interval_pixel(400.0);
        assert!(!bar.overflows());
        assert!((bar.line_length() - 200.0).abs() < 1e-3);
        assert_eq!(bar.label(), "1cm");
    }

    // ========================================================================
    // Layout
    // ========================================================================

    #[test]
    fn test_measure_reserves_max_width() {
        let bar = bar_with(ScaleBarStyle::default(), &reading(Some(1.25), None, 2.0));
        let (width, height) = bar.measure(&DrawList::new());
        assert_eq!(width, bar.max_interval_pixel());
        // two 16px label heights, 4px padding, 8px stroke
        assert_eq!(height, 44.0);
    }

    #[test]
    fn test_layout_left_top() {
        let style = ScaleBarStyle {
            horizontal: HorizontalGravity::Left,
            vertical: VerticalGravity::Top,
            ..Default::default()
        };
        let bar = bar_with(style, &reading(Some(1.25), None, 2.0));
        let layout = bar.layout(&DrawList::new(), 300.0, 100.0);
        assert_eq!(layout.text_x, 0.0);
        assert_eq!(layout.text_y, 16.0);
        assert_eq!(layout.line.y0, 24.0);
        assert_eq!(layout.line.x0, 0.0);
        assert!((layout.line.x1 - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_layout_right_bottom() {
        let style = ScaleBarStyle {
            horizontal: HorizontalGravity::Right,
            vertical: VerticalGravity::Bottom,
            ..Default::default()
        };
        let bar = bar_with(style, &reading(Some(1.25), None, 2.0));
        let layout = bar.layout(&DrawList::new(), 300.0, 100.0);
        assert!((layout.line.x1 - 300.0).abs() < 1e-3);
        assert_eq!(layout.text_y, 88.0);
        assert_eq!(layout.line.y0, 96.0);
    }

    #[test]
    fn test_layout_centers_bar() {
        let bar = bar_with(ScaleBarStyle::default(), &reading(Some(1.25), None, 2.0));
        let layout = bar.layout(&DrawList::new(), 300.0, 100.0);
        let mid = (layout.line.x0 + layout.line.x1) / 2.0;
        assert!((mid - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_draw_emits_label_then_bar() {
        let bar = bar_with(ScaleBarStyle::default(), &reading(Some(5.0), None, 1.0));
        let mut list = DrawList::new();
        bar.draw(&mut list, 200.0, 50.0);
        assert_eq!(list.texts(), vec!["5mm"]);
        assert!(matches!(list.commands()[1], DrawCommand::Lines { .. }));
    }
}
