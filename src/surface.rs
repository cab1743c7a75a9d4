//! Drawing primitives and the traits a host implements to show the board.
//!
//! The grid engine never talks to a window system directly. A host hands it a
//! [`Surface`], and every render pass locks one [`DrawSurface`] canvas from it,
//! issues primitive draw calls and presents the canvas back.

use serde::{Deserialize, Serialize};

/// A 32-bit ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    /// Opaque white
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    /// Opaque black
    pub const BLACK: Color = Color(0xFF00_0000);

    /// Wraps a packed `0xAARRGGBB` value.
    pub const fn from_argb(argb: u32) -> Self {
        Color(argb)
    }

    /// Builds an opaque color from its channels.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Alpha channel
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel
    pub const fn b(self) -> u8 {
        self.0 as u8
    }
}

/// Stroke used for a family of lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Stroke color
    pub color: Color,
    /// Stroke width in pixels
    pub thickness: f32,
}

impl LineStyle {
    /// Creates a stroke.
    pub const fn new(color: Color, thickness: f32) -> Self {
        Self { color, thickness }
    }
}

/// Font size and color for text draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Text color
    pub color: Color,
    /// Font size in pixels
    pub size: f32,
}

/// A straight line between two screen points, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub struct Segment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Segment {
    /// Line from `(x0, y0)` to `(x1, y1)`.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Vertical line at `x` spanning `[0, height]`.
    pub fn vertical(x: f32, height: f32) -> Self {
        Self::new(x, 0.0, x, height)
    }

    /// Horizontal line at `y` spanning `[0, width]`.
    pub fn horizontal(y: f32, width: f32) -> Self {
        Self::new(0.0, y, width, y)
    }
}

/// Measured extent of a piece of text, relative to its baseline origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    /// Offset of the leftmost pixel from the draw x
    pub left: f32,
    /// Offset of the topmost pixel from the baseline (negative above it)
    pub top: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

/// A locked canvas that accepts primitive draw calls.
pub trait DrawSurface {
    /// Fills the whole canvas with `color`.
    fn clear(&mut self, color: Color);

    /// Draws every segment with one stroke.
    fn draw_lines(&mut self, segments: &[Segment], style: &LineStyle);

    /// Draws a single segment.
    fn draw_line(&mut self, segment: Segment, style: &LineStyle) {
        self.draw_lines(std::slice::from_ref(&segment), style);
    }

    /// Draws `text` with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);

    /// Measures `text`. The default is a monospace estimate for hosts without metrics.
    fn text_bounds(&self, text: &str, style: &TextStyle) -> TextBounds {
        let width = text.chars().count() as f32 * style.size * 0.6;
        TextBounds {
            left: 0.0,
            top: -style.size,
            width,
            height: style.size,
        }
    }
}

/// The host's drawing target.
///
/// The render worker takes ownership of the surface for as long as the board is
/// active, so implementations must be [`Send`].
pub trait Surface: Send + 'static {
    /// Canvas type handed out per frame.
    type Canvas: DrawSurface;

    /// Width in pixels.
    fn width(&self) -> f32;

    /// Height in pixels.
    fn height(&self) -> f32;

    /// Locks a canvas for one frame, or `None` if the surface cannot draw right now.
    fn lock_for_drawing(&mut self) -> Option<Self::Canvas>;

    /// Presents a canvas obtained from `lock_for_drawing`.
    fn present(&mut self, canvas: Self::Canvas);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Canvas fill
    Clear(Color),
    /// A batch of segments sharing a stroke
    Lines {
        /// Segments in draw order
        segments: Vec<Segment>,
        /// Shared stroke
        style: LineStyle,
    },
    /// A text draw
    Text {
        /// The drawn string
        text: String,
        /// Baseline x
        x: f32,
        /// Baseline y
        y: f32,
        /// Font
        style: TextStyle,
    },
}

/// A canvas that records draw calls so they can be replayed or inspected later.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls in draw order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Whether nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All segments drawn with exactly `style`, in draw order.
    pub fn segments_with(&self, style: &LineStyle) -> Vec<Segment> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Lines { segments, style: s } if s == style => Some(segments),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }

    /// Replays every recorded call onto `target`.
    pub fn replay(&self, target: &mut impl DrawSurface) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => target.clear(*color),
                DrawCommand::Lines { segments, style } => target.draw_lines(segments, style),
                DrawCommand::Text { text, x, y, style } => target.draw_text(text, *x, *y, style),
            }
        }
    }

    /// All recorded text strings, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_lines(&mut self, segments: &[Segment], style: &LineStyle) {
        if segments.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Lines {
            segments: segments.to_vec(),
            style: *style,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            x,
            y,
            style: *style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_channels() {
        let color = Color::from_argb(0x80_11_22_33);
        assert_eq!(color.a(), 0x80);
        assert_eq!(color.r(), 0x11);
        assert_eq!(color.g(), 0x22);
        assert_eq!(color.b(), 0x33);
        assert_eq!(Color::from_rgb(0x11, 0x22, 0x33), Color(0xFF11_2233));
    }

    #[test]
    fn test_draw_list_records_in_order() {
        let thin = LineStyle::new(Color::BLACK, 1.0);
        let thick = LineStyle::new(Color::BLACK, 3.0);
        let mut list = DrawList::new();
        list.clear(Color::WHITE);
        list.draw_line(Segment::vertical(4.0, 10.0), &thin);
        list.draw_lines(&[], &thick);
        list.draw_lines(&[Segment::horizontal(2.0, 10.0)], &thick);

        assert_eq!(list.commands().len(), 3);
        assert_eq!(list.commands()[0], DrawCommand::Clear(Color::WHITE));
        assert_eq!(list.segments_with(&thin), vec![Segment::new(4.0, 0.0, 4.0, 10.0)]);
        assert_eq!(list.segments_with(&thick), vec![Segment::new(0.0, 2.0, 10.0, 2.0)]);
    }

    #[test]
    fn test_replay_reproduces_recording() {
        let style = LineStyle::new(Color::BLACK, 2.0);
        let mut list = DrawList::new();
        list.clear(Color::WHITE);
        list.draw_line(Segment::vertical(1.0, 5.0), &style);
        list.draw_text("5mm", 0.0, 10.0, &TextStyle { color: Color::BLACK, size: 8.0 });

        let mut copy = DrawList::new();
        list.replay(&mut copy);
        assert_eq!(copy, list);
    }

    #[test]
    fn test_default_text_bounds_grow_with_length() {
        let list = DrawList::new();
        let style = TextStyle { color: Color::BLACK, size: 10.0 };
        let short = list.text_bounds("1cm", &style);
        let long = list.text_bounds("> 10cm", &style);
        assert!(long.width > short.width);
        assert_eq!(short.height, 10.0);
    }
}
