//! Shared application-wide constants.
//! Centralizes tweakable defaults used by the grid engine, scale-bar and components.

use crate::surface::Color;

// Units
/// Millimeters in one inch, used for dpi based conversions.
pub const MILLIMETERS_PER_INCH: f32 = 25.4;
/// Density assumed when the host does not report one.
pub const DEFAULT_DPI: f32 = 160.0;

// Intervals
/// Default gridline spacings in millimeters: a ratio 2 sequence centered at 10mm.
pub const DEFAULT_INTERVALS: [f32; 7] = [1.25, 2.5, 5.0, 10.0, 20.0, 40.0, 80.0];
/// Smallest on-screen spacing (in millimeters) a tier may have to be shown.
pub const MIN_SHOWING_INTERVAL_MM: f32 = 1.0;
/// Largest on-screen spacing (in millimeters) a tier may have to be shown.
pub const MAX_SHOWING_INTERVAL_MM: f32 = 20.0;

// Zoom
/// Lower bound of the zoom multiplier.
pub const MIN_MULTIPLIER: f32 = 0.075;
/// Upper bound of the zoom multiplier.
pub const MAX_MULTIPLIER: f32 = 75.0;
/// Multiplier a freshly activated viewport starts with.
pub const DEFAULT_MULTIPLIER: f32 = 1.0;

// Grid colors and strokes
/// Background fill of the board.
pub const BACKGROUND_COLOR: Color = Color::WHITE;
/// Primary axis color.
pub const AXIS_COLOR: Color = Color::BLACK;
/// Secondary tier gridline color.
pub const SECONDARY_COLOR: Color = Color::from_argb(0xFF88_8888);
/// Tertiary tier gridline color.
pub const TERTIARY_COLOR: Color = Color::from_argb(0xFFBB_BBBB);
/// Primary axis stroke width in pixels.
pub const AXIS_THICKNESS: f32 = 3.0;
/// Secondary tier stroke width in pixels.
pub const SECONDARY_THICKNESS: f32 = 2.0;
/// Tertiary tier stroke width in pixels.
pub const TERTIARY_THICKNESS: f32 = 1.0;

// Scale-bar
/// Label text size in pixels.
pub const SCALE_BAR_TEXT_SIZE: f32 = 16.0;
/// Thickness of the reference segment.
pub const SCALE_BAR_LINE_THICKNESS: f32 = 8.0;
/// Gap between the label and the reference segment.
pub const SCALE_BAR_LINE_TOP_PADDING: f32 = 4.0;
/// Prefix added to the label when the segment would overflow its reserved width.
pub const SCALE_BAR_OVERFLOW_PREFIX: &str = "> ";

// Components
/// Footprint width of the passthrough component in millimeters.
pub const PASSTHROUGH_WIDTH: f32 = 8.0;
/// Footprint height of the passthrough component in millimeters.
pub const PASSTHROUGH_HEIGHT: f32 = 2.0;
/// Nickname given to the first contact of a wire.
pub const WIRE_START_NICKNAME: &str = "wire_start";
/// Nickname given to the second contact of a wire.
pub const WIRE_END_NICKNAME: &str = "wire_end";

// Host
/// Radius of a contact dot in pixels.
pub const CONTACT_RADIUS: f32 = 4.0;
/// How close a click must land to a contact to pick it, in pixels.
pub const CONTACT_HIT_RADIUS: f32 = 10.0;
/// Margin between the canvas corner and the scale-bar.
pub const SCALE_BAR_MARGIN: f32 = 16.0;
/// Zoom applied per scrolled pixel when no pinch is in progress.
pub const SCROLL_ZOOM_SPEED: f32 = 0.002;
/// Storage key of the persisted host settings.
pub const SETTINGS_KEY: &str = "board_settings";
