//! Grid engine configuration.
//!
//! Every recognised option of the board surface lives in [`GridConfig`]. The
//! struct is `serde` friendly with `#[serde(default)]`, so a host can persist or
//! ship a partial JSON document and inherit the defaults for everything else.

use crate::constants::*;
use crate::error::ConfigError;
use crate::interval::{select_intervals, ActiveIntervals, IntervalSet, IntervalStrategy};
use crate::surface::{Color, LineStyle};
use serde::{Deserialize, Serialize};

/// One of the two gridline tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Heavier tier, drawn last
    Secondary,
    /// Lighter tier, drawn first
    Tertiary,
}

/// Options of the grid engine.
///
/// The "x axis" is the vertical line `x = 0` and the "y axis" the horizontal line
/// `y = 0`; the same naming applies to the per-tier x/y gridline styles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Stroke of the `x = 0` axis
    pub x_axis: LineStyle,
    /// Stroke of the `y = 0` axis
    pub y_axis: LineStyle,
    /// Stroke of secondary vertical gridlines
    pub secondary_x: LineStyle,
    /// Stroke of secondary horizontal gridlines
    pub secondary_y: LineStyle,
    /// Stroke of tertiary vertical gridlines
    pub tertiary_x: LineStyle,
    /// Stroke of tertiary horizontal gridlines
    pub tertiary_y: LineStyle,
    /// Canvas fill before any line is drawn
    pub background: Color,
    /// Smallest on-screen spacing in millimeters a tier may have
    pub min_showing_interval_mm: f32,
    /// Largest on-screen spacing in millimeters a tier may have
    pub max_showing_interval_mm: f32,
    /// Lower zoom bound
    pub min_multiplier: f32,
    /// Upper zoom bound
    pub max_multiplier: f32,
    /// Draw the `x = 0` axis
    pub show_x_axis: bool,
    /// Draw the `y = 0` axis
    pub show_y_axis: bool,
    /// Draw secondary vertical gridlines
    pub show_secondary_x: bool,
    /// Draw secondary horizontal gridlines
    pub show_secondary_y: bool,
    /// Draw tertiary vertical gridlines
    pub show_tertiary_x: bool,
    /// Draw tertiary horizontal gridlines
    pub show_tertiary_y: bool,
    /// Candidate spacings in millimeters
    pub intervals: IntervalSet,
    /// How two tiers are picked out of the showing spacings
    pub strategy: IntervalStrategy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x_axis: LineStyle::new(AXIS_COLOR, AXIS_THICKNESS),
            y_axis: LineStyle::new(AXIS_COLOR, AXIS_THICKNESS),
            secondary_x: LineStyle::new(SECONDARY_COLOR, SECONDARY_THICKNESS),
            secondary_y: LineStyle::new(SECONDARY_COLOR, SECONDARY_THICKNESS),
            tertiary_x: LineStyle::new(TERTIARY_COLOR, TERTIARY_THICKNESS),
            tertiary_y: LineStyle::new(TERTIARY_COLOR, TERTIARY_THICKNESS),
            background: BACKGROUND_COLOR,
            min_showing_interval_mm: MIN_SHOWING_INTERVAL_MM,
            max_showing_interval_mm: MAX_SHOWING_INTERVAL_MM,
            min_multiplier: MIN_MULTIPLIER,
            max_multiplier: MAX_MULTIPLIER,
            show_x_axis: true,
            show_y_axis: true,
            show_secondary_x: true,
            show_secondary_y: true,
            show_tertiary_x: true,
            show_tertiary_y: true,
            intervals: IntervalSet::default(),
            strategy: IntervalStrategy::default(),
        }
    }
}

impl GridConfig {
    /// Parses a JSON document and validates the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Checks the numeric ranges. Interval sets validate themselves on construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_multiplier, self.max_multiplier);
        if !(min > 0.0 && min <= max && max.is_finite()) {
            return Err(ConfigError::InvalidMultiplierRange(min, max));
        }
        let (min, max) = (self.min_showing_interval_mm, self.max_showing_interval_mm);
        if !(min > 0.0 && min <= max && max.is_finite()) {
            return Err(ConfigError::InvalidShowingRange(min, max));
        }
        Ok(())
    }

    /// Clamps a multiplier into `[min_multiplier, max_multiplier]`.
    pub fn clamp_multiplier(&self, multiplier: f32) -> f32 {
        if multiplier > self.max_multiplier {
            self.max_multiplier
        } else if multiplier < self.min_multiplier {
            self.min_multiplier
        } else {
            multiplier
        }
    }

    /// Runs the interval selector with this configuration.
    pub fn select_intervals(&self, multiplier: f32) -> ActiveIntervals {
        select_intervals(
            &self.intervals,
            multiplier,
            self.min_showing_interval_mm,
            self.max_showing_interval_mm,
            self.strategy,
        )
    }

    /// Styles and visibility of a tier as `(vertical, horizontal)` pairs.
    pub fn tier_styles(&self, tier: Tier) -> ((LineStyle, bool), (LineStyle, bool)) {
        match tier {
            Tier::Secondary => (
                (self.secondary_x, self.show_secondary_x),
                (self.secondary_y, self.show_secondary_y),
            ),
            Tier::Tertiary => (
                (self.tertiary_x, self.show_tertiary_x),
                (self.tertiary_y, self.show_tertiary_y),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_board_look() {
        let config = GridConfig::default();
        assert_eq!(config.x_axis.thickness, 3.0);
        assert_eq!(config.secondary_x.color, Color(0xFF88_8888));
        assert_eq!(config.tertiary_y.color, Color(0xFFBB_BBBB));
        assert_eq!(config.background, Color::WHITE);
        assert_eq!(config.strategy, IntervalStrategy::Max2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_inherits_defaults() {
        let config = GridConfig::from_json(
            r#"{ "strategy": "MIN_MAX", "intervals": [2.0, 4.0, 8.0], "show_y_axis": false }"#,
        )
        .unwrap();
        assert_eq!(config.strategy, IntervalStrategy::MinMax);
        assert_eq!(config.intervals.values(), &[2.0, 4.0, 8.0]);
        assert!(!config.show_y_axis);
        assert!(config.show_x_axis);
        assert_eq!(config.max_multiplier, MAX_MULTIPLIER);
    }

    #[test]
    fn test_unknown_strategy_fails_config_load() {
        let result = GridConfig::from_json(r#"{ "strategy": "SOMETIMES" }"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_short_interval_list_fails_config_load() {
        let result = GridConfig::from_json(r#"{ "intervals": [10.0] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_ranges_are_rejected() {
        let inverted = GridConfig {
            min_multiplier: 5.0,
            max_multiplier: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvalidMultiplierRange(_, _))
        ));

        let zero_window = GridConfig {
            min_showing_interval_mm: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_window.validate(),
            Err(ConfigError::InvalidShowingRange(_, _))
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_configuration() {
        let config = GridConfig {
            strategy: IntervalStrategy::Min2,
            show_tertiary_x: false,
            ..Default::default()
        };
        let restored = GridConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_clamp_multiplier() {
        let config = GridConfig::default();
        assert_eq!(config.clamp_multiplier(1000.0), MAX_MULTIPLIER);
        assert_eq!(config.clamp_multiplier(0.0), MIN_MULTIPLIER);
        assert_eq!(config.clamp_multiplier(2.0), 2.0);
    }
}
