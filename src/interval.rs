//! Gridline interval sets and the selection of the two visible tiers.
//!
//! The board shows up to two gridline tiers at a time. Which spacings become the
//! secondary and tertiary tier depends on the zoom multiplier, the showing window
//! (in millimeters of on-screen spacing) and an [`IntervalStrategy`].

use crate::constants::DEFAULT_INTERVALS;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// An immutable, ascending set of gridline spacings in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct IntervalSet(Vec<f32>);

impl IntervalSet {
    /// Validates and stores a set of spacings.
    ///
    /// The input must hold at least two finite positive values ordered strictly
    /// increasing or strictly decreasing. Decreasing input is stored reversed.
    pub fn new(mut values: Vec<f32>) -> Result<Self, ConfigError> {
        if values.len() < 2 {
            return Err(ConfigError::TooFewIntervals(values.len()));
        }
        if let Some(bad) = values.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
            return Err(ConfigError::NonPositiveInterval(*bad));
        }

        let increasing = values.windows(2).all(|w| w[0] < w[1]);
        let decreasing = values.windows(2).all(|w| w[0] > w[1]);
        if decreasing {
            values.reverse();
        } else if !increasing {
            return Err(ConfigError::NotMonotonic);
        }
        Ok(Self(values))
    }

    /// Spacings, smallest first.
    pub fn values(&self) -> &[f32] {
        &self.0
    }

    /// Smallest spacing.
    pub fn smallest(&self) -> f32 {
        self.0[0]
    }

    /// Largest spacing.
    pub fn largest(&self) -> f32 {
        self.0[self.0.len() - 1]
    }

    /// Number of spacings (always at least two).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for IntervalSet {
    fn default() -> Self {
        Self(DEFAULT_INTERVALS.to_vec())
    }
}

impl TryFrom<Vec<f32>> for IntervalSet {
    type Error = ConfigError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<IntervalSet> for Vec<f32> {
    fn from(set: IntervalSet) -> Self {
        set.0
    }
}

/// Which two of the showing intervals become the secondary and tertiary tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntervalStrategy {
    /// Secondary is the smallest showing spacing, tertiary the largest.
    #[serde(rename = "MIN_MAX")]
    MinMax,
    /// The two largest showing spacings.
    #[serde(rename = "MIN_2")]
    Min2,
    /// The two smallest showing spacings.
    #[default]
    #[serde(rename = "MAX_2")]
    Max2,
}

impl IntervalStrategy {
    /// Picks the tiers from showing spacings sorted ascending.
    fn pick(self, showing: &[f32]) -> ActiveIntervals {
        let (Some(first), Some(last)) = (showing.first(), showing.last()) else {
            return ActiveIntervals::default();
        };
        let (secondary, tertiary) = match self {
            IntervalStrategy::MinMax => (Some(*first), Some(*last)),
            IntervalStrategy::Max2 => (Some(*first), showing.get(1).copied()),
            IntervalStrategy::Min2 => {
                let second_to_last = showing.len().checked_sub(2).map(|i| showing[i]);
                (second_to_last, Some(*last))
            }
        };
        ActiveIntervals { secondary, tertiary }
    }
}

impl TryFrom<i32> for IntervalStrategy {
    type Error = ConfigError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(IntervalStrategy::MinMax),
            1 => Ok(IntervalStrategy::Min2),
            2 => Ok(IntervalStrategy::Max2),
            other => Err(ConfigError::UnknownStrategy(other)),
        }
    }
}

/// Which tier an external readout prefers when asking for "the" interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntervalPriority {
    /// Prefer the secondary tier, fall back to tertiary
    #[default]
    Secondary,
    /// Prefer the tertiary tier, fall back to secondary
    Tertiary,
}

impl TryFrom<i32> for IntervalPriority {
    type Error = ConfigError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(IntervalPriority::Secondary),
            1 => Ok(IntervalPriority::Tertiary),
            other => Err(ConfigError::UnknownPriority(other)),
        }
    }
}

/// The tiers selected for one render pass, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActiveIntervals {
    /// Tier drawn with the heavier stroke
    pub secondary: Option<f32>,
    /// Tier drawn with the lighter stroke
    pub tertiary: Option<f32>,
}

impl ActiveIntervals {
    /// The interval at `priority`, falling back to the other tier, else `0.0`.
    pub fn interval_mm(&self, priority: IntervalPriority) -> f32 {
        let (preferred, other) = match priority {
            IntervalPriority::Secondary => (self.secondary, self.tertiary),
            IntervalPriority::Tertiary => (self.tertiary, self.secondary),
        };
        preferred.or(other).unwrap_or(0.0)
    }
}

/// Selects the secondary and tertiary tiers for a zoom `multiplier`.
///
/// A spacing is showing when `spacing * multiplier` lies in `[min_mm, max_mm]`. When
/// none is, the nearest violators are substituted: the largest spacing that scales
/// below `min_mm` and the smallest that scales above `max_mm`. A non-empty set
/// therefore always yields at least one tier.
pub fn select_intervals(
    set: &IntervalSet,
    multiplier: f32,
    min_mm: f32,
    max_mm: f32,
    strategy: IntervalStrategy,
) -> ActiveIntervals {
    let values = set.values();
    let mut showing: Vec<f32> = values
        .iter()
        .copied()
        .filter(|v| (min_mm..=max_mm).contains(&(v * multiplier)))
        .collect();

    if showing.is_empty() {
        if let Some(below) = values.iter().rev().find(|v| *v * multiplier < min_mm) {
            showing.push(*below);
        }
        if let Some(above) = values.iter().find(|v| *v * multiplier > max_mm) {
            showing.push(*above);
        }
    }

    strategy.pick(&showing)
}

/// Rounds `distance` up to the next whole multiple of `spacing`.
pub fn round_interval(spacing: f32, distance: f32) -> f32 {
    spacing * (distance / spacing).ceil()
}
