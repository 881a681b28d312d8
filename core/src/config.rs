//! Configuration surface honoured by the session and its adapters.

use std::{fmt, ops::RangeInclusive, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Move-selection strategy used while a level is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Randomized local mover choosing among safe neighbouring tiles.
    Random,
    /// Breadth-first path search toward the food tile.
    #[default]
    Backtracking,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Backtracking => write!(f, "backtracking"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "backtracking" => Ok(Self::Backtracking),
            _ => Err(ParseStrategyError(value.to_owned())),
        }
    }
}

/// Error returned when a player type string names no known strategy.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid player type '{0}', expected 'random' or 'backtracking'")]
pub struct ParseStrategyError(String);

/// Key used by the pathfinder to deduplicate explored states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitedPolicy {
    /// Deduplicate on head position and heading only.
    ///
    /// Bounds the search to four states per tile but may prune a route whose
    /// trailing body differs from the first state seen at the same head.
    #[default]
    HeadAndHeading,
    /// Deduplicate on head position, heading and the full simulated body.
    FullBody,
}

/// Points awarded per food tile: `base + per_segment * body_length`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scoring {
    /// Flat points for every food tile.
    pub base: u32,
    /// Points per body segment the snake has before eating.
    pub per_segment: u32,
}

impl Scoring {
    /// Points earned by a snake of `body_length` segments eating one food tile.
    #[must_use]
    pub fn points(&self, body_length: usize) -> u32 {
        let length = u32::try_from(body_length).unwrap_or(u32::MAX);
        self.base
            .saturating_add(self.per_segment.saturating_mul(length))
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            base: 10,
            per_segment: 5,
        }
    }
}

/// Recognised options of a Snaze session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Frames presented per second.
    pub fps: u32,
    /// Lives the snake starts the session with.
    pub lives: u32,
    /// Food tiles that must be eaten to clear a level.
    pub food_per_level: u32,
    /// Move-selection strategy.
    pub strategy: Strategy,
    /// Deduplication key used by the path search.
    pub visited: VisitedPolicy,
    /// Score formula.
    pub scoring: Scoring,
    /// Seed for the session's random source; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Accepted frame rates.
    pub const FPS_RANGE: RangeInclusive<u32> = 1..=50;
    /// Accepted starting life counts.
    pub const LIVES_RANGE: RangeInclusive<u32> = 1..=20;
    /// Accepted per-level food quotas.
    pub const FOOD_RANGE: RangeInclusive<u32> = 1..=20;

    /// Checks every bounded option against its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("fps", self.fps, Self::FPS_RANGE)?;
        check_range("lives", self.lives, Self::LIVES_RANGE)?;
        check_range("food", self.food_per_level, Self::FOOD_RANGE)?;
        Ok(())
    }

    /// Delay that precedes every drawn frame.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: 12,
            lives: 5,
            food_per_level: 10,
            strategy: Strategy::default(),
            visited: VisitedPolicy::default(),
            scoring: Scoring::default(),
            seed: None,
        }
    }
}

/// Reasons a configuration is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A bounded option lies outside its valid range.
    #[error("invalid value for {field}: {value}, valid range is [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending option.
        field: &'static str,
        /// Value that was provided.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },
}

fn check_range(
    field: &'static str,
    value: u32,
    range: RangeInclusive<u32>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = GameConfig::default();
        assert_eq!(config.fps, 12);
        assert_eq!(config.lives, 5);
        assert_eq!(config.food_per_level, 10);
        assert_eq!(config.strategy, Strategy::Backtracking);
        assert_eq!(config.visited, VisitedPolicy::HeadAndHeading);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_fps() {
        let config = GameConfig {
            fps: 51,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "fps",
                value: 51,
                min: 1,
                max: 50,
            })
        );
    }

    #[test]
    fn validate_rejects_zero_lives_and_food() {
        let lives = GameConfig {
            lives: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            lives.validate(),
            Err(ConfigError::OutOfRange { field: "lives", .. })
        ));

        let food = GameConfig {
            food_per_level: 21,
            ..GameConfig::default()
        };
        assert!(matches!(
            food.validate(),
            Err(ConfigError::OutOfRange { field: "food", .. })
        ));
    }

    #[test]
    fn strategy_parsing_ignores_case() {
        assert_eq!("Random".parse::<Strategy>(), Ok(Strategy::Random));
        assert_eq!("BACKTRACKING".parse::<Strategy>(), Ok(Strategy::Backtracking));
        assert!("greedy".parse::<Strategy>().is_err());
    }

    #[test]
    fn scoring_grows_with_body_length() {
        let scoring = Scoring::default();
        assert_eq!(scoring.points(1), 15);
        assert_eq!(scoring.points(4), 30);
    }

    #[test]
    fn frame_interval_follows_fps() {
        let config = GameConfig {
            fps: 10,
            ..GameConfig::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_millis(100));
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            lives = 3
            strategy = "random"

            [scoring]
            base = 20
            "#,
        )
        .expect("config parses");

        assert_eq!(config.lives, 3);
        assert_eq!(config.strategy, Strategy::Random);
        assert_eq!(config.scoring.base, 20);
        assert_eq!(config.scoring.per_segment, 5);
        assert_eq!(config.fps, 12);
    }

    #[test]
    fn unknown_toml_keys_are_rejected() {
        let result: Result<GameConfig, _> = toml::from_str("speed = 3");
        assert!(result.is_err());
    }
}
