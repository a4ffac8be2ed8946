//! Tunable gameplay configuration
//!
//! Everything here can be changed without touching the simulation. Missing
//! keys in a JSON override fall back to the defaults.

use serde::Deserialize;
use thiserror::Error;

/// How a drop is tested against the bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropMode {
    /// The release point must be inside the bin
    #[default]
    Point,
    /// Any overlap between the item and the bin counts
    Overlap,
}

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("trash_types must contain at least one glyph")]
    NoTrashTypes,
    #[error("base_trash_count must be at least 1")]
    ZeroBaseCount,
    #[error("max_level must be at least 1")]
    ZeroMaxLevel,
    #[error("escape_radius must be finite and non-negative, got {0}")]
    InvalidEscapeRadius(f32),
    #[error("disturbance_chance_per_second must be within [0, 1], got {0}")]
    InvalidProbability(f64),
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Glyphs a trash item can be drawn with
    pub trash_types: Vec<String>,
    /// Wave size at level 1
    pub base_trash_count: u32,
    /// Extra items per level
    pub level_increase: u32,
    /// Pointer distance (px, plus half the item width) that makes items flee
    pub escape_radius: f32,
    /// Chance per second that the paw shows up
    pub disturbance_chance_per_second: f64,
    /// Last level; clearing it ends the game
    pub max_level: u32,
    pub drop_mode: DropMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            trash_types: ["🍌", "🍕", "💩", "🥑", "🤡", "🍟", "🧻", "🧃"]
                .into_iter()
                .map(String::from)
                .collect(),
            base_trash_count: 3,
            level_increase: 1,
            escape_radius: 70.0,
            disturbance_chance_per_second: 0.06,
            max_level: 12,
            drop_mode: DropMode::Point,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trash_types.is_empty() {
            return Err(ConfigError::NoTrashTypes);
        }
        if self.base_trash_count == 0 {
            return Err(ConfigError::ZeroBaseCount);
        }
        if self.max_level == 0 {
            return Err(ConfigError::ZeroMaxLevel);
        }
        if !self.escape_radius.is_finite() || self.escape_radius < 0.0 {
            return Err(ConfigError::InvalidEscapeRadius(self.escape_radius));
        }
        if !(0.0..=1.0).contains(&self.disturbance_chance_per_second) {
            return Err(ConfigError::InvalidProbability(
                self.disturbance_chance_per_second,
            ));
        }
        Ok(())
    }

    /// Wave size (and catch threshold) for a level
    pub fn trash_count_for_level(&self, level: u32) -> u32 {
        self.base_trash_count + level.saturating_sub(1) * self.level_increase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trash_types.len(), 8);
        assert_eq!(config.trash_count_for_level(1), 3);
        assert_eq!(config.trash_count_for_level(2), 4);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            GameConfig::from_json(r#"{"max_level": 3, "drop_mode": "overlap"}"#).unwrap();
        assert_eq!(config.max_level, 3);
        assert_eq!(config.drop_mode, DropMode::Overlap);
        assert_eq!(config.base_trash_count, 3);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            GameConfig::from_json(r#"{"trash_types": []}"#),
            Err(ConfigError::NoTrashTypes)
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"disturbance_chance_per_second": 1.5}"#),
            Err(ConfigError::InvalidProbability(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"escape_radius": -1.0}"#),
            Err(ConfigError::InvalidEscapeRadius(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"base_trash_count": 0}"#),
            Err(ConfigError::ZeroBaseCount)
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"max_level": 0}"#),
            Err(ConfigError::ZeroMaxLevel)
        ));
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
