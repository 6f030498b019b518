//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `timetrek-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads the file. All
//! fields have defaults, so a missing section or an empty file yields a
//! playable configuration.

use std::path::Path;

use chrono::{Datelike, Utc};
use serde::Deserialize;

use timetrek_types::{DistanceUnit, GameMode, GameSettings};

use crate::session::{
    DEFAULT_GUESS_YEAR, DEFAULT_YEAR_MIN, SessionError, YearBounds,
};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `timetrek-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Default settings a new session starts with.
    #[serde(default)]
    pub game: DefaultGameConfig,

    /// Year slider rules.
    #[serde(default)]
    pub rules: RulesConfig,

    /// Event catalog location.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `TIMETREK_EVENTS` environment variable overrides
    /// `catalog.events_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.catalog.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.catalog.apply_env_overrides();
        Ok(config)
    }
}

/// Default settings for a new session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefaultGameConfig {
    /// Game mode a plain start uses.
    #[serde(default = "default_mode")]
    pub mode: GameMode,

    /// Unit used when presenting distances.
    #[serde(default = "default_distance_unit")]
    pub distance_unit: DistanceUnit,

    /// Whether the per-round countdown starts enabled.
    #[serde(default)]
    pub timer_enabled: bool,

    /// Countdown length in minutes.
    #[serde(default = "default_timer_duration")]
    pub timer_duration: u32,
}

impl DefaultGameConfig {
    /// The configured defaults as a [`GameSettings`] value.
    pub const fn settings(&self) -> GameSettings {
        GameSettings {
            game_mode: self.mode,
            distance_unit: self.distance_unit,
            timer_enabled: self.timer_enabled,
            timer_duration: self.timer_duration,
        }
    }
}

impl Default for DefaultGameConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            distance_unit: default_distance_unit(),
            timer_enabled: false,
            timer_duration: default_timer_duration(),
        }
    }
}

/// Year slider rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RulesConfig {
    /// Lowest selectable year.
    #[serde(default = "default_year_min")]
    pub year_min: i32,

    /// Highest selectable year; the current calendar year when absent.
    #[serde(default)]
    pub year_max: Option<i32>,

    /// Year every round's guess starts at.
    #[serde(default = "default_guess_year")]
    pub default_year: i32,
}

impl RulesConfig {
    /// The configured rules as validated [`YearBounds`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidYearBounds`] when the configured
    /// values do not satisfy `min <= default <= max`.
    pub fn bounds(&self) -> Result<YearBounds, SessionError> {
        let max = self.year_max.unwrap_or_else(|| Utc::now().year());
        YearBounds::new(self.year_min, max, self.default_year)
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            year_min: default_year_min(),
            year_max: None,
            default_year: default_guess_year(),
        }
    }
}

/// Event catalog location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// Path of the events YAML file.
    #[serde(default = "default_events_path")]
    pub events_path: String,
}

impl CatalogConfig {
    /// Apply environment overrides: `TIMETREK_EVENTS` replaces the
    /// events path when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("TIMETREK_EVENTS") {
            self.events_path = path;
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            events_path: default_events_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_mode() -> GameMode {
    GameMode::Classic
}

const fn default_distance_unit() -> DistanceUnit {
    DistanceUnit::Km
}

const fn default_timer_duration() -> u32 {
    5
}

const fn default_year_min() -> i32 {
    DEFAULT_YEAR_MIN
}

const fn default_guess_year() -> i32 {
    DEFAULT_GUESS_YEAR
}

fn default_events_path() -> String {
    String::from("data/events.yaml")
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = GameConfig::parse("{}").unwrap();
        assert_eq!(config.game.mode, GameMode::Classic);
        assert_eq!(config.game.distance_unit, DistanceUnit::Km);
        assert!(!config.game.timer_enabled);
        assert_eq!(config.game.timer_duration, 5);
        assert_eq!(config.rules.year_min, 1900);
        assert_eq!(config.rules.default_year, 1962);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_yaml_overrides_defaults() {
        let yaml = r"
game:
  mode: timed
  timer_enabled: true
  timer_duration: 2
rules:
  year_min: 1850
  year_max: 2020
";
        let config = GameConfig::parse(yaml).unwrap();
        assert_eq!(config.game.mode, GameMode::Timed);
        assert!(config.game.timer_enabled);
        assert_eq!(config.game.timer_duration, 2);
        assert_eq!(config.rules.year_min, 1850);
        assert_eq!(config.rules.year_max, Some(2020));
        // Untouched section keeps its default.
        assert_eq!(config.catalog.events_path, "data/events.yaml");
    }

    #[test]
    fn settings_mapping() {
        let config = GameConfig::parse("game:\n  mode: daily\n").unwrap();
        let settings = config.game.settings();
        assert_eq!(settings.game_mode, GameMode::Daily);
        assert_eq!(settings.timer_duration, 5);
    }

    #[test]
    fn bounds_default_to_current_year() {
        let config = GameConfig::default();
        let bounds = config.rules.bounds().unwrap();
        assert_eq!(bounds.min, 1900);
        assert_eq!(bounds.default, 1962);
        assert_eq!(bounds.max, Utc::now().year());
    }

    #[test]
    fn inverted_rules_are_rejected() {
        let yaml = r"
rules:
  year_min: 2000
  year_max: 2020
  default_year: 1962
";
        let config = GameConfig::parse(yaml).unwrap();
        assert!(config.rules.bounds().is_err());
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        assert!(matches!(
            GameConfig::parse("game: [").unwrap_err(),
            ConfigError::Yaml { .. }
        ));
    }
}
