//! Game configuration loaded from TOML

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::models::Difficulty;

const EMBEDDED_CONFIG: &str = include_str!("../config/default.toml");

/// Upper bounds for timer settings
pub const MAX_DELIBERATION_MS: u64 = 60_000;
pub const MAX_DARE_SECONDS: u32 = 3_600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Chance of TRUTH on the random path
    pub truth_probability: f64,
    /// Chance that a DARE becomes a photo task
    pub photo_probability: f64,
    pub photo_prefix: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            truth_probability: 0.8,
            photo_probability: 0.2,
            photo_prefix: "📸 ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Delay before a selected task is revealed
    pub deliberation_ms: u64,
    /// Countdown for timed dares
    pub dare_seconds: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            deliberation_ms: 1500,
            dare_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub default_difficulty: Difficulty,
    pub default_category: String,
    pub starting_skip_tokens: u32,
    /// Number of resolved tasks kept in memory
    pub history_limit: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            default_difficulty: Difficulty::Medium,
            default_category: "classic".to_string(),
            starting_skip_tokens: 1,
            history_limit: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub selector: SelectorConfig,
    pub timers: TimerConfig,
    pub game: RulesConfig,
}

impl GameConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig =
            toml::from_str(content).map_err(|e| GameError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The configuration shipped with the crate
    pub fn embedded() -> Self {
        match Self::from_toml_str(EMBEDDED_CONFIG) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Embedded config rejected, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, p) in [
            ("selector.truth_probability", self.selector.truth_probability),
            ("selector.photo_probability", self.selector.photo_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(GameError::Config(format!("{} must be within 0..=1, got {}", name, p)));
            }
        }
        if self.timers.deliberation_ms > MAX_DELIBERATION_MS {
            return Err(GameError::Config(format!(
                "timers.deliberation_ms must be at most {}, got {}",
                MAX_DELIBERATION_MS, self.timers.deliberation_ms
            )));
        }
        if self.timers.dare_seconds > MAX_DARE_SECONDS {
            return Err(GameError::Config(format!(
                "timers.dare_seconds must be at most {}, got {}",
                MAX_DARE_SECONDS, self.timers.dare_seconds
            )));
        }
        if self.game.history_limit == 0 {
            return Err(GameError::Config("game.history_limit must be positive".to_string()));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GameError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = GameConfig::from_toml_str(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config.selector.truth_probability, 0.8);
        assert_eq!(config.timers.dare_seconds, 60);
        assert_eq!(config.game.default_difficulty, Difficulty::Medium);
        assert_eq!(config, GameConfig::embedded());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = GameConfig::from_toml_str("[timers]\ndare_seconds = 30\n").unwrap();
        assert_eq!(config.timers.dare_seconds, 30);
        assert_eq!(config.timers.deliberation_ms, 1500);
        assert_eq!(config.selector, SelectorConfig::default());
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let err = GameConfig::from_toml_str("[selector]\ntruth_probability = 1.5\n").unwrap_err();
        assert!(matches!(err, GameError::Config(msg) if msg.contains("truth_probability")));
    }

    #[test]
    fn test_out_of_range_timers_rejected() {
        let err = GameConfig::from_toml_str("[timers]\ndeliberation_ms = 9223372036854775807\n").unwrap_err();
        assert!(matches!(err, GameError::Config(msg) if msg.contains("deliberation_ms")));

        let err = GameConfig::from_toml_str("[timers]\ndare_seconds = 4000000000\n").unwrap_err();
        assert!(matches!(err, GameError::Config(msg) if msg.contains("dare_seconds")));

        let config = GameConfig::from_toml_str("[timers]\ndeliberation_ms = 60000\ndare_seconds = 3600\n").unwrap();
        assert_eq!(config.timers.deliberation_ms, MAX_DELIBERATION_MS);
    }

    #[test]
    fn test_garbage_is_config_error() {
        assert!(matches!(
            GameConfig::from_toml_str("[timers\n"),
            Err(GameError::Config(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GameConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(GameConfig::from_toml_str(&text).unwrap(), config);
    }
}
