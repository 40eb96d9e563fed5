//! Opponent configuration.
//!
//! The `[ai]` table of a TOML config file maps onto [`AiConfig`]; any field
//! left out takes its default.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::difficulty::{Difficulty, DifficultyProfile};
use crate::selector::MoveSelector;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Settings for the computer opponent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct AiConfig {
    /// Difficulty level. Defaults to medium.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Seed for reproducible play; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Caps the search depth of the chosen level.
    #[serde(default)]
    pub max_depth: Option<u32>,
}

impl AiConfig {
    /// Parses a standalone `AiConfig` document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// The difficulty's table row with `max_depth` applied.
    pub fn profile(&self) -> DifficultyProfile {
        let mut profile = self.difficulty.profile();
        if let Some(cap) = self.max_depth {
            profile.depth = profile.depth.min(cap.max(1));
        }
        profile
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Builds a selector for these settings.
    pub fn build_selector(&self) -> MoveSelector<StdRng> {
        MoveSelector::with_profile(self.difficulty, self.profile(), self.rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_parse_full_config() {
        let config = AiConfig::from_toml(
            r#"
difficulty = "world_champion"
seed = 7
max_depth = 3
"#,
        )
        .unwrap();
        assert_eq!(config.difficulty, Difficulty::WorldChampion);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_depth, Some(3));
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let config = AiConfig::from_toml("").unwrap();
        assert_eq!(config, AiConfig::default());
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.seed, None);
        assert_eq!(config.profile(), Difficulty::Medium.profile());
    }

    #[test]
    fn test_invalid_difficulty_is_rejected() {
        let result = AiConfig::from_toml(r#"difficulty = "grandmaster""#);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_max_depth_caps_profile() {
        let config = AiConfig {
            difficulty: Difficulty::Average,
            seed: None,
            max_depth: Some(2),
        };
        let profile = config.profile();
        assert_eq!(profile.depth, 2);
        assert_eq!(profile.consult_advisor, Difficulty::Average.profile().consult_advisor);

        let shallow = AiConfig {
            difficulty: Difficulty::Easy,
            seed: None,
            max_depth: Some(9),
        };
        assert_eq!(shallow.profile().depth, 2);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let config = AiConfig {
            seed: Some(99),
            ..AiConfig::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_file_gives_default() {
        let config = AiConfig::load_from(Path::new("definitely/not/here/chess.toml")).unwrap();
        assert_eq!(config, AiConfig::default());
    }

    #[test]
    fn test_roundtrip_serialization() {
        let config = AiConfig {
            difficulty: Difficulty::Reactive,
            seed: Some(5),
            max_depth: None,
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(AiConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_build_selector_uses_profile() {
        let config = AiConfig {
            difficulty: Difficulty::Hard,
            seed: Some(1),
            max_depth: Some(1),
        };
        let selector = config.build_selector();
        assert_eq!(selector.difficulty(), Difficulty::Hard);
        assert_eq!(selector.profile().depth, 1);
    }
}
