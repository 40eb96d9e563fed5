//! Configuration file loading for the terminal driver.

use chess_ai::{AiConfig, ConfigError};
use chess_core::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Driver settings. Uses `chess.toml` in the current directory by default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayConfig {
    /// Side the human plays. Defaults to white.
    #[serde(default = "default_human_color")]
    pub human_color: Color,
    /// Ply limit for unattended self-play. Defaults to 200.
    #[serde(default = "default_self_play_plies")]
    pub self_play_plies: u32,
    /// Opponent settings from the `[ai]` table.
    #[serde(default)]
    pub ai: AiConfig,
}

fn default_human_color() -> Color {
    Color::White
}

fn default_self_play_plies() -> u32 {
    200
}

impl Default for PlayConfig {
    fn default() -> Self {
        PlayConfig {
            human_color: default_human_color(),
            self_play_plies: default_self_play_plies(),
            ai: AiConfig::default(),
        }
    }
}

impl PlayConfig {
    /// Loads the configuration from `path`.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default configuration path.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }
}
