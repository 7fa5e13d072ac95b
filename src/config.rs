use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    /// Start a fresh game as soon as one ends.
    pub auto_reset: bool,
    /// When any capture is available at the start of a turn, only captures are legal.
    pub mandatory_capture: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            auto_reset: true,
            mandatory_capture: false,
        }
    }
}

impl GameConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
