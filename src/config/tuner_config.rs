//! Tuner configuration file support.
//!
//! Startup values for the tuner settings can be read from a JSON file and
//! applied through the settings registry, so they pass the same validation as
//! interactive `SET` commands.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::settings::{SettingError, SettingsRegistry};
use crate::tuner::{DISABLE_INDEX, ENABLE_INDEX, FIX_EMPTY_TABLE};

/// Errors raised while loading or applying a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration rejected: {0}")]
    Setting(#[from] SettingError),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Startup values for the tuner settings; absent fields keep their defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TunerConfig {
    pub disable_index: Option<String>,
    pub enable_index: Option<String>,
    pub fix_empty_table: Option<bool>,
}

impl TunerConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a configuration file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Apply every present value through the registry
    pub fn apply(&self, registry: &mut SettingsRegistry) -> ConfigResult<()> {
        if let Some(value) = &self.disable_index {
            registry.set(DISABLE_INDEX, value)?;
        }
        if let Some(value) = &self.enable_index {
            registry.set(ENABLE_INDEX, value)?;
        }
        if let Some(value) = self.fix_empty_table {
            registry.set(FIX_EMPTY_TABLE, if value { "on" } else { "off" })?;
        }
        Ok(())
    }
}
