//! TOML-based application configuration.
//!
//! Everything environment-dependent is decided here, once, and injected into
//! the components at construction time -- business logic never branches on
//! ambient environment state.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Lift all client-side rate limits. Development only.
    #[serde(default)]
    pub relaxed_limits: bool,

    /// Streak auto-refresh interval in seconds.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Base URL of the backend API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            relaxed_limits: false,
            refresh_interval_secs: default_refresh_interval_secs(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl CoreConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        fs::write(path, text).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn refresh_interval_ms(&self) -> u64 {
        self.refresh_interval_secs * 1_000
    }
}
