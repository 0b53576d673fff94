//! # Configuration Persistence
//!
//! Save and load client settings to/from disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Production API root.
pub const DEFAULT_API_URL: &str = "https://vartaai-production.up.railway.app/api/v1";

/// Environment variable that overrides [`Config::api_url`].
pub const API_URL_ENV: &str = "VARTA_API_URL";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the CRM API, including the `/api/v1` prefix.
    pub api_url: String,

    /// Number of characters a typed phone number needs before chat history
    /// is fetched for it.
    #[serde(default = "default_history_min_phone_len")]
    pub history_min_phone_len: usize,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_history_min_phone_len() -> usize {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            history_min_phone_len: default_history_min_phone_len(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Directory holding the config and session files.
    #[must_use]
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("varta"))
    }

    /// Returns the config file path.
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Default location of the persisted session.
    #[must_use]
    pub fn session_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("session.json"))
    }

    /// Loads configuration from the platform config directory, then applies
    /// environment overrides.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::warn!("Could not determine config directory");
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    /// Loads configuration from `path`, or returns defaults if it is missing
    /// or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(?path, "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Overrides the API URL from `VARTA_API_URL` when set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                tracing::debug!(url, "Using API URL from environment");
                self.api_url = url.to_string();
            }
        }
    }

    /// Saves configuration to the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the directory is unknown or the write fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Saves configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        tracing::info!(?path, "Saved configuration");
        Ok(())
    }
}
