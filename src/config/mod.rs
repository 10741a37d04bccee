// Logsight - GPL-3.0-or-later
// This file is part of Logsight.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// Logsight is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Logsight is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Logsight.  If not, see <https://www.gnu.org/licenses/>.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the configured log service URL
pub const URL_ENV_VAR: &str = "LOGSIGHT_URL";

const DEFAULT_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to write config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Global user configuration stored in config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Base URL of the log service REST API
    pub log_service_url: String,

    pub request_timeout_secs: u64,

    /// Default `limit` for log queries
    pub default_limit: Option<usize>,

    /// Default refresh period for watch mode
    pub refresh_interval_secs: Option<u64>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_service_url: DEFAULT_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_limit: None,
            refresh_interval_secs: None,
        }
    }
}

impl GlobalConfig {
    /// Get the path to the global config file
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config_dir| config_dir.join("logsight").join("config.json"))
    }

    /// Load global config from disk, returning defaults if not found
    #[must_use]
    pub fn load() -> Self {
        Self::config_path().map_or_else(Self::default, |path| Self::load_from(&path))
    }

    /// Load config from `path`. A missing or unreadable file yields defaults.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("No global config found, using defaults");
            return Self::default();
        }

        tracing::info!("Loading global config from {}", path.display());
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring invalid config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Could not read config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Apply the `LOGSIGHT_URL` override, if set
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_url_override(std::env::var(URL_ENV_VAR).ok())
    }

    /// Replace the service URL when `url` is a non-empty value
    #[must_use]
    pub fn with_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
            tracing::debug!("Log service URL overridden: {url}");
            self.log_service_url = url;
        }
        self
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Save global config to disk
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(io_error)?;

        tracing::info!("Saved global config to {}", path.display());
        Ok(())
    }
}
