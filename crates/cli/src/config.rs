// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Device configuration management.
//!
//! Configuration is stored in `<state_dir>/config.toml` and includes:
//! - `operator_id`: The field operator this device acts for
//! - `[api]`: Backend base URL, bearer token and request timeout
//! - `[sync]`: Pull, drain and probe intervals and the dead-letter threshold
//!
//! `FIELDKIT_API_URL` and `FIELDKIT_TOKEN` override the stored values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "fieldkit";
const CONFIG_FILE_NAME: &str = "config.toml";
const DATA_DIR_NAME: &str = "data";
const LOG_FILE_NAME: &str = "fieldkit.log";
const LOCK_FILE_NAME: &str = "fieldkit.lock";

/// Device configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Operator whose tickets are pulled and on whose behalf requests are made.
    pub operator_id: String,
    pub api: ApiConfig,
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API (`http://` or `https://`).
    pub base_url: String,
    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Path probed by `fieldkit run` to detect reachability (default: "/health").
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

/// Background sync tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Seconds between ticket pulls while active (default: 300).
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Seconds between background drain attempts while online (default: 60).
    #[serde(default = "default_drain_interval_secs")]
    pub drain_interval_secs: u64,
    /// Seconds between health probes (default: 15).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Permanent failures before a queued job is dead-lettered (default: 5).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    300
}

fn default_drain_interval_secs() -> u64 {
    60
}

fn default_probe_interval_secs() -> u64 {
    15
}

fn default_max_attempts() -> u32 {
    crate::sync::DEFAULT_MAX_ATTEMPTS
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            refresh_interval_secs: default_refresh_interval_secs(),
            drain_interval_secs: default_drain_interval_secs(),
            probe_interval_secs: default_probe_interval_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl SyncSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn drain_interval(&self) -> Duration {
        Duration::from_secs(self.drain_interval_secs.max(1))
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs.max(1))
    }
}

impl Config {
    /// Creates a new config with default sync settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldEmpty`] for a blank operator and
    /// [`Error::InvalidUrl`] for a non-HTTP base URL.
    pub fn new(operator_id: String, base_url: String, token: Option<String>) -> Result<Self> {
        let config = Config {
            operator_id,
            api: ApiConfig {
                base_url,
                token: token.filter(|t| !t.is_empty()),
                request_timeout_secs: default_request_timeout_secs(),
                health_path: default_health_path(),
            },
            sync: SyncSettings::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks required fields.
    pub fn validate(&self) -> Result<()> {
        if self.operator_id.trim().is_empty() {
            return Err(Error::FieldEmpty {
                field: "operator_id",
            });
        }
        validate_url(&self.api.base_url)
    }

    /// Loads configuration from `state_dir`, applying environment overrides.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let mut config = Self::load_file(&config_path(state_dir))?;
        if let Some(url) = env::api_url() {
            config.api.base_url = url;
        }
        if let Some(token) = env::token() {
            config.api.token = Some(token);
        }
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, without environment overrides.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotInitialized(path.display().to_string()));
            }
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Saves configuration into `state_dir`, creating it if needed.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        fs::create_dir_all(state_dir)?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(config_path(state_dir), content)?;
        Ok(())
    }
}

/// Validates an API base URL.
pub fn validate_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.trim_matches('/').is_empty() => Ok(()),
        _ => Err(Error::InvalidUrl(url.to_string())),
    }
}

/// Resolves the state directory.
///
/// `FIELDKIT_STATE_DIR` wins, then `$XDG_STATE_HOME/fieldkit`, then the
/// platform state (or local data) directory.
pub fn state_dir() -> PathBuf {
    if let Some(dir) = env::state_dir() {
        return dir;
    }
    if let Some(xdg) = env::xdg_state_home() {
        return xdg.join(APP_DIR_NAME);
    }
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("state")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

pub fn config_path(state_dir: &Path) -> PathBuf {
    state_dir.join(CONFIG_FILE_NAME)
}

/// Directory of the key-value store (queue, caches).
pub fn data_dir(state_dir: &Path) -> PathBuf {
    state_dir.join(DATA_DIR_NAME)
}

pub fn log_path(state_dir: &Path) -> PathBuf {
    state_dir.join(LOG_FILE_NAME)
}

pub fn lock_path(state_dir: &Path) -> PathBuf {
    state_dir.join(LOCK_FILE_NAME)
}

/// Writes a fresh config into `state_dir`.
///
/// Refuses to overwrite an existing config unless `force` is set.
pub fn init_state_dir(state_dir: &Path, config: &Config, force: bool) -> Result<PathBuf> {
    let path = config_path(state_dir);
    if path.exists() && !force {
        return Err(Error::AlreadyInitialized(state_dir.display().to_string()));
    }
    config.save(state_dir)?;
    fs::create_dir_all(data_dir(state_dir))?;
    Ok(path)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
