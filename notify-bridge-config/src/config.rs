//! Core `Config` struct, persistence and path resolution.
//!
//! Covers:
//! - `load` / `save` (YAML file I/O with atomic write)
//! - `load_from` / `save_to` for explicit paths (`--config`, tests)
//! - XDG-style path helpers (`config_path`, `config_dir`, `session_path`)
//! - Field validation and the `NOTIFY_BRIDGE_ENDPOINT` override

use crate::error::ConfigError;
use crate::types::{LogLevel, PresenterKind};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that replaces [`Config::endpoint`] at load time.
pub const ENDPOINT_ENV_VAR: &str = "NOTIFY_BRIDGE_ENDPOINT";

/// URL schemes accepted for the real-time endpoint.
const ENDPOINT_SCHEMES: &[&str] = &["ws", "wss", "http", "https"];

/// Bridge configuration, persisted as `config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the real-time backend (`wss://host`, `https://host`, ...)
    #[serde(default = "crate::defaults::endpoint")]
    pub endpoint: String,

    /// Socket.IO mount path on the backend
    #[serde(default = "crate::defaults::socket_path")]
    pub socket_path: String,

    /// Seconds to wait for the WebSocket handshake and Engine.IO open packet
    #[serde(default = "crate::defaults::connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// How notifications are rendered
    #[serde(default = "crate::defaults::presenter")]
    pub presenter: PresenterKind,

    /// Read notifications aloud
    #[serde(default = "crate::defaults::bool_true")]
    pub speech_enabled: bool,

    /// Locale passed to the speech synthesiser (detected from the environment when unset)
    #[serde(default)]
    pub speech_locale: Option<String>,

    /// Command run when the customer application list should refresh
    #[serde(default)]
    pub user_refresh_command: Option<String>,

    /// Command run when the admin application list should refresh
    #[serde(default)]
    pub admin_refresh_command: Option<String>,

    /// Log level used when neither `--log-level` nor `RUST_LOG` is set
    #[serde(default = "crate::defaults::log_level")]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: crate::defaults::endpoint(),
            socket_path: crate::defaults::socket_path(),
            connect_timeout_secs: crate::defaults::connect_timeout_secs(),
            presenter: crate::defaults::presenter(),
            speech_enabled: true,
            speech_locale: None,
            user_refresh_command: None,
            admin_refresh_command: None,
            log_level: crate::defaults::log_level(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it with defaults
    /// when it does not exist yet.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        log::info!(
            "Config file not found, creating default at {:?}",
            config_path
        );
        let mut config = Self::default();
        if let Err(e) = config.save() {
            log::error!("Failed to save default config: {}", e);
            return Err(e);
        }
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(ConfigError::from)?;
        let mut config = Self::from_yaml(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML text without touching the environment.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // An empty file deserializes to unit, not a mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(contents)?)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Replace fields from environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV_VAR) {
            let endpoint = endpoint.trim();
            if !endpoint.is_empty() {
                log::info!("Endpoint overridden by {}", ENDPOINT_ENV_VAR);
                self.endpoint = endpoint.to_string();
            }
        }
    }

    /// Check field values that serde cannot enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.endpoint).map_err(|e| {
            ConfigError::Validation(format!("endpoint '{}' is not a valid URL: {e}", self.endpoint))
        })?;
        if !ENDPOINT_SCHEMES.contains(&parsed.scheme()) {
            return Err(ConfigError::Validation(format!(
                "endpoint scheme '{}' is not supported; use one of: {}",
                parsed.scheme(),
                ENDPOINT_SCHEMES.join(", ")
            )));
        }
        if !self.socket_path.starts_with('/') || !self.socket_path.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "socket_path '{}' must start and end with '/'",
                self.socket_path
            )));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "connect_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("notify-bridge")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // ~/.config/notify-bridge on every Unix, macOS included
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("notify-bridge")
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// Path of the persisted session identity.
    pub fn session_path() -> PathBuf {
        Self::config_dir().join("session.json")
    }
}
