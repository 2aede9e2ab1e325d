//! User configuration settings
//!
//! Layered configuration: defaults → config file → environment variables → CLI args

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};
use crate::layout::{ResizePolicy, DEFAULT_SIDEBAR_WIDTH};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the assistant backend (workspace + chat services)
    pub server_url: String,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// UI refresh rate in FPS
    pub ui_refresh_fps: u32,

    /// Initial sidebar width in layout units
    pub sidebar_width: u32,

    /// Layout units per terminal column
    pub cell_width: u32,

    /// What a drag outside the allowed width range does
    pub resize_policy: ResizePolicy,

    /// Enable debug logging
    pub debug: bool,

    /// Log file path used in TUI mode
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 30_000,
            ui_refresh_fps: 30,
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
            cell_width: 8,
            resize_policy: ResizePolicy::default(),
            debug: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration using an explicit config file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config: Config = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Config::default()))
            // Layer config file if it exists
            .merge(Toml::file(config_path))
            // Layer environment variables (ACA_SERVER_URL, etc.)
            .merge(Env::prefixed("ACA_"))
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the client cannot run with
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.server_url).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "server_url".to_string(),
                reason: format!("'{}' is not a valid URL", self.server_url),
            }
            .into());
        }

        if self.cell_width == 0 {
            return Err(ConfigError::InvalidValue {
                key: "cell_width".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        if self.ui_refresh_fps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ui_refresh_fps".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Interval between render ticks
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.ui_refresh_fps.max(1)))
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Log file for TUI mode: configured path or one in the temp dir
    pub fn log_file_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("ai-code-assistant.log"))
    }

    /// Save current configuration to the default file
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save current configuration to a specific file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|_e| {
                Error::Config(ConfigError::DirectoryCreationFailed(parent.to_path_buf()))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        std::fs::write(config_path, toml).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "ai-code-assistant", "ai-code-assistant").ok_or_else(|| {
            Error::Config(ConfigError::LoadFailed(
                "Could not determine home directory".to_string(),
            ))
        })
    }
}
