//! Configuration management
//!
//! Handles loading, validating, and persisting the base address, HTTP
//! timeouts and logging preferences shared by every executor.

use crate::error::{FrameworkError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod defaults;

pub use defaults::*;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base address every request path is appended to
    #[serde(default = "defaults::default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "defaults::default_timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "defaults::default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// `User-Agent` header sent with every request
    #[serde(default = "defaults::default_user_agent")]
    pub user_agent: String,

    /// Print request activity to stdout
    #[serde(default)]
    pub verbose: bool,

    /// Append request activity to this file
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default location
    ///
    /// Tries in order:
    /// 1. `XDG_CONFIG_HOME/webservice/config.toml`
    /// 2. `~/.config/webservice/config.toml`
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| FrameworkError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&contents).map_err(|e| FrameworkError::InvalidConfig(e.to_string()))
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| FrameworkError::DirError {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| FrameworkError::Internal(format!("Failed to encode config: {e}")))?;

        fs::write(path, contents).map_err(|e| FrameworkError::ConfigWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .and_then(|path| if path.is_empty() { None } else { Some(path) })
            .or_else(|| {
                dirs::home_dir().map(|home| home.join(".config").to_string_lossy().to_string())
            });

        config_home
            .ok_or_else(|| {
                FrameworkError::Internal(
                    "Could not determine config directory: XDG_CONFIG_HOME not set and no home directory found"
                        .to_string(),
                )
            })
            .map(|path| PathBuf::from(path).join(crate::NAME).join("config.toml"))
    }

    /// Merge another config into this one, with other taking precedence
    pub fn merge(&mut self, other: &Self) {
        if other.base_url != default_base_url() {
            self.base_url.clone_from(&other.base_url);
        }
        if other.timeout_secs != default_timeout() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.connect_timeout_secs != default_connect_timeout() {
            self.connect_timeout_secs = other.connect_timeout_secs;
        }
        if other.user_agent != default_user_agent() {
            self.user_agent.clone_from(&other.user_agent);
        }
        if other.verbose {
            self.verbose = true;
        }
        if other.log_file.is_some() {
            self.log_file.clone_from(&other.log_file);
        }
    }

    /// Validate configuration
    ///
    /// The base address must parse on its own; paths appended later are
    /// checked per request.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(FrameworkError::InvalidConfig("base_url cannot be empty".to_string()));
        }

        Url::parse(&self.base_url)
            .map_err(|e| FrameworkError::InvalidConfig(format!("base_url '{}': {e}", self.base_url)))?;

        if self.timeout_secs == 0 {
            return Err(FrameworkError::InvalidConfig(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.connect_timeout_secs == 0 {
            return Err(FrameworkError::InvalidConfig(
                "connect_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
            verbose: false,
            log_file: None,
        }
    }
}
