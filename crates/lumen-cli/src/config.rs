//! CLI configuration file
//!
//! Loaded from `$XDG_CONFIG_HOME/lumen/config.toml` (falling back to the
//! platform config directory) or from an explicit `--config` path.
//!
//! ```toml
//! log_filter = "lumen=debug"
//!
//! [device]
//! dire_warnings = true
//! passphrase = "required"
//! max_history = 20
//! qr_density = "high"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use lumen_core::Settings;
use serde::{Deserialize, Serialize};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "lumen";

/// Default tracing directive
pub const DEFAULT_LOG_FILTER: &str = "lumen=info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// `tracing` filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Device settings
    #[serde(default)]
    pub device: Settings,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            device: Settings::default(),
        }
    }
}

impl CliConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            if !xdg_config.is_empty() {
                return Some(PathBuf::from(xdg_config).join(CONFIG_DIR_NAME));
            }
        }
        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Load the configuration
    ///
    /// An explicit path must exist and parse. Without one, a missing default
    /// file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}
