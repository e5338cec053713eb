//! Configuration management for the text-pattern CLI.
//!
//! The configuration is stored in TOML format and can be loaded from a
//! specified file path or from the default location in the current directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use reserved_values::StoreConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "text-pattern.toml";

/// Environment variable holding the log filter, e.g. `text_pattern=debug`
pub const LOG_ENV_VAR: &str = "TEXT_PATTERN_LOG";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the text-pattern CLI.
///
/// # Example TOML Configuration
///
/// ```toml
/// log_filter = "info"
///
/// [reservation]
/// persistence_path = "reserved-values.json"
/// random_max_attempts = 100
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log filter used when `TEXT_PATTERN_LOG` is not set.
    pub log_filter: String,

    /// Settings for the reserved value store.
    pub reservation: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "warn".to_string(),
            reservation: StoreConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read,
    /// or does not contain a valid configuration.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        Ok(config)
    }

    /// Loads the explicitly requested file, or the default file if present.
    ///
    /// An explicitly requested file must exist. A missing default file
    /// yields the default configuration.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    debug!("No configuration file found; using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Saves the configuration to a TOML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Config(format!("Failed to create configuration directory: {}", e))
                })?;
            }
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }
}
