use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrillConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file; empty means the default under the config directory
    #[serde(default)]
    pub database_path: String,
    /// Upper bound on any single storage call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_timeout_ms() -> u64 {
    5000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl StorageConfig {
    /// Resolved database location
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        if self.database_path.trim().is_empty() {
            crate::paths::database_path()
        } else {
            PathBuf::from(self.database_path.trim())
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to ~/.config/versedrill/versedrill.log
    #[serde(default)]
    pub file_enabled: bool,
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_enabled: false,
            level: default_log_level(),
        }
    }
}

impl DrillConfig {
    /// Get the config file path (~/.config/versedrill/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from the default location, writing a template on first run
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` after creating the template, or an error if
    /// the file cannot be read, parsed or validated.
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            // Write template config
            fs::write(&config_path, CONFIG_TEMPLATE)?;

            return Err(CoreError::ConfigNotFound { path: config_path });
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate config text
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse fine but cannot work
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.storage.timeout_ms == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "storage.timeout_ms must be greater than zero".to_string(),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "logging.level must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

const CONFIG_TEMPLATE: &str = r#"# Versedrill Configuration
# ~/.config/versedrill/config.toml

[storage]
# SQLite database file. Leave empty to use ~/.config/versedrill/versedrill.db
database_path = ""
# Upper bound for a single database call, in milliseconds
timeout_ms = 5000

[logging]
# Also write logs to ~/.config/versedrill/versedrill.log
file_enabled = false
# Default log filter when RUST_LOG is not set
level = "info"
"#;
