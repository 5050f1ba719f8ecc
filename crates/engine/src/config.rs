//! Settings engine configuration
//!
//! Usually left at its defaults; can be loaded from a TOML file so deployments
//! can turn on encryption or change limits without a rebuild.
//!
//! # Example
//!
//! ```toml
//! encrypted = true
//! max_file_size = 5242880
//! sync_attempts = 3
//! settings_extension = "json"
//! backup_extension = "backup"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strata_settings_core::{BACKUP_EXTENSION, MAX_FILE_SIZE, SETTINGS_EXTENSION, SYNC_ATTEMPTS};
use thiserror::Error;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Pass file contents through the injected codec
    #[serde(default)]
    pub encrypted: bool,
    /// Files larger than this are treated as corrupted (default: 5 MiB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Bound on read/restore attempts per sync (default: 3)
    #[serde(default = "default_sync_attempts")]
    pub sync_attempts: usize,
    /// Extension forced on the settings file (default: "json")
    #[serde(default = "default_settings_extension")]
    pub settings_extension: String,
    /// Extension of the backup sibling (default: "backup")
    #[serde(default = "default_backup_extension")]
    pub backup_extension: String,
}

fn default_max_file_size() -> u64 {
    MAX_FILE_SIZE
}

fn default_sync_attempts() -> usize {
    SYNC_ATTEMPTS
}

fn default_settings_extension() -> String {
    SETTINGS_EXTENSION.to_string()
}

fn default_backup_extension() -> String {
    BACKUP_EXTENSION.to_string()
}

impl Default for SettingsConfig {
    fn default() -> Self {
        SettingsConfig {
            encrypted: false,
            max_file_size: default_max_file_size(),
            sync_attempts: default_sync_attempts(),
            settings_extension: default_settings_extension(),
            backup_extension: default_backup_extension(),
        }
    }
}

impl SettingsConfig {
    /// Create config with encryption enabled
    pub fn encrypted() -> Self {
        SettingsConfig {
            encrypted: true,
            ..Default::default()
        }
    }

    /// Set encryption mode
    pub fn with_encryption(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    /// Set the size ceiling
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Set the sync attempt bound
    pub fn with_sync_attempts(mut self, sync_attempts: usize) -> Self {
        self.sync_attempts = sync_attempts;
        self
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Strata settings configuration
#
# Pass the settings file through the configured codec (default: false)
encrypted = false

# Files larger than this many bytes are treated as corrupted (default: 5 MiB)
max_file_size = 5242880

# Read/restore attempts per sync before giving up (default: 3)
sync_attempts = 3

# settings_extension = "json"
# backup_extension = "backup"
"#
    }

    /// Parse and validate config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SettingsConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync_attempts == 0 {
            return Err(ConfigError::Invalid(
                "sync_attempts must be at least 1".to_string(),
            ));
        }

        if self.max_file_size == 0 {
            return Err(ConfigError::Invalid(
                "max_file_size must be positive".to_string(),
            ));
        }

        for (name, ext) in [
            ("settings_extension", &self.settings_extension),
            ("backup_extension", &self.backup_extension),
        ] {
            if ext.is_empty() || ext.contains('.') || ext.contains(std::path::is_separator) {
                return Err(ConfigError::Invalid(format!(
                    "{} '{}' must be a plain, non-empty extension",
                    name, ext
                )));
            }
        }

        if self.settings_extension == self.backup_extension {
            return Err(ConfigError::Invalid(
                "settings_extension and backup_extension must differ".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Config values are out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}
