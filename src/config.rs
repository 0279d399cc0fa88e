//! Configuration management for the drive storage daemon
//!
//! All values are startup configuration: they are loaded once, handed to
//! the components that need them, and require a restart to change.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_temp_dir_name() -> String {
    "temp".to_string()
}

fn default_archive_retention_secs() -> u64 {
    600
}

/// Storage daemon configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Absolute path of the storage root directory (restart required)
    pub root_dir: String,

    /// Name of the temp subdirectory holding archive bundles,
    /// a single path component directly under the root
    #[serde(default = "default_temp_dir_name")]
    pub temp_dir_name: String,

    /// Interval between archive retention sweeps, in seconds
    #[serde(default = "default_archive_retention_secs")]
    pub archive_retention_secs: u64,
}

impl StorageConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the named file with environment overrides
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path))
            .add_source(Environment::with_prefix("RAX_DRIVE"))
            .build()?;

        let config: StorageConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_dir.is_empty() {
            return Err(ConfigError::Message("root_dir cannot be empty".into()));
        }

        if !Path::new(&self.root_dir).is_absolute() {
            return Err(ConfigError::Message(
                "root_dir must be an absolute path".into(),
            ));
        }

        if self.temp_dir_name.is_empty() {
            return Err(ConfigError::Message("temp_dir_name cannot be empty".into()));
        }

        if self.temp_dir_name.contains(['/', '\\'])
            || self.temp_dir_name == "."
            || self.temp_dir_name == ".."
        {
            return Err(ConfigError::Message(
                "temp_dir_name must be a single path component".into(),
            ));
        }

        if self.archive_retention_secs == 0 {
            return Err(ConfigError::Message(
                "archive_retention_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get the storage root as a PathBuf
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root_dir)
    }

    /// Get the retention sweep interval as a Duration
    pub fn retention_interval(&self) -> Duration {
        Duration::from_secs(self.archive_retention_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> StorageConfig {
        StorageConfig {
            root_dir: "/var/lib/rax-drive/storage".to_string(),
            temp_dir_name: "temp".to_string(),
            archive_retention_secs: 600,
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn relative_root_is_rejected() {
        let mut config = valid_config();
        config.root_dir = "storage".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_root_is_rejected() {
        let mut config = valid_config();
        config.root_dir = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn temp_dir_name_with_separator_is_rejected() {
        let mut config = valid_config();
        config.temp_dir_name = "nested/temp".to_string();
        assert!(config.validate().is_err());

        config.temp_dir_name = "..".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_retention_interval_is_rejected() {
        let mut config = valid_config();
        config.archive_retention_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn retention_interval_converts_to_duration() {
        assert_eq!(
            valid_config().retention_interval(),
            Duration::from_secs(600)
        );
    }
}
