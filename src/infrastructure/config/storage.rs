//! Configuration file storage.

use super::app_config::AppConfig;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No configuration directory for this platform.
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Default configuration could not be serialized.
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Configuration as read from disk.
#[derive(Debug)]
pub struct LoadedConfig {
    /// Settings in effect.
    pub config: AppConfig,
    /// Parse error of a malformed file that was replaced by defaults.
    pub fallback: Option<toml::de::Error>,
}

/// Reads `config.toml`, creating it with defaults when missing.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Create a new `StorageManager`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, StorageError> {
        let config_dir = AppConfig::default_config_dir().ok_or(StorageError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a new `StorageManager` with a specific directory (useful for testing).
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Ensures the configuration directory exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> Result<(), StorageError> {
        if !self.config_dir.exists() {
            info!("Creating configuration directory at {:?}", self.config_dir);
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Loads the application configuration, writing defaults when the file is missing.
    ///
    /// A file that does not parse is left as is and defaults are used; the
    /// parse error is returned in [`LoadedConfig::fallback`] for the caller
    /// to report.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be read or the default cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<LoadedConfig, StorageError> {
        let config_path = match path_override {
            Some(path) => path.to_path_buf(),
            None => {
                self.ensure_config_dir()?;
                self.config_dir.join(CONFIG_FILE_NAME)
            }
        };

        if !config_path.exists() {
            info!(
                "Config file not found at {:?}, creating default.",
                config_path
            );
            let default_config = AppConfig::default();
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            Self::save_to_file(&config_path, &default_config)?;
            return Ok(LoadedConfig {
                config: default_config,
                fallback: None,
            });
        }

        let content = fs::read_to_string(&config_path)?;
        Ok(match toml::from_str::<AppConfig>(&content) {
            Ok(config) => LoadedConfig {
                config,
                fallback: None,
            },
            Err(e) => LoadedConfig {
                config: AppConfig::default(),
                fallback: Some(e),
            },
        })
    }

    fn save_to_file<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), StorageError> {
        let content = toml::to_string_pretty(data)?;

        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("Invalid path"))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}
