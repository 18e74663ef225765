//! Infrastructure layer: configuration files and command-line arguments.

/// Application configuration.
pub mod config;

pub use config::{AppConfig, CliArgs, LoadedConfig, LogLevel, StorageError, StorageManager};
