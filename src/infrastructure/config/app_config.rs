//! Application configuration.

use crate::domain::{CdnSettings, SiteSettings};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_NAME: &str = "cdnrewrite";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and merged with CLI flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path. Logs go to stderr when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Site identity.
    #[serde(default)]
    pub site: SiteSettings,

    /// CDN settings.
    #[serde(default)]
    pub cdn: CdnSettings,
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(home_url) = &args.home_url {
            self.site.home_url.clone_from(home_url);
        }
        if args.disable_cdn {
            self.cdn.enabled = false;
        }
    }

    /// Returns the platform configuration directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Zone;
    use clap::Parser;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
            log_level = "debug"

            [site]
            home_url = "https://example.com/"
            extra_hosts = ["fr.example.com"]

            [cdn]
            on_ssl = false
            custom_filetypes = ["pdf"]
            excluded_pages = ["checkout"]

            [[cdn.cnames]]
            host = "cdn1.example.com"
            zone = "images"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.site.home_url, "https://example.com/");
        assert_eq!(config.site.extra_hosts, vec!["fr.example.com"]);
        assert!(config.cdn.enabled);
        assert!(!config.cdn.on_ssl);
        assert_eq!(config.cdn.custom_filetypes, vec!["pdf"]);
        assert_eq!(config.cdn.cnames[0].zone, Zone::Images);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.cdn.enabled); // default_true
        assert!(config.cdn.cnames.is_empty());
        assert_eq!(config.site.home_url, "http://localhost/");
    }

    #[test]
    fn test_merge_with_args() {
        let args = CliArgs::parse_from([
            "cdnrewrite",
            "--context",
            "buffer",
            "--home-url",
            "https://blog.example.org/",
            "--log-level",
            "warn",
            "--disable-cdn",
        ]);
        let mut config = AppConfig::default();
        config.merge_with_args(&args);

        assert_eq!(config.site.home_url, "https://blog.example.org/");
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(!config.cdn.enabled);
    }
}
