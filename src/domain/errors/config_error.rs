//! Configuration validation error types.

use thiserror::Error;

/// Errors raised while compiling settings into a pipeline.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("invalid home URL {url:?}: {source}")]
    InvalidHomeUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("home URL {url:?} has no host")]
    HomeUrlWithoutHost { url: String },

    #[error("invalid rejected file pattern: {source}")]
    InvalidRejectPattern {
        #[source]
        source: regex::Error,
    },

    #[error("invalid custom file type {filetype:?}")]
    InvalidFiletype { filetype: String },

    #[error("failed to build asset pattern: {source}")]
    Pattern {
        #[source]
        source: regex::Error,
    },
}
