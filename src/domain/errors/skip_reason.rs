//! Reasons a URL occurrence is left unchanged.

use thiserror::Error;

/// Why a URL was not rewritten.
///
/// These never reach callers of the pipeline; they are logged and the
/// original text is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum SkipReason {
    #[error("data URI")]
    DataUri,

    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    #[error("unparseable URL: {message}")]
    Unparseable { message: String },

    #[error("external host: {host}")]
    ExternalHost { host: String },

    #[error("already served by CDN host {host}")]
    AlreadyOnCdn { host: String },

    #[error("path matches a rejected pattern: {path}")]
    Rejected { path: String },

    #[error("no CDN hostname available")]
    NoHostname,
}

impl SkipReason {
    /// Creates unparseable error.
    #[must_use]
    pub fn unparseable(message: impl ToString) -> Self {
        Self::Unparseable {
            message: message.to_string(),
        }
    }

    /// Creates external host error.
    #[must_use]
    pub fn external(host: impl Into<String>) -> Self {
        Self::ExternalHost { host: host.into() }
    }

    /// Returns whether the URL is well-formed but deliberately excluded.
    #[must_use]
    pub const fn is_policy(&self) -> bool {
        matches!(
            self,
            Self::ExternalHost { .. } | Self::AlreadyOnCdn { .. } | Self::Rejected { .. }
        )
    }
}
