//! Per-request rendering facts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pages on which enqueued sources are never rewritten.
pub const LOGIN_PAGES: &[&str] = &["wp-login.php", "wp-register.php"];

bitflags::bitflags! {
    /// Rendering mode of the current request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct RenderMode: u8 {
        /// Back-office screen.
        const ADMIN = 1 << 0;
        /// Draft preview.
        const PREVIEW = 1 << 1;
        /// Syndication feed.
        const FEED = 1 << 2;
        /// CDN explicitly switched off for this request.
        const NO_CDN = 1 << 3;
    }
}

/// Request scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    #[default]
    Https,
}

impl Scheme {
    /// Returns the scheme name without separator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts about the request being rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Scheme of the current request.
    pub scheme: Scheme,
    /// Rendering mode flags.
    pub mode: RenderMode,
    /// Current page identifier.
    pub page: Option<String>,
}

impl RequestContext {
    /// Creates a front-end request with the given scheme.
    #[must_use]
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            ..Self::default()
        }
    }

    /// Sets the render mode flags.
    #[must_use]
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the current page identifier.
    #[must_use]
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Returns whether an admin screen is being rendered.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.mode.contains(RenderMode::ADMIN)
    }

    /// Returns whether a post preview is being rendered.
    #[must_use]
    pub fn is_preview(&self) -> bool {
        self.mode.contains(RenderMode::PREVIEW)
    }

    /// Returns whether a feed is being rendered.
    #[must_use]
    pub fn is_feed(&self) -> bool {
        self.mode.contains(RenderMode::FEED)
    }

    /// Returns whether the request is for a login or registration page.
    #[must_use]
    pub fn is_login_page(&self) -> bool {
        self.page
            .as_deref()
            .is_some_and(|page| LOGIN_PAGES.contains(&page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_is_front_end_https() {
        let request = RequestContext::default();
        assert_eq!(request.scheme, Scheme::Https);
        assert!(!request.is_admin());
        assert!(!request.is_preview());
        assert!(!request.is_feed());
        assert!(!request.is_login_page());
    }

    #[test]
    fn test_mode_flags() {
        let request =
            RequestContext::new(Scheme::Http).with_mode(RenderMode::ADMIN | RenderMode::FEED);
        assert!(request.is_admin());
        assert!(request.is_feed());
        assert!(!request.is_preview());
    }

    #[test]
    fn test_login_page() {
        assert!(RequestContext::default().with_page("wp-login.php").is_login_page());
        assert!(!RequestContext::default().with_page("about").is_login_page());
    }
}
