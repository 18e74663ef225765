//! CDN hostname values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A configured CDN CNAME.
///
/// Accepts `cdn.example.com`, `//cdn.example.com`, `https://cdn.example.com/`
/// or a host with a path prefix such as `cdn.example.com/static`. The stored
/// form has no scheme and no trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Hostname(String);

impl Hostname {
    /// Normalises a raw CNAME value.
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        let without_scheme = raw
            .split_once("://")
            .map_or(raw, |(_, rest)| rest)
            .trim_start_matches('/');
        Self(without_scheme.trim_end_matches('/').to_string())
    }

    /// Returns the normalised value including any path prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the host part, without path prefix or port.
    #[must_use]
    pub fn host(&self) -> &str {
        let authority = self.0.split('/').next().unwrap_or_default();
        if authority.starts_with('[') {
            return authority
                .find(']')
                .map_or(authority, |end| &authority[..=end]);
        }
        authority.split(':').next().unwrap_or_default()
    }

    /// Returns whether the value is empty after normalisation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns whether `host` names this CDN (case-insensitive).
    #[must_use]
    pub fn matches_host(&self, host: &str) -> bool {
        self.host().eq_ignore_ascii_case(host)
    }
}

impl From<String> for Hostname {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Hostname {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Hostname> for String {
    fn from(host: Hostname) -> Self {
        host.0
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("cdn.example.com", "cdn.example.com")]
    #[test_case("https://cdn.example.com/", "cdn.example.com")]
    #[test_case("//cdn.example.com", "cdn.example.com")]
    #[test_case("http://cdn.example.com/static/", "cdn.example.com/static")]
    #[test_case("  cdn.example.com  ", "cdn.example.com")]
    fn test_normalise(raw: &str, expected: &str) {
        assert_eq!(Hostname::new(raw).as_str(), expected);
    }

    #[test]
    fn test_host_strips_path_and_port() {
        let host = Hostname::new("cdn.example.com:8080/static");
        assert_eq!(host.host(), "cdn.example.com");
        assert!(host.matches_host("CDN.example.com"));
    }

    #[test]
    fn test_host_keeps_ipv6_literal() {
        let host = Hostname::new("http://[::1]:8080/static");
        assert_eq!(host.host(), "[::1]");
        assert!(host.matches_host("[::1]"));
    }

    #[test]
    fn test_empty() {
        assert!(Hostname::new("https://").is_empty());
        assert!(!Hostname::new("a.b").is_empty());
    }
}
