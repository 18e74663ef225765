//! CDN zone tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset class used to route a URL to a set of CDN hostnames.
///
/// Zones are not mutually exclusive: a single request checks an ordered list
/// of them, e.g. `all` then `images`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Zone {
    /// Every asset.
    All,
    /// Images and attachments.
    Images,
    /// Stylesheets only.
    Css,
    /// Scripts only.
    Js,
    /// Stylesheets and scripts.
    CssAndJs,
    /// A raw file extension such as `woff2`.
    Extension(String),
}

impl Zone {
    /// Builds an extension zone, normalising case and a leading dot.
    #[must_use]
    pub fn extension(ext: &str) -> Self {
        Self::from(ext.trim_start_matches('.'))
    }

    /// Returns the tag used in configuration files.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Images => "images",
            Self::Css => "css",
            Self::Js => "js",
            Self::CssAndJs => "css_and_js",
            Self::Extension(ext) => ext,
        }
    }
}

impl From<&str> for Zone {
    fn from(value: &str) -> Self {
        let tag = value.trim().to_ascii_lowercase();
        match tag.as_str() {
            "all" => Self::All,
            "images" => Self::Images,
            "css" => Self::Css,
            "js" => Self::Js,
            "css_and_js" => Self::CssAndJs,
            _ => Self::Extension(tag),
        }
    }
}

impl From<String> for Zone {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Zone> for String {
    fn from(zone: Zone) -> Self {
        zone.as_str().to_string()
    }
}

impl FromStr for Zone {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("all", Zone::All)]
    #[test_case("Images", Zone::Images)]
    #[test_case(" css ", Zone::Css)]
    #[test_case("JS", Zone::Js)]
    #[test_case("css_and_js", Zone::CssAndJs)]
    #[test_case("woff2", Zone::Extension("woff2".to_string()))]
    fn test_parse_zone(input: &str, expected: Zone) {
        assert_eq!(Zone::from(input), expected);
    }

    #[test]
    fn test_extension_strips_dot() {
        assert_eq!(Zone::extension(".SVG"), Zone::Extension("svg".to_string()));
    }

    #[test]
    fn test_known_extension_collapses_to_named_zone() {
        assert_eq!(Zone::extension("css"), Zone::Css);
        assert_eq!(Zone::extension("js"), Zone::Js);
    }

    #[test]
    fn test_display_round_trips_tag() {
        assert_eq!(Zone::CssAndJs.to_string(), "css_and_js");
        assert_eq!(Zone::extension("png").to_string(), "png");
    }
}
