//! Asset reference scanning over HTML and CSS text.
//!
//! This is a tokenizer for three tag shapes (`<img src>`, CSS `url()` and
//! `<a href>` to downloadable files), not an HTML parser. Patterns run on the
//! `regex` crate's finite automata, so every scan is a single linear pass
//! whatever the input looks like. Markup that does not fit a pattern is
//! simply not matched and stays untouched.

use crate::application::services::url_rewriter::is_data_uri;
use crate::domain::{AssetKind, AssetReference, ConfigError, Hostname};
use regex::{CaptureMatches, Regex};
use std::sync::LazyLock;
use url::Url;

static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\s(?:[^>]*?\s)?src\s*=\s*['"\\]*([^'"\s\\>]+)['"\\]*[^>]*>"#).unwrap()
});

static CSS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:['"]|&quot;)?\s*([^)'"\s]+?)\s*(?:['"]|&quot;)?\s*\)"#).unwrap()
});

/// Scans documents for rewritable asset references.
#[derive(Debug, Clone)]
pub struct HtmlAssetScanner {
    anchor_re: Option<Regex>,
    cdn_hosts: Vec<Hostname>,
}

impl HtmlAssetScanner {
    /// Builds a scanner for the given downloadable file types.
    ///
    /// References already pointing at one of `cdn_hosts` are never yielded.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a file type is not a plain extension.
    pub fn new<I>(filetypes: &[String], cdn_hosts: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = Hostname>,
    {
        Ok(Self {
            anchor_re: anchor_pattern(filetypes)?,
            cdn_hosts: cdn_hosts.into_iter().collect(),
        })
    }

    /// Lazily yields `kind` references in `html`, left to right.
    #[must_use]
    pub fn scan<'s, 'h>(&'s self, kind: AssetKind, html: &'h str) -> AssetScan<'s, 'h> {
        let re: Option<&'s Regex> = match kind {
            AssetKind::Image => Some(&*IMG_SRC_RE),
            AssetKind::InlineStyleUrl => Some(&*CSS_URL_RE),
            AssetKind::AnchorHref => self.anchor_re.as_ref(),
        };

        AssetScan {
            kind,
            captures: re.map(|re| re.captures_iter(html)),
            scanner: self,
        }
    }

    fn is_eligible(&self, url: &str) -> bool {
        if url.is_empty() || url.starts_with('#') || is_data_uri(url) {
            return false;
        }
        host_of(url).is_none_or(|host| !self.cdn_hosts.iter().any(|cdn| cdn.matches_host(&host)))
    }
}

/// Single-pass iterator over the references of one kind.
pub struct AssetScan<'s, 'h> {
    kind: AssetKind,
    captures: Option<CaptureMatches<'s, 'h>>,
    scanner: &'s HtmlAssetScanner,
}

impl<'h> Iterator for AssetScan<'_, 'h> {
    type Item = AssetReference<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        let captures = self.captures.as_mut()?;
        loop {
            let caps = captures.next()?;
            let (Some(whole), Some(url)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if !self.scanner.is_eligible(url.as_str()) {
                continue;
            }
            return Some(AssetReference {
                kind: self.kind,
                raw: whole.as_str(),
                span: whole.range(),
                url_span: url.range(),
                url: url.as_str(),
            });
        }
    }
}

fn anchor_pattern(filetypes: &[String]) -> Result<Option<Regex>, ConfigError> {
    let mut alternatives = Vec::with_capacity(filetypes.len());
    for filetype in filetypes {
        let filetype = filetype.trim().trim_start_matches('.');
        if filetype.is_empty() || !filetype.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidFiletype {
                filetype: filetype.to_string(),
            });
        }
        alternatives.push(regex::escape(filetype));
    }

    if alternatives.is_empty() {
        return Ok(None);
    }

    let pattern = format!(
        r#"(?i)<a\s(?:[^>]*?\s)?href\s*=\s*['"]?([^'"\s>]+\.(?:{})(?:[?#][^'"\s>]*)?)(?:['"\s][^>]*)?>"#,
        alternatives.join("|")
    );
    Regex::new(&pattern)
        .map(Some)
        .map_err(|source| ConfigError::Pattern { source })
}

/// Extracts the host of an absolute or protocol-relative URL.
fn host_of(url: &str) -> Option<String> {
    let parsed = if url.starts_with("//") {
        Url::parse(&format!("http:{url}"))
    } else {
        Url::parse(url)
    };
    parsed.ok()?.host_str().map(str::to_owned)
}
