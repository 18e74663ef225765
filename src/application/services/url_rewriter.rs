//! Host substitution for single asset URLs.

use crate::domain::{CdnSettings, ConfigError, Hostname, Scheme, SiteSettings, SkipReason};
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::{debug, trace};
use url::Url;

/// Rewrites site-owned asset URLs onto CDN hostnames.
///
/// Built once per configuration. Every rewrite is a pure function of the
/// input URL, the candidate hostnames and the request scheme.
#[derive(Debug, Clone)]
pub struct UrlRewriter {
    home: Url,
    site_hosts: Vec<String>,
    cdn_hosts: Vec<Hostname>,
    rejected: Option<Regex>,
}

impl UrlRewriter {
    /// Compiles site and CDN settings into a rewriter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the home URL is invalid or hostless, or a
    /// rejected file pattern does not compile.
    pub fn new(site: &SiteSettings, cdn: &CdnSettings) -> Result<Self, ConfigError> {
        let home = Url::parse(site.home_url.trim()).map_err(|source| ConfigError::InvalidHomeUrl {
            url: site.home_url.clone(),
            source,
        })?;

        let home_host = home
            .host_str()
            .ok_or_else(|| ConfigError::HomeUrlWithoutHost {
                url: site.home_url.clone(),
            })?
            .to_ascii_lowercase();

        let mut site_hosts = vec![home_host];
        for extra in &site.extra_hosts {
            let host = Hostname::new(extra).host().to_ascii_lowercase();
            if !host.is_empty() && !site_hosts.contains(&host) {
                site_hosts.push(host);
            }
        }

        let mut cdn_hosts: Vec<Hostname> = Vec::new();
        for entry in &cdn.cnames {
            if !entry.host.is_empty() && !cdn_hosts.contains(&entry.host) {
                cdn_hosts.push(entry.host.clone());
            }
        }

        Ok(Self {
            home,
            site_hosts,
            cdn_hosts,
            rejected: compile_rejected(&cdn.reject_files)?,
        })
    }

    /// Returns whether any rejected file pattern is configured.
    #[must_use]
    pub fn has_rejected_files(&self) -> bool {
        self.rejected.is_some()
    }

    /// Returns whether `host` is one of the configured CDN hostnames.
    #[must_use]
    pub fn is_cdn_host(&self, host: &str) -> bool {
        self.cdn_hosts.iter().any(|cdn| cdn.matches_host(host))
    }

    /// Returns whether `host` serves this site's own assets.
    #[must_use]
    pub fn is_site_host(&self, host: &str) -> bool {
        self.site_hosts
            .iter()
            .any(|site| site.eq_ignore_ascii_case(host))
    }

    /// Rewrites `url` onto one of `hosts`, or returns it unchanged.
    #[must_use]
    pub fn rewrite(&self, url: &str, hosts: &[Hostname], scheme: Scheme) -> String {
        match self.try_rewrite(url, hosts, scheme) {
            Ok(rewritten) => rewritten,
            Err(reason) => {
                if reason.is_policy() {
                    trace!(url = %url, reason = %reason, "Leaving URL unchanged");
                } else {
                    debug!(url = %url, reason = %reason, "Leaving URL unchanged");
                }
                url.to_string()
            }
        }
    }

    /// Rewrites `url` onto one of `hosts`.
    ///
    /// # Errors
    ///
    /// Returns the `SkipReason` explaining why the URL is not eligible.
    pub fn try_rewrite(
        &self,
        url: &str,
        hosts: &[Hostname],
        scheme: Scheme,
    ) -> Result<String, SkipReason> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(SkipReason::Empty);
        }
        if is_data_uri(trimmed) {
            return Err(SkipReason::DataUri);
        }

        let (parsed, had_scheme) = self.parse(trimmed, scheme)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SkipReason::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
            });
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| SkipReason::unparseable("missing host"))?;
        if self.is_cdn_host(host) {
            return Err(SkipReason::AlreadyOnCdn {
                host: host.to_string(),
            });
        }
        if !self.is_site_host(host) {
            return Err(SkipReason::external(host));
        }

        let (locator, suffix) = split_suffix(trimmed);
        let path = raw_path(locator).unwrap_or_else(|| parsed.path());
        if let Some(rejected) = &self.rejected
            && rejected.is_match(path)
        {
            return Err(SkipReason::Rejected {
                path: path.to_string(),
            });
        }

        let cdn = select_host(path, hosts).ok_or(SkipReason::NoHostname)?;
        let scheme = if had_scheme {
            parsed.scheme()
        } else {
            scheme.as_str()
        };

        let rewritten = format!(
            "{scheme}://{}/{}{suffix}",
            cdn.as_str(),
            path.trim_start_matches('/')
        );

        Ok(rewritten)
    }

    /// Resolves `url` to an absolute URL against the site base.
    ///
    /// # Errors
    ///
    /// Returns `SkipReason::Unparseable` if the URL cannot be parsed.
    pub fn resolve(&self, url: &str, scheme: Scheme) -> Result<Url, SkipReason> {
        self.parse(url.trim(), scheme).map(|(parsed, _)| parsed)
    }

    /// Parses `url`, resolving protocol-relative and relative forms.
    /// The flag tells whether the input carried its own scheme.
    fn parse(&self, url: &str, scheme: Scheme) -> Result<(Url, bool), SkipReason> {
        if url.starts_with("//") {
            return Url::parse(&format!("{scheme}:{url}"))
                .map(|parsed| (parsed, false))
                .map_err(SkipReason::unparseable);
        }

        match Url::parse(url) {
            Ok(parsed) => Ok((parsed, true)),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .home
                .join(url)
                .map(|parsed| (parsed, false))
                .map_err(SkipReason::unparseable),
            Err(e) => Err(SkipReason::unparseable(e)),
        }
    }
}

/// Picks a hostname for `path`.
///
/// With several hostnames the choice is the first eight bytes of the
/// SHA-256 of the path, big-endian, modulo the host count. The same path
/// always lands on the same host for a given host list.
#[must_use]
pub fn select_host<'a>(path: &str, hosts: &'a [Hostname]) -> Option<&'a Hostname> {
    match hosts.len() {
        0 => None,
        1 => hosts.first(),
        len => {
            let digest = Sha256::digest(path.as_bytes());
            let mut prefix = [0u8; 8];
            prefix.copy_from_slice(&digest[..8]);
            let index = u64::from_be_bytes(prefix) % len as u64;
            hosts.get(usize::try_from(index).unwrap_or_default())
        }
    }
}

/// Returns whether `url` is a `data:` URI.
#[must_use]
pub fn is_data_uri(url: &str) -> bool {
    url.trim_start()
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("data:"))
}

/// Returns the file extension of the URL path, without query or fragment.
#[must_use]
pub fn file_extension(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let file = path.rsplit('/').next().unwrap_or_default();
    file.rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// Splits `url` before its query string or fragment.
fn split_suffix(url: &str) -> (&str, &str) {
    url.split_at(url.find(['?', '#']).unwrap_or(url.len()))
}

/// Returns the path of `locator` as written.
///
/// `None` for document-relative forms, whose path only exists once joined
/// with the site base.
fn raw_path(locator: &str) -> Option<&str> {
    if let Some(rest) = locator.strip_prefix("//") {
        return Some(after_authority(rest));
    }
    if locator.starts_with('/') {
        return Some(locator);
    }

    let (scheme, rest) = locator.split_once(':')?;
    let is_scheme = scheme
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    is_scheme.then(|| after_authority(rest.trim_start_matches(['/', '\\'])))
}

fn after_authority(rest: &str) -> &str {
    rest.find(['/', '\\']).map_or("", |start| &rest[start..])
}

fn compile_rejected(patterns: &[String]) -> Result<Option<Regex>, ConfigError> {
    let fragments: Vec<String> = patterns
        .iter()
        .map(|pattern| pattern.trim())
        .filter(|pattern| !pattern.is_empty())
        .map(|pattern| format!("(?:{pattern})"))
        .collect();

    if fragments.is_empty() {
        return Ok(None);
    }

    Regex::new(&fragments.join("|"))
        .map(Some)
        .map_err(|source| ConfigError::InvalidRejectPattern { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CnameEntry;
    use test_case::test_case;

    fn rewriter_with(cdn: CdnSettings) -> UrlRewriter {
        let site = SiteSettings {
            home_url: "https://example.com/".to_string(),
            extra_hosts: vec!["https://fr.example.com/".to_string()],
        };
        UrlRewriter::new(&site, &cdn).expect("valid settings")
    }

    fn rewriter() -> UrlRewriter {
        rewriter_with(CdnSettings {
            cnames: vec![CnameEntry::new("cdn1.example.com", "all")],
            ..CdnSettings::default()
        })
    }

    fn hosts() -> Vec<Hostname> {
        vec![Hostname::new("cdn1.example.com")]
    }

    #[test_case("/wp-content/a.png", "https://cdn1.example.com/wp-content/a.png"; "root relative")]
    #[test_case("wp-content/a.png", "https://cdn1.example.com/wp-content/a.png"; "relative")]
    #[test_case("//example.com/a.css", "https://cdn1.example.com/a.css"; "protocol relative")]
    #[test_case("http://example.com/a.js?ver=1.2#top", "http://cdn1.example.com/a.js?ver=1.2#top"; "keeps scheme query fragment")]
    #[test_case("https://EXAMPLE.com:8443/a.png", "https://cdn1.example.com/a.png"; "drops origin port")]
    #[test_case("https://fr.example.com/a.png", "https://cdn1.example.com/a.png"; "extra site host")]
    fn test_rewrite(input: &str, expected: &str) {
        assert_eq!(rewriter().rewrite(input, &hosts(), Scheme::Https), expected);
    }

    #[test_case("https://other.org/a.png"; "external")]
    #[test_case("data:image/png;base64,AAAA"; "data uri")]
    #[test_case(" DATA:image/gif;base64,R0"; "data uri uppercase")]
    #[test_case("mailto:someone@example.com"; "mailto")]
    #[test_case("https://cdn1.example.com/a.png"; "already on cdn")]
    #[test_case(""; "empty")]
    fn test_unchanged(input: &str) {
        assert_eq!(rewriter().rewrite(input, &hosts(), Scheme::Https), input);
    }

    #[test_case("/a.png?q=\u{e9}&x=a b", "https://cdn1.example.com/a.png?q=\u{e9}&x=a b"; "query kept verbatim")]
    #[test_case("/a.png#frag ment", "https://cdn1.example.com/a.png#frag ment"; "fragment kept verbatim")]
    #[test_case(r##"/a.png?q="x"#y"##, r##"https://cdn1.example.com/a.png?q="x"#y"##; "quotes in query")]
    #[test_case("/wp-content/uploads/Caf\u{e9}.jpg", "https://cdn1.example.com/wp-content/uploads/Caf\u{e9}.jpg"; "non ascii path")]
    #[test_case("https://example.com/\u{fc}/a b.png?x=\u{e9}", "https://cdn1.example.com/\u{fc}/a b.png?x=\u{e9}"; "absolute raw path")]
    #[test_case("//example.com/a%20b.png", "https://cdn1.example.com/a%20b.png"; "existing escapes untouched")]
    fn test_rewrite_keeps_raw_text(input: &str, expected: &str) {
        assert_eq!(rewriter().rewrite(input, &hosts(), Scheme::Https), expected);
    }

    #[test_case("/a.png?x=1#top", ("/a.png", "?x=1#top"))]
    #[test_case("/a.png#top?x", ("/a.png", "#top?x"))]
    #[test_case("/a.png", ("/a.png", ""))]
    fn test_split_suffix(url: &str, expected: (&str, &str)) {
        assert_eq!(split_suffix(url), expected);
    }

    #[test_case("https://example.com:8443/a/b.png", Some("/a/b.png"))]
    #[test_case("//example.com", Some(""))]
    #[test_case("/a.png", Some("/a.png"))]
    #[test_case("img/a.png", None)]
    #[test_case("img/x:y.png", None)]
    fn test_raw_path(locator: &str, expected: Option<&str>) {
        assert_eq!(raw_path(locator), expected);
    }

    #[test]
    fn test_relative_url_uses_request_scheme() {
        assert_eq!(
            rewriter().rewrite("/a.png", &hosts(), Scheme::Http),
            "http://cdn1.example.com/a.png"
        );
    }

    #[test]
    fn test_relative_path_resolved_against_base() {
        let site = SiteSettings {
            home_url: "https://example.com/blog/".to_string(),
            extra_hosts: Vec::new(),
        };
        let rewriter = UrlRewriter::new(&site, &CdnSettings::default()).unwrap();

        assert_eq!(
            rewriter.rewrite("img/../a.png", &hosts(), Scheme::Https),
            "https://cdn1.example.com/blog/a.png"
        );
    }

    #[test]
    fn test_hostname_with_path_prefix() {
        let hosts = vec![Hostname::new("https://cdn.example.net/static/")];
        assert_eq!(
            rewriter().rewrite("/a.png", &hosts, Scheme::Https),
            "https://cdn.example.net/static/a.png"
        );
    }

    #[test]
    fn test_rejected_path() {
        let rewriter = rewriter_with(CdnSettings {
            reject_files: vec![r"/wp-content/themes/.*\.css".to_string(), String::new()],
            ..CdnSettings::default()
        });

        assert!(rewriter.has_rejected_files());
        assert_eq!(
            rewriter.try_rewrite("/wp-content/themes/t/style.css", &hosts(), Scheme::Https),
            Err(SkipReason::Rejected {
                path: "/wp-content/themes/t/style.css".to_string()
            })
        );
        assert!(
            rewriter
                .try_rewrite("/wp-content/uploads/a.css", &hosts(), Scheme::Https)
                .is_ok()
        );
    }

    #[test]
    fn test_invalid_rejected_pattern() {
        let cdn = CdnSettings {
            reject_files: vec!["(".to_string()],
            ..CdnSettings::default()
        };
        let result = UrlRewriter::new(&SiteSettings::default(), &cdn);
        assert!(matches!(result, Err(ConfigError::InvalidRejectPattern { .. })));
    }

    #[test]
    fn test_invalid_home_url() {
        let site = SiteSettings {
            home_url: "not a url".to_string(),
            extra_hosts: Vec::new(),
        };
        let result = UrlRewriter::new(&site, &CdnSettings::default());
        assert!(matches!(result, Err(ConfigError::InvalidHomeUrl { .. })));
    }

    #[test]
    fn test_no_hosts() {
        assert_eq!(
            rewriter().try_rewrite("/a.png", &[], Scheme::Https),
            Err(SkipReason::NoHostname)
        );
    }

    #[test]
    fn test_select_host_is_stable() {
        let hosts = vec![
            Hostname::new("a.cdn.net"),
            Hostname::new("b.cdn.net"),
            Hostname::new("c.cdn.net"),
        ];
        let first = select_host("/wp-content/a.png", &hosts);
        for _ in 0..10 {
            assert_eq!(select_host("/wp-content/a.png", &hosts), first);
        }
        assert!(first.is_some_and(|host| hosts.contains(host)));
    }

    #[test]
    fn test_select_host_spreads_paths() {
        let hosts = vec![Hostname::new("a.cdn.net"), Hostname::new("b.cdn.net")];
        let chosen: std::collections::HashSet<&Hostname> = (0..64)
            .filter_map(|i| select_host(&format!("/img/{i}.png"), &hosts))
            .collect();
        assert_eq!(chosen.len(), 2);
    }

    #[test_case("/a/b.css?ver=1", "css")]
    #[test_case("https://x.org/a.min.js#x", "js")]
    #[test_case("/wp-admin/admin-ajax.php", "php")]
    #[test_case("/dir.v2/file", "")]
    fn test_file_extension(url: &str, expected: &str) {
        assert_eq!(file_extension(url), expected);
    }
}
