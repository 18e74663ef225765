//! CDN zone configuration.

use super::{Hostname, Zone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default file types rewritten by the custom-files document scan.
pub const DEFAULT_CUSTOM_FILETYPES: &[&str] = &[
    "mp3", "ogg", "mp4", "m4v", "avi", "mov", "flv", "swf", "webm", "pdf", "doc", "docx", "txt",
    "zip", "tar", "bz2", "tgz", "rar",
];

/// One configured CNAME and the zone it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnameEntry {
    /// CDN hostname.
    pub host: Hostname,
    /// Zone served by this hostname.
    #[serde(default = "default_zone")]
    pub zone: Zone,
}

impl CnameEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(host: impl Into<Hostname>, zone: impl Into<Zone>) -> Self {
        Self {
            host: host.into(),
            zone: zone.into(),
        }
    }
}

/// Site identity used to tell the site's own assets from external ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Site base URL; relative asset URLs are resolved against it.
    #[serde(default = "default_home_url")]
    pub home_url: String,

    /// Additional hosts that serve this site's assets (translated domains, aliases).
    #[serde(default)]
    pub extra_hosts: Vec<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            home_url: default_home_url(),
            extra_hosts: Vec::new(),
        }
    }
}

/// CDN behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdnSettings {
    /// Master switch.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Keep rewriting on HTTPS requests.
    #[serde(default = "default_true")]
    pub on_ssl: bool,

    /// Regular-expression fragments matched against asset paths.
    #[serde(default)]
    pub reject_files: Vec<String>,

    /// File extensions rewritten inside `<a href>` links.
    #[serde(default = "default_custom_filetypes")]
    pub custom_filetypes: Vec<String>,

    /// Page identifiers on which no rewriting happens.
    #[serde(default)]
    pub excluded_pages: Vec<String>,

    /// Configured CNAMEs in priority order.
    #[serde(default)]
    pub cnames: Vec<CnameEntry>,
}

impl Default for CdnSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            on_ssl: true,
            reject_files: Vec::new(),
            custom_filetypes: default_custom_filetypes(),
            excluded_pages: Vec::new(),
            cnames: Vec::new(),
        }
    }
}

/// Zone to hostnames mapping.
///
/// A zone with no entry, or only empty hostnames, is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CdnConfig {
    zones: HashMap<Zone, Vec<Hostname>>,
}

impl CdnConfig {
    /// Builds the mapping from CNAME entries, keeping configuration order per zone.
    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a CnameEntry>) -> Self {
        let mut zones: HashMap<Zone, Vec<Hostname>> = HashMap::new();
        for entry in entries {
            if entry.host.is_empty() {
                continue;
            }
            let hosts = zones.entry(entry.zone.clone()).or_default();
            if !hosts.contains(&entry.host) {
                hosts.push(entry.host.clone());
            }
        }
        Self { zones }
    }

    /// Returns the hostnames configured for `zone`.
    #[must_use]
    pub fn hosts(&self, zone: &Zone) -> &[Hostname] {
        self.zones.get(zone).map_or(&[], Vec::as_slice)
    }

    /// Returns every configured hostname.
    pub fn all_hosts(&self) -> impl Iterator<Item = &Hostname> {
        self.zones.values().flatten()
    }

    /// Returns whether no zone has a hostname.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.values().all(Vec::is_empty)
    }
}

fn default_zone() -> Zone {
    Zone::All
}

fn default_home_url() -> String {
    "http://localhost/".to_string()
}

fn default_true() -> bool {
    true
}

fn default_custom_filetypes() -> Vec<String> {
    DEFAULT_CUSTOM_FILETYPES
        .iter()
        .map(ToString::to_string)
        .collect()
}
