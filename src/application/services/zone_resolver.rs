//! Zone to hostname resolution.

use crate::domain::{CdnConfig, Hostname, Zone};

/// Maps requested zones onto configured CDN hostnames.
pub struct ZoneResolver;

impl ZoneResolver {
    /// Collects the hostnames serving any of `zones`, in first-seen order.
    ///
    /// Returns `None` when no requested zone has a hostname, which callers
    /// treat as "CDN disabled for this request".
    #[must_use]
    pub fn resolve(zones: &[Zone], config: &CdnConfig) -> Option<Vec<Hostname>> {
        let mut hosts: Vec<Hostname> = Vec::new();

        for zone in zones {
            for host in config.hosts(zone) {
                if !hosts.contains(host) {
                    hosts.push(host.clone());
                }
            }
        }

        (!hosts.is_empty()).then_some(hosts)
    }
}
