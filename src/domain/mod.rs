//! Domain layer with zones, hostnames, rewrite contexts and error types.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;

pub use entities::{
    AssetKind, AssetReference, CdnConfig, CdnSettings, CnameEntry, ContextKind, Hostname,
    RenderMode, RequestContext, RewriteContext, Scheme, SiteSettings, Zone,
};
pub use errors::{ConfigError, SkipReason};
