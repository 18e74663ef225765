//! Domain entity definitions.

mod asset;
mod cdn_config;
mod context;
mod hostname;
mod request;
mod zone;

pub use asset::{AssetKind, AssetReference};
pub use cdn_config::{CdnConfig, CdnSettings, CnameEntry, DEFAULT_CUSTOM_FILETYPES, SiteSettings};
pub use context::{ContextKind, RewriteContext};
pub use hostname::Hostname;
pub use request::{LOGIN_PAGES, RenderMode, RequestContext, Scheme};
pub use zone::Zone;
