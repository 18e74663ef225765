//! Rewriting services.

pub mod html_scanner;
pub mod rewrite_pipeline;
pub mod url_rewriter;
pub mod zone_resolver;

pub use html_scanner::{AssetScan, HtmlAssetScanner};
pub use rewrite_pipeline::RewritePipeline;
pub use url_rewriter::{UrlRewriter, file_extension, is_data_uri, select_host};
pub use zone_resolver::ZoneResolver;
