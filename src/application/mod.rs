//! Application layer with the rewriting services and DTOs.

/// Data transfer objects.
pub mod dto;
/// Zone resolution, URL rewriting, document scanning and the pipeline.
pub mod services;

pub use dto::{ImageSource, SrcsetDescriptor, SrcsetSource};
pub use services::{HtmlAssetScanner, RewritePipeline, UrlRewriter, ZoneResolver};
