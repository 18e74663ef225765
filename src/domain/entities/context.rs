//! Rewrite call sites and their zone table.

use super::Zone;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a context consumes its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// A single URL filtered in place.
    SingleUrl,
    /// A single URL coming from a script or style enqueue.
    Enqueue,
    /// An HTML or CSS document scanned for asset references.
    Document,
}

/// The call site that asked for a rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RewriteContext {
    /// Theme template directory URI.
    TemplateDirectoryUri,
    /// Attachment file URL.
    AttachmentUrl,
    /// A responsive-image srcset candidate.
    ImageSrcset,
    /// Emoticon image source.
    SmiliesSrc,
    /// Attachment image source tuple (url, width, height).
    AttachmentImageSrc,
    /// Active theme stylesheet URI.
    StylesheetUri,
    /// Stylesheet URL from a third-party minifier.
    MinifyCssUrl,
    /// Script URL from a third-party minifier.
    MinifyJsUrl,
    /// Combined source from a third-party minifier.
    BwpMinifySrc,
    /// Enqueued stylesheet source.
    StyleLoaderSrc,
    /// Enqueued script source.
    ScriptLoaderSrc,
    /// `<img>` tags in post content, widgets or the page buffer.
    ContentImages,
    /// CSS `url()` references in the page buffer.
    InlineStyles,
    /// `<a href>` links to downloadable files.
    CustomFiles,
    /// Whole page buffer: custom files, images, then inline styles.
    Buffer,
}

impl RewriteContext {
    /// Returns how the input is consumed.
    #[must_use]
    pub const fn kind(self) -> ContextKind {
        match self {
            Self::StyleLoaderSrc | Self::ScriptLoaderSrc => ContextKind::Enqueue,
            Self::ContentImages | Self::InlineStyles | Self::CustomFiles | Self::Buffer => {
                ContextKind::Document
            }
            _ => ContextKind::SingleUrl,
        }
    }

    /// Returns the zones checked for this context.
    ///
    /// `ext` is the asset's file extension; it only matters for contexts that
    /// route by extension. `Buffer` has no zones of its own, it delegates to
    /// [`RewriteContext::buffer_passes`].
    #[must_use]
    pub fn zones(self, ext: &str) -> Vec<Zone> {
        match self {
            Self::AttachmentUrl
            | Self::ImageSrcset
            | Self::SmiliesSrc
            | Self::AttachmentImageSrc
            | Self::ContentImages => vec![Zone::All, Zone::Images],
            Self::StylesheetUri | Self::MinifyCssUrl | Self::MinifyJsUrl | Self::BwpMinifySrc => {
                vec![Zone::All, Zone::CssAndJs, Zone::extension(ext)]
            }
            Self::StyleLoaderSrc => vec![Zone::All, Zone::CssAndJs, Zone::Css],
            Self::ScriptLoaderSrc => vec![Zone::All, Zone::CssAndJs, Zone::Js],
            Self::InlineStyles => vec![Zone::All, Zone::Images, Zone::CssAndJs, Zone::Css],
            Self::CustomFiles => vec![Zone::All],
            Self::TemplateDirectoryUri => vec![Zone::All, Zone::extension(ext)],
            Self::Buffer => Vec::new(),
        }
    }

    /// Document passes run for the page buffer, in order.
    #[must_use]
    pub const fn buffer_passes() -> [Self; 3] {
        [Self::CustomFiles, Self::ContentImages, Self::InlineStyles]
    }
}

impl fmt::Display for RewriteContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TemplateDirectoryUri => "template-directory-uri",
            Self::AttachmentUrl => "attachment-url",
            Self::ImageSrcset => "image-srcset",
            Self::SmiliesSrc => "smilies-src",
            Self::AttachmentImageSrc => "attachment-image-src",
            Self::StylesheetUri => "stylesheet-uri",
            Self::MinifyCssUrl => "minify-css-url",
            Self::MinifyJsUrl => "minify-js-url",
            Self::BwpMinifySrc => "bwp-minify-src",
            Self::StyleLoaderSrc => "style-loader-src",
            Self::ScriptLoaderSrc => "script-loader-src",
            Self::ContentImages => "content-images",
            Self::InlineStyles => "inline-styles",
            Self::CustomFiles => "custom-files",
            Self::Buffer => "buffer",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_contexts_use_image_zones() {
        for context in [
            RewriteContext::AttachmentUrl,
            RewriteContext::ImageSrcset,
            RewriteContext::SmiliesSrc,
            RewriteContext::AttachmentImageSrc,
            RewriteContext::ContentImages,
        ] {
            assert_eq!(context.zones("png"), vec![Zone::All, Zone::Images]);
        }
    }

    #[test]
    fn test_minify_contexts_route_by_extension() {
        assert_eq!(
            RewriteContext::MinifyJsUrl.zones("js"),
            vec![Zone::All, Zone::CssAndJs, Zone::Js]
        );
        assert_eq!(
            RewriteContext::StylesheetUri.zones("css"),
            vec![Zone::All, Zone::CssAndJs, Zone::Css]
        );
    }

    #[test]
    fn test_enqueue_contexts_ignore_extension() {
        assert_eq!(
            RewriteContext::StyleLoaderSrc.zones("php"),
            vec![Zone::All, Zone::CssAndJs, Zone::Css]
        );
        assert_eq!(RewriteContext::ScriptLoaderSrc.kind(), ContextKind::Enqueue);
    }

    #[test]
    fn test_document_contexts() {
        assert_eq!(RewriteContext::CustomFiles.zones(""), vec![Zone::All]);
        assert_eq!(
            RewriteContext::InlineStyles.zones(""),
            vec![Zone::All, Zone::Images, Zone::CssAndJs, Zone::Css]
        );
        assert_eq!(RewriteContext::Buffer.kind(), ContextKind::Document);
        assert!(RewriteContext::Buffer.zones("").is_empty());
    }

    #[test]
    fn test_template_directory_uses_extension_zone() {
        assert_eq!(
            RewriteContext::TemplateDirectoryUri.zones("woff"),
            vec![Zone::All, Zone::Extension("woff".to_string())]
        );
    }
}
