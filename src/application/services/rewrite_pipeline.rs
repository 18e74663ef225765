//! Context-driven CDN rewriting of URLs and documents.

use crate::application::dto::{ImageSource, SrcsetSource};
use crate::application::services::html_scanner::HtmlAssetScanner;
use crate::application::services::url_rewriter::{UrlRewriter, file_extension};
use crate::application::services::zone_resolver::ZoneResolver;
use crate::domain::{
    AssetKind, CdnConfig, CdnSettings, ConfigError, ContextKind, Hostname, RenderMode,
    RequestContext, RewriteContext, Scheme, SiteSettings,
};
use tracing::{debug, trace};

/// Compiled rewriting pipeline for one configuration.
///
/// Immutable once built; share it freely between threads.
#[derive(Debug, Clone)]
pub struct RewritePipeline {
    enabled: bool,
    on_ssl: bool,
    excluded_pages: Vec<String>,
    zones: CdnConfig,
    rewriter: UrlRewriter,
    scanner: HtmlAssetScanner,
}

impl RewritePipeline {
    /// Compiles site and CDN settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the home URL, a rejected file pattern or a
    /// custom file type is invalid.
    pub fn new(site: &SiteSettings, cdn: &CdnSettings) -> Result<Self, ConfigError> {
        let zones = CdnConfig::from_entries(&cdn.cnames);
        let rewriter = UrlRewriter::new(site, cdn)?;
        let scanner = HtmlAssetScanner::new(&cdn.custom_filetypes, zones.all_hosts().cloned())?;

        Ok(Self {
            enabled: cdn.enabled,
            on_ssl: cdn.on_ssl,
            excluded_pages: cdn.excluded_pages.clone(),
            zones,
            rewriter,
            scanner,
        })
    }

    /// Rewrites `input` for `context`, dispatching on the context kind.
    #[must_use]
    pub fn rewrite(&self, context: RewriteContext, input: &str, request: &RequestContext) -> String {
        match context.kind() {
            ContextKind::Document => self.rewrite_document(context, input, request),
            ContextKind::SingleUrl | ContextKind::Enqueue => {
                self.rewrite_url(context, input, request)
            }
        }
    }

    /// Rewrites a single asset URL.
    #[must_use]
    pub fn rewrite_url(&self, context: RewriteContext, url: &str, request: &RequestContext) -> String {
        let kind = context.kind();
        if kind == ContextKind::Document {
            return self.rewrite_document(context, url, request);
        }

        if !self.is_active(request) || request.is_admin() || request.is_preview() {
            return url.to_string();
        }

        let ext = file_extension(url);
        if ext.eq_ignore_ascii_case("php") {
            return url.to_string();
        }

        match kind {
            ContextKind::Enqueue => {
                if request.is_login_page() || self.has_empty_path(url, request.scheme) {
                    return url.to_string();
                }
            }
            ContextKind::SingleUrl => {
                if context == RewriteContext::TemplateDirectoryUri
                    && self.rewriter.has_rejected_files()
                {
                    return url.to_string();
                }
            }
            ContextKind::Document => {}
        }

        match self.hosts_for(context, ext) {
            Some(hosts) => self.rewriter.rewrite(url, &hosts, request.scheme),
            None => url.to_string(),
        }
    }

    /// Rewrites asset references inside an HTML or CSS document.
    ///
    /// Bytes outside rewritten URLs are preserved exactly.
    #[must_use]
    pub fn rewrite_document(
        &self,
        context: RewriteContext,
        html: &str,
        request: &RequestContext,
    ) -> String {
        if context.kind() != ContextKind::Document {
            return self.rewrite_url(context, html, request);
        }

        if html.is_empty()
            || !self.is_active(request)
            || request
                .mode
                .intersects(RenderMode::ADMIN | RenderMode::FEED | RenderMode::PREVIEW)
        {
            return html.to_string();
        }

        if context == RewriteContext::Buffer {
            let mut buffer = html.to_string();
            for pass in RewriteContext::buffer_passes() {
                buffer = self.run_pass(pass, &buffer, request.scheme);
            }
            return buffer;
        }

        self.run_pass(context, html, request.scheme)
    }

    /// Rewrites every candidate URL of a responsive image srcset.
    #[must_use]
    pub fn rewrite_srcset(
        &self,
        sources: Vec<SrcsetSource>,
        request: &RequestContext,
    ) -> Vec<SrcsetSource> {
        sources
            .into_iter()
            .map(|mut source| {
                source.url = self.rewrite_url(RewriteContext::ImageSrcset, &source.url, request);
                source
            })
            .collect()
    }

    /// Rewrites the URL of an attachment image source.
    #[must_use]
    pub fn rewrite_attachment_image(
        &self,
        image: Option<ImageSource>,
        request: &RequestContext,
    ) -> Option<ImageSource> {
        image.map(|mut image| {
            image.url = self.rewrite_url(RewriteContext::AttachmentImageSrc, &image.url, request);
            image
        })
    }

    /// Returns whether rewriting is switched on for this request at all.
    #[must_use]
    pub fn is_active(&self, request: &RequestContext) -> bool {
        if !self.enabled || request.mode.contains(RenderMode::NO_CDN) {
            return false;
        }
        if request.scheme == Scheme::Https && !self.on_ssl {
            return false;
        }
        !request
            .page
            .as_ref()
            .is_some_and(|page| self.excluded_pages.contains(page))
    }

    fn hosts_for(&self, context: RewriteContext, ext: &str) -> Option<Vec<Hostname>> {
        let zones = context.zones(ext);
        let hosts = ZoneResolver::resolve(&zones, &self.zones);
        if hosts.is_none() {
            trace!(context = %context, "No CDN hostname for context zones");
        }
        hosts
    }

    fn has_empty_path(&self, url: &str, scheme: Scheme) -> bool {
        self.rewriter
            .resolve(url, scheme)
            .is_ok_and(|parsed| parsed.path().trim_matches('/').is_empty())
    }

    fn run_pass(&self, context: RewriteContext, html: &str, scheme: Scheme) -> String {
        let kind = match context {
            RewriteContext::ContentImages => AssetKind::Image,
            RewriteContext::InlineStyles => AssetKind::InlineStyleUrl,
            RewriteContext::CustomFiles => AssetKind::AnchorHref,
            _ => return html.to_string(),
        };
        let Some(hosts) = self.hosts_for(context, "") else {
            return html.to_string();
        };

        let mut output = String::with_capacity(html.len() + html.len() / 8);
        let mut last = 0;
        let mut rewritten = 0usize;

        for reference in self.scanner.scan(kind, html) {
            let url = self.rewriter.rewrite(reference.url, &hosts, scheme);
            if url == reference.url {
                continue;
            }
            output.push_str(&html[last..reference.span.start]);
            output.push_str(&reference.reconstruct(&url));
            last = reference.span.end;
            rewritten += 1;
        }

        if rewritten == 0 {
            return html.to_string();
        }

        output.push_str(&html[last..]);
        debug!(context = %context, rewritten = rewritten, "Rewrote document assets");
        output
    }
}
