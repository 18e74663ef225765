//! Command-line arguments.

use super::app_config::LogLevel;
use crate::domain::{RenderMode, RequestContext, RewriteContext, Scheme};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "cdnrewrite",
    version,
    about = "Rewrites site asset URLs to CDN hostnames",
    long_about = None
)]
#[allow(clippy::struct_excessive_bools)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", env = "CDNREWRITE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Site base URL, overrides the configuration file.
    #[arg(long, value_name = "URL")]
    pub home_url: Option<String>,

    /// Switch CDN rewriting off.
    #[arg(long)]
    pub disable_cdn: bool,

    /// Call site to rewrite for.
    #[arg(long, value_enum)]
    pub context: RewriteContext,

    /// Scheme of the current request.
    #[arg(long, value_enum, default_value_t = Scheme::Https)]
    pub scheme: Scheme,

    /// Render as a back-office screen.
    #[arg(long)]
    pub admin: bool,

    /// Render as a draft preview.
    #[arg(long)]
    pub preview: bool,

    /// Render as a syndication feed.
    #[arg(long)]
    pub feed: bool,

    /// Skip the CDN for this request only.
    #[arg(long)]
    pub no_cdn: bool,

    /// Current page identifier (e.g. `wp-login.php` or a post slug).
    #[arg(long)]
    pub page: Option<String>,

    /// Input file; reads stdin when omitted or `-`.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,
}

impl CliArgs {
    /// Builds the request facts described by the flags.
    #[must_use]
    pub fn request(&self) -> RequestContext {
        let mut mode = RenderMode::empty();
        mode.set(RenderMode::ADMIN, self.admin);
        mode.set(RenderMode::PREVIEW, self.preview);
        mode.set(RenderMode::FEED, self.feed);
        mode.set(RenderMode::NO_CDN, self.no_cdn);

        let request = RequestContext::new(self.scheme).with_mode(mode);
        match &self.page {
            Some(page) => request.with_page(page.clone()),
            None => request,
        }
    }
}
