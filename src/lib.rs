//! cdnrewrite - rewrites site asset URLs to CDN hostnames.
//!
//! This crate maps asset classes ("zones") to CDN hostnames and rewrites
//! image, stylesheet, script, attachment and downloadable-file URLs found in
//! single URLs or whole HTML/CSS documents. Rewriting is pure and synchronous:
//! configuration is compiled once into a [`application::RewritePipeline`] and
//! every call returns a transformed copy of its input.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the rewriting services and DTOs.
pub mod application;
/// Domain layer containing zones, hostnames, contexts and error types.
pub mod domain;
/// Infrastructure layer containing configuration loading and CLI arguments.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "cdnrewrite";
