//! Shared configuration constants for the offline bundler
//!
//! Default values used by the config builder and the rewrite passes, kept in
//! one place to avoid magic numbers.

/// Default depth for following `@import url(...)` chains inside stylesheets
///
/// The top-level stylesheet is depth 0. Four levels covers every real-world
/// font/theme setup we have seen and stops import cycles early.
pub const DEFAULT_MAX_CSS_DEPTH: u8 = 4;

/// Generator name written into the provenance banner
pub const DEFAULT_GENERATOR: &str = env!("CARGO_PKG_NAME");

/// Hosts serving web-font stylesheets whose `url(...)` entries point at font binaries
pub const WEB_FONT_CSS_HOSTS: &[&str] = &["fonts.googleapis.com", "fonts.bunny.net", "use.typekit.net"];

/// Attributes that only matter while a resource is still fetched over the network
pub const TRANSPORT_ATTRIBUTES: &[&str] = &["integrity", "crossorigin"];

/// `rel` values of resource hints that are removed from bundled output
pub const RESOURCE_HINT_RELS: &[&str] = &["preconnect", "dns-prefetch"];

/// Infix stripped from the input file name when no output path is given
/// (`page.dev.html` -> `page.html`)
pub const DEV_FILE_INFIX: &str = ".dev";
