//! Four-pass HTML rewriting for offline bundles.
//!
//! Each pass scans the whole current document and finishes before the next
//! one starts:
//! 1. external `<script src>` elements become inline scripts
//! 2. `<link rel="stylesheet">` hrefs become `data:text/css` URIs, with the
//!    stylesheet's own `url(...)` assets embedded first
//! 3. `preconnect`/`dns-prefetch` hints are removed
//! 4. leftover `integrity`/`crossorigin` attributes are stripped
//!
//! Every pass is a streaming `lol_html` rewrite, so comments, raw-text bodies
//! and untouched markup pass through byte for byte. Passes 1 and 2 first scan
//! the document for candidates, fetch them one at a time in document order,
//! then replace the candidates in a second rewrite.
//!
//! A script or stylesheet that cannot be fetched aborts the rewrite; an asset
//! inside a stylesheet that cannot be fetched is only a warning.

mod cleanup;
mod document;
mod hints;
mod scripts;
mod stylesheets;

use serde::{Deserialize, Serialize};

use crate::fetcher::{Fetch, ResourceError};
use crate::inline_css::AssetFailure;
use crate::locator::Base;
use crate::utils::DEFAULT_MAX_CSS_DEPTH;

/// Error types for the rewrite passes. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("HTML rewriting failed: {0}")]
    Markup(#[from] lol_html::errors::RewritingError),

    #[error("rewritten HTML is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("failed to inline script {src}: {source}")]
    Script {
        src: String,
        #[source]
        source: ResourceError,
    },

    #[error("failed to inline stylesheet {href}: {source}")]
    Stylesheet {
        href: String,
        #[source]
        source: ResourceError,
    },
}

/// What the passes changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteStats {
    pub scripts_inlined: usize,
    pub stylesheets_inlined: usize,
    /// Distinct CSS assets embedded, summed over all stylesheets
    pub assets_inlined: usize,
    pub hints_removed: usize,
    pub attributes_stripped: usize,
    /// Assets left as `url(...)` references
    pub asset_failures: Vec<AssetFailure>,
}

/// Rewritten document plus statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub html: String,
    pub stats: RewriteStats,
}

/// Drives the rewrite passes against one fetcher
#[derive(Clone, Copy)]
pub struct HtmlRewriter<'f> {
    fetcher: &'f dyn Fetch,
    max_css_depth: u8,
}

impl std::fmt::Debug for HtmlRewriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlRewriter")
            .field("max_css_depth", &self.max_css_depth)
            .finish_non_exhaustive()
    }
}

impl<'f> HtmlRewriter<'f> {
    #[must_use]
    pub fn new(fetcher: &'f dyn Fetch) -> Self {
        Self {
            fetcher,
            max_css_depth: DEFAULT_MAX_CSS_DEPTH,
        }
    }

    /// How many levels of `@import url(...)` to follow below a linked stylesheet
    #[must_use]
    pub fn max_css_depth(mut self, depth: u8) -> Self {
        self.max_css_depth = depth;
        self
    }

    /// Run all four passes over `html`.
    ///
    /// `base` is the document's base context: its directory for a local file,
    /// its URL for a remote page.
    pub async fn rewrite(&self, html: &str, base: &Base) -> Result<Rewritten, RewriteError> {
        let mut stats = RewriteStats::default();

        let html = self.inline_scripts(html, base, &mut stats).await?;
        let html = self.inline_stylesheets(&html, base, &mut stats).await?;
        let html = hints::remove_resource_hints(&html, &mut stats)?;
        let html = cleanup::strip_transport_attributes(&html, &mut stats)?;

        log::info!(
            "Rewrite done: {} scripts, {} stylesheets, {} assets inlined, {} assets skipped",
            stats.scripts_inlined,
            stats.stylesheets_inlined,
            stats.assets_inlined,
            stats.asset_failures.len()
        );

        Ok(Rewritten { html, stats })
    }
}

/// Run all four passes with default settings
pub async fn rewrite(html: &str, base: &Base, fetcher: &dyn Fetch) -> Result<Rewritten, RewriteError> {
    HtmlRewriter::new(fetcher).rewrite(html, base).await
}

/// Provenance marker placed before every inlined element
fn provenance_comment(source: &str) -> String {
    format!("<!-- inlined from {source} -->\n")
}
