//! Builder methods available for all states
//!
//! This module contains methods that can be called on the builder
//! regardless of its current type state.

use std::time::Duration;

use super::builder::BundleConfigBuilder;
use crate::fetcher::FetchConfig;

impl<State> BundleConfigBuilder<State> {
    /// Replace the whole fetch configuration
    #[must_use]
    pub fn fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Set a per-request timeout.
    ///
    /// Without one a request waits as long as the server takes.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.fetch.timeout = Some(timeout);
        self
    }

    /// Send a `User-Agent` header with every request
    ///
    /// # Example
    ///
    /// ```rust
    /// # use kodegen_tools_offline_html::config::BundleConfig;
    /// # fn main() -> anyhow::Result<()> {
    /// // Google Fonts only serves WOFF2 to browsers that identify themselves
    /// let config = BundleConfig::builder()
    ///     .input("index.dev.html")
    ///     .output("index.html")
    ///     .user_agent("Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0")
    ///     .build()?;
    /// assert!(config.fetch().user_agent.is_some());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.fetch.user_agent = Some(user_agent.into());
        self
    }

    /// Refuse any single resource larger than `bytes`
    #[must_use]
    pub fn max_resource_bytes(mut self, bytes: usize) -> Self {
        self.fetch.max_resource_bytes = Some(bytes);
        self
    }

    /// Levels of `@import url(...)` to follow below each linked stylesheet.
    /// `0` embeds imported stylesheets without touching their own references.
    #[must_use]
    pub fn max_css_depth(mut self, depth: u8) -> Self {
        self.max_css_depth = depth;
        self
    }

    /// Tool name written into the banner
    #[must_use]
    pub fn generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Source named in the banner instead of the input file name
    #[must_use]
    pub fn source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = Some(label.into());
        self
    }
}
