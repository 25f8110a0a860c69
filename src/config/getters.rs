//! Getter methods for `BundleConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from a `BundleConfig` instance.

use std::borrow::Cow;
use std::path::Path;

use super::types::BundleConfig;
use crate::fetcher::FetchConfig;

impl BundleConfig {
    #[must_use]
    pub fn input(&self) -> &Path {
        &self.input
    }

    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    #[must_use]
    pub fn fetch(&self) -> &FetchConfig {
        &self.fetch
    }

    #[must_use]
    pub fn max_css_depth(&self) -> u8 {
        self.max_css_depth
    }

    #[must_use]
    pub fn generator(&self) -> &str {
        &self.generator
    }

    /// Source named in the banner: the explicit label, else the input file name
    #[must_use]
    pub fn source_label(&self) -> Cow<'_, str> {
        match &self.source_label {
            Some(label) => Cow::Borrowed(label),
            None => self
                .input
                .file_name()
                .map_or_else(|| self.input.to_string_lossy(), |name| name.to_string_lossy()),
        }
    }
}
