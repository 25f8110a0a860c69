//! Core configuration types for offline bundling
//!
//! This module contains the main `BundleConfig` struct that defines which
//! document is bundled, where the result goes and how resources are fetched.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::fetcher::FetchConfig;
use crate::utils::{DEFAULT_GENERATOR, DEFAULT_MAX_CSS_DEPTH};

/// Main configuration struct for a bundle run
///
/// Deserialization goes through [`BundleConfig::builder`], so loaded paths are
/// normalized and validated like built ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BundleConfigFile")]
pub struct BundleConfig {
    /// Source HTML document.
    ///
    /// **INVARIANT:** Always an absolute path (normalized in builder).
    /// Relative local references resolve against its directory.
    pub(crate) input: PathBuf,

    /// Bundled HTML document, absolute like `input`
    pub(crate) output: PathBuf,

    /// Timeout, `User-Agent` and size limit for every fetch
    pub(crate) fetch: FetchConfig,

    /// Levels of `@import url(...)` followed below each linked stylesheet
    pub(crate) max_css_depth: u8,

    /// Tool named in the `AUTO-GENERATED by ...` banner
    pub(crate) generator: String,

    /// Source named in the banner's `edit ... instead` hint.
    /// Defaults to the input file name.
    pub(crate) source_label: Option<String>,
}

/// Serialized form of [`BundleConfig`] before validation
#[derive(Debug, Clone, Deserialize)]
pub struct BundleConfigFile {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default = "default_max_css_depth")]
    pub max_css_depth: u8,
    #[serde(default = "default_generator")]
    pub generator: String,
    #[serde(default)]
    pub source_label: Option<String>,
}

fn default_max_css_depth() -> u8 {
    DEFAULT_MAX_CSS_DEPTH
}

fn default_generator() -> String {
    DEFAULT_GENERATOR.to_string()
}
