//! Type definitions for CSS asset inlining

use serde::{Deserialize, Serialize};

/// Error information for an asset that could not be embedded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFailure {
    /// Raw text inside `url(...)`
    pub reference: String,
    /// Resolved location, when resolution got that far
    pub location: Option<String>,
    pub error: String,
}

/// Result of asset inlining with success and failure tracking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssInlining {
    pub css: String,
    /// Distinct references replaced by data URIs, nested imports included
    pub inlined: usize,
    pub failures: Vec<AssetFailure>,
}

impl CssInlining {
    /// Total number of distinct references processed
    #[must_use]
    pub fn total(&self) -> usize {
        self.inlined + self.failures.len()
    }

    /// Check if any failures occurred
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
