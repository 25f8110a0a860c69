//! Summary of a finished bundle run

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::html_rewriter::RewriteStats;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Size of the written file, banner included
    pub bytes_written: usize,
    pub stats: RewriteStats,
}

impl BundleReport {
    /// Whether every stylesheet asset made it into the bundle
    #[must_use]
    pub fn is_fully_offline(&self) -> bool {
        self.stats.asset_failures.is_empty()
    }
}
