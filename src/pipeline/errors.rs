//! Error types for a bundle run

use std::path::PathBuf;

use crate::html_rewriter::RewriteError;

/// Fatal failures of a bundle run. Nothing is written when one occurs.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("failed to read input {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}
