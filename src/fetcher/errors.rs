//! Error types for resource fetching

use std::path::PathBuf;

use crate::locator::LocateError;

/// A resource could not be retrieved
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Server answered with a non-2xx status
    #[error("HTTP {status} {url}")]
    HttpStatus { url: String, status: u16 },

    /// Request never produced a usable response (DNS, TLS, connection, timeout)
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Local file missing or unreadable
    #[error("cannot read {}: {source}", path.display())]
    LocalRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Resource larger than the configured cap
    #[error("{location} exceeds the size limit of {limit} bytes")]
    TooLarge { location: String, limit: usize },
}

/// Anything that keeps a reference from being embedded
///
/// Resolution and fetch failures share one policy: fatal for scripts and
/// stylesheets, skipped with a warning for CSS assets.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
