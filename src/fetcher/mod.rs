//! Resource fetching
//!
//! Retrieves the bytes or text behind a resolved [`Location`], over HTTP for
//! remote locations and from disk for local ones.
//!
//! ## Architecture
//!
//! The rewrite passes only talk to the [`Fetch`] trait. [`ResourceFetcher`] is
//! the production implementation backed by a shared `reqwest::Client` and
//! `tokio::fs`. Futures are boxed so the trait stays object-safe and test code
//! can swap in fetchers with artificial delays or fetch counters.
//!
//! There are no retries: one failed request is reported to the caller, which
//! decides whether it is fatal.

pub mod errors;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

pub use errors::{FetchError, ResourceError};

use crate::locator::Location;

/// Type alias for a boxed fetch future
pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// Uniform access to remote and local resources
pub trait Fetch: Send + Sync {
    /// Fetch raw bytes (fonts, images, nested assets)
    fn fetch_bytes<'a>(&'a self, location: &'a Location) -> FetchFuture<'a, Vec<u8>>;

    /// Fetch a text resource (scripts, stylesheets), decoded as UTF-8
    fn fetch_text<'a>(&'a self, location: &'a Location) -> FetchFuture<'a, String> {
        Box::pin(async move {
            let bytes = self.fetch_bytes(location).await?;
            Ok(decode_text(bytes, &location.to_string()))
        })
    }
}

/// Decode `bytes` as UTF-8, replacing invalid sequences with U+FFFD
pub fn decode_text(bytes: Vec<u8>, source: &str) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("{source} is not valid UTF-8, invalid bytes replaced");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

/// Configuration for request timeouts, headers and size limits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout. `None` waits as long as the server takes.
    pub timeout: Option<Duration>,

    /// `User-Agent` header. `None` sends no custom headers at all.
    ///
    /// Web-font services pick the font format from this header; without it
    /// Google Fonts answers with TrueType instead of WOFF2.
    pub user_agent: Option<String>,

    /// Maximum size of any single resource in bytes. `None` means unlimited.
    pub max_resource_bytes: Option<usize>,
}

/// Fetcher for `http(s)` URLs and local files
#[derive(Debug, Clone)]
pub struct ResourceFetcher {
    client: Client,
    config: FetchConfig,
}

impl ResourceFetcher {
    #[must_use]
    pub fn new(config: FetchConfig) -> Self {
        // Client already uses Arc internally, clones share the pool
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// HTTP GET with status check, streamed with a running size limit
    async fn download(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.get(url.clone());
        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }
        if let Some(ref user_agent) = self.config.user_agent {
            request = request.header(reqwest::header::USER_AGENT, user_agent);
        }

        let response = request.send().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Enforce limit BEFORE downloading when the server tells us the size
        let expected_size = response.content_length().unwrap_or(0);
        if let Some(limit) = self.config.max_resource_bytes
            && expected_size > limit as u64
        {
            return Err(FetchError::TooLarge {
                location: url.to_string(),
                limit,
            });
        }

        let mut buffer = Vec::with_capacity(usize::try_from(expected_size).unwrap_or(0));
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

            let new_total = buffer.len() + chunk.len();
            if let Some(limit) = self.config.max_resource_bytes
                && new_total > limit
            {
                return Err(FetchError::TooLarge {
                    location: url.to_string(),
                    limit,
                });
            }

            buffer.extend_from_slice(&chunk);
        }

        Ok(buffer)
    }

    async fn read_local(&self, path: &Path) -> Result<Vec<u8>, FetchError> {
        log::info!("→ read {}", path.display());

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| FetchError::LocalRead {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(limit) = self.config.max_resource_bytes
            && bytes.len() > limit
        {
            return Err(FetchError::TooLarge {
                location: path.display().to_string(),
                limit,
            });
        }

        Ok(bytes)
    }
}

impl Default for ResourceFetcher {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl Fetch for ResourceFetcher {
    fn fetch_bytes<'a>(&'a self, location: &'a Location) -> FetchFuture<'a, Vec<u8>> {
        Box::pin(async move {
            match location {
                Location::Remote(url) => {
                    log::info!("→ fetch(bin) {url}");
                    self.download(url).await
                }
                Location::Local(path) => self.read_local(path).await,
            }
        })
    }

    fn fetch_text<'a>(&'a self, location: &'a Location) -> FetchFuture<'a, String> {
        Box::pin(async move {
            let bytes = match location {
                Location::Remote(url) => {
                    log::info!("→ fetch {url}");
                    self.download(url).await?
                }
                Location::Local(path) => self.read_local(path).await?,
            };

            Ok(decode_text(bytes, &location.to_string()))
        })
    }
}
