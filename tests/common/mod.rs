//! Test utilities and helper functions for the offline bundler test suite

use anyhow::Result;
use kodegen_tools_offline_html::fetcher::{Fetch, FetchError, FetchFuture};
use kodegen_tools_offline_html::locator::{Base, Location};
use mockito::{Mock, Server};
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;

/// Page URL used as the document base for in-memory tests
#[allow(dead_code)]
pub const PAGE_URL: &str = "https://example.com/index.html";

/// Creates a temporary directory for test output
#[allow(dead_code)]
pub fn create_test_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test HTML document with specified head and body content
#[allow(dead_code)]
pub fn create_test_html(head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Offline test page</title>
    {head}
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// Writes files relative to `root`, creating parent directories
#[allow(dead_code)]
pub async fn create_test_file_tree(root: &Path, files: &[(&str, &str)]) -> Result<()> {
    for (file_path, content) in files {
        let full_path = root.join(file_path);
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, content).await?;
    }

    Ok(())
}

/// Base context of the in-memory test page
#[allow(dead_code)]
pub fn page_base() -> Base {
    Base::Remote(Url::parse(PAGE_URL).expect("PAGE_URL is valid"))
}

/// Creates a mock endpoint that returns a body with the given content type
#[allow(dead_code)]
pub async fn create_resource_mock(server: &mut Server, path: &str, content_type: &str, body: &[u8]) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", content_type)
        .with_body(body)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns an error
#[allow(dead_code)]
pub async fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("Error")
        .create_async()
        .await
}

/// Helper to create test URLs
#[allow(dead_code)]
pub fn test_url(server: &Server, path: &str) -> String {
    format!("{}{}", server.url(), path)
}

/// In-memory fetcher keyed by absolute location.
///
/// Unknown locations fail with HTTP 404. Every call is counted per location,
/// and an optional random delay per fetch shuffles completion order.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockFetcher {
    resources: HashMap<String, Vec<u8>>,
    max_delay_ms: u64,
    calls: Mutex<HashMap<String, usize>>,
    total_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `location` (absolute URL or path)
    pub fn with(mut self, location: &str, body: impl AsRef<[u8]>) -> Self {
        self.resources
            .insert(location.to_string(), body.as_ref().to_vec());
        self
    }

    /// Delay every fetch by a random 0..=`max_ms` milliseconds
    pub fn with_random_delay(mut self, max_ms: u64) -> Self {
        self.max_delay_ms = max_ms;
        self
    }

    /// Number of fetches for `location`
    pub fn calls(&self, location: &str) -> usize {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .get(location)
            .copied()
            .unwrap_or(0)
    }

    /// Number of fetches overall
    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

impl Fetch for MockFetcher {
    fn fetch_bytes<'a>(&'a self, location: &'a Location) -> FetchFuture<'a, Vec<u8>> {
        let key = location.to_string();
        let delay = if self.max_delay_ms > 0 {
            rand::rng().random_range(0..=self.max_delay_ms)
        } else {
            0
        };

        *self
            .calls
            .lock()
            .expect("calls lock poisoned")
            .entry(key.clone())
            .or_insert(0) += 1;
        self.total_calls.fetch_add(1, Ordering::SeqCst);

        Box::pin(async move {
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            self.resources
                .get(&key)
                .cloned()
                .ok_or(FetchError::HttpStatus { url: key, status: 404 })
        })
    }
}

/// Verifies that a file exists and has content
#[allow(dead_code)]
pub async fn assert_file_exists_with_content(path: &Path) -> Result<String> {
    assert!(path.exists(), "File does not exist: {path:?}");
    let content = tokio::fs::read_to_string(path).await?;
    assert!(!content.is_empty(), "File is empty: {path:?}");
    Ok(content)
}

/// Decodes the payload of a `data:<mime>;base64,<b64>` URI
#[allow(dead_code)]
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    use base64::Engine;

    let rest = uri.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload).ok()?;
    Some((mime.to_string(), bytes))
}

/// Extracts every `href="data:text/css;..."` stylesheet from rewritten HTML, decoded
#[allow(dead_code)]
pub fn inlined_stylesheets(html: &str) -> Vec<String> {
    let re = regex::Regex::new(r#"href="(data:text/css;base64,[^"]*)""#).expect("valid regex");
    re.captures_iter(html)
        .filter_map(|caps| decode_data_uri(&caps[1]))
        .map(|(_, bytes)| String::from_utf8(bytes).expect("inlined CSS is UTF-8"))
        .collect()
}
