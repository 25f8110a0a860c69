//! Bundle driver
//!
//! Reads the source document, runs the rewrite passes with the document's
//! directory as base, prefixes the provenance banner and writes the result.
//! The output is written to a temporary file next to its destination and
//! renamed into place, so a failed run leaves any previous output untouched.

pub mod errors;
pub mod report;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

pub use errors::BundleError;
pub use report::BundleReport;

use crate::config::BundleConfig;
use crate::fetcher::{Fetch, ResourceFetcher, decode_text};
use crate::html_rewriter::HtmlRewriter;
use crate::locator::Base;

/// Bundle `config.input()` into `config.output()` using `fetcher`.
///
/// # Errors
///
/// Fails if the input cannot be read, a script or stylesheet cannot be
/// inlined, or the output cannot be written. Assets inside stylesheets that
/// cannot be fetched are reported in [`BundleReport::stats`] instead.
pub async fn build(config: &BundleConfig, fetcher: &dyn Fetch) -> Result<BundleReport, BundleError> {
    let input = config.input();
    let output = config.output();

    log::info!("== Building offline HTML ==");
    log::info!("Input : {}", input.display());
    log::info!("Output: {}", output.display());

    let bytes = tokio::fs::read(input)
        .await
        .map_err(|source| BundleError::ReadInput {
            path: input.to_path_buf(),
            source,
        })?;
    let html = decode_text(bytes, &input.display().to_string());

    let rewritten = HtmlRewriter::new(fetcher)
        .max_css_depth(config.max_css_depth())
        .rewrite(&html, &Base::for_document(input))
        .await?;

    let mut document = banner(config.generator(), &config.source_label());
    document.push_str(&rewritten.html);

    write_atomic(output, document.as_bytes().to_vec())
        .await
        .map_err(|source| BundleError::WriteOutput {
            path: output.to_path_buf(),
            source,
        })?;

    log::info!("✅ Generated: {}", output.display());

    Ok(BundleReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        bytes_written: document.len(),
        stats: rewritten.stats,
    })
}

/// [`build`] with a [`ResourceFetcher`] made from the config's fetch settings
pub async fn bundle(config: &BundleConfig) -> Result<BundleReport, BundleError> {
    let fetcher = ResourceFetcher::new(config.fetch().clone());
    build(config, &fetcher).await
}

/// One-line provenance comment placed before the document
#[must_use]
pub fn banner(generator: &str, source: &str) -> String {
    format!("<!-- AUTO-GENERATED by {generator} - edit {source} instead. -->\n")
}

async fn write_atomic(path: &Path, content: Vec<u8>) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent).await?;

    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        // Temp file in the destination directory so the rename stays on one filesystem
        let mut temp_file = NamedTempFile::new_in(&parent)?;
        temp_file.write_all(&content)?;
        temp_file.persist(&path).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(|e| std::io::Error::other(format!("write task failed: {e}")))?
}
