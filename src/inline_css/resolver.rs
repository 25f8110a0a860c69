//! `url(...)` asset embedding for stylesheets
//!
//! Every distinct reference in a stylesheet is resolved and fetched once, all
//! of them concurrently. Only after every fetch has finished are the successful
//! results written back, so the output never depends on completion order.
//! References that fail stay exactly as authored.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use regex::{Captures, Regex};

use super::types::{AssetFailure, CssInlining};
use crate::fetcher::{Fetch, ResourceError};
use crate::locator::{Base, resolve};
use crate::utils::{classify, data_uri, is_data_uri};

// url("a"), url('a') or url(a), no nested parentheses
static CSS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^)"']*))\s*\)"#)
        .expect("CSS_URL_RE: hardcoded regex is valid")
});

const CSS_MIME: &str = "text/css";

/// Inline every `url(...)` asset of a stylesheet as a base64 data URI.
///
/// `base` is the stylesheet's own base context. Assets that are themselves
/// stylesheets (`@import url(...)`) get their assets inlined first, up to
/// `max_depth` levels below this one.
pub async fn inline_assets(css: &str, base: &Base, fetcher: &dyn Fetch, max_depth: u8) -> CssInlining {
    inline_assets_at_depth(css, base, fetcher, 0, max_depth).await
}

fn inline_assets_at_depth<'a>(
    css: &'a str,
    base: &'a Base,
    fetcher: &'a dyn Fetch,
    depth: u8,
    max_depth: u8,
) -> BoxFuture<'a, CssInlining> {
    async move {
        let references = distinct_references(css);
        if references.is_empty() {
            return CssInlining {
                css: css.to_string(),
                ..CssInlining::default()
            };
        }

        log::debug!(
            "Found {} distinct url(...) references (depth {depth}, base {base})",
            references.len()
        );

        let downloads = references.into_iter().map(|raw| async move {
            let result = embed_asset(raw, base, fetcher, depth, max_depth).await;
            (raw, result)
        });

        // Fan-in barrier: nothing is written back until every fetch is done
        let results = join_all(downloads).await;

        let mut replacements: HashMap<&str, String> = HashMap::new();
        let mut inlined = 0;
        let mut failures = Vec::new();

        for (raw, result) in results {
            match result {
                Ok(asset) => {
                    log::info!(
                        "  ✓ inlined asset {raw} → {} ({:.1}KB)",
                        asset.mime,
                        asset.size as f64 / 1024.0
                    );
                    inlined += 1 + asset.nested_inlined;
                    failures.extend(asset.nested_failures);
                    replacements.insert(raw, format!("url({})", asset.data_uri));
                }
                Err(failure) => {
                    log::warn!(
                        "  ! failed to inline {raw} ({}): {}",
                        failure.location.as_deref().unwrap_or("unresolved"),
                        failure.error
                    );
                    failures.push(failure);
                }
            }
        }

        let rewritten = CSS_URL_RE.replace_all(css, |caps: &Captures| {
            replacements
                .get(raw_reference(caps))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        });

        CssInlining {
            css: rewritten.into_owned(),
            inlined,
            failures,
        }
    }
    .boxed()
}

/// Embedded form of one asset
struct EmbeddedAsset {
    data_uri: String,
    mime: &'static str,
    size: usize,
    nested_inlined: usize,
    nested_failures: Vec<AssetFailure>,
}

async fn embed_asset(
    raw: &str,
    base: &Base,
    fetcher: &dyn Fetch,
    depth: u8,
    max_depth: u8,
) -> Result<EmbeddedAsset, AssetFailure> {
    let location = resolve(raw, base).map_err(|e| AssetFailure {
        reference: raw.to_string(),
        location: None,
        error: ResourceError::from(e).to_string(),
    })?;

    let mut bytes = fetcher
        .fetch_bytes(&location)
        .await
        .map_err(|e| AssetFailure {
            reference: raw.to_string(),
            location: Some(location.to_string()),
            error: ResourceError::from(e).to_string(),
        })?;

    let mime = classify(&location.to_string());
    let mut nested_inlined = 0;
    let mut nested_failures = Vec::new();

    if mime == CSS_MIME && depth < max_depth {
        match String::from_utf8(bytes) {
            Ok(nested_css) => {
                let nested =
                    inline_assets_at_depth(&nested_css, &location.as_base(), fetcher, depth + 1, max_depth)
                        .await;
                nested_inlined = nested.inlined;
                nested_failures = nested.failures;
                bytes = nested.css.into_bytes();
            }
            // Not text after all, embed the bytes untouched
            Err(e) => bytes = e.into_bytes(),
        }
    }

    Ok(EmbeddedAsset {
        data_uri: data_uri(mime, &bytes),
        mime,
        size: bytes.len(),
        nested_inlined,
        nested_failures,
    })
}

/// Distinct raw references worth fetching, in first-seen order
fn distinct_references(css: &str) -> Vec<&str> {
    let mut seen = HashSet::new();

    CSS_URL_RE
        .captures_iter(css)
        .map(|caps| raw_reference(&caps))
        .filter(|raw| is_fetchable(raw))
        .filter(|raw| seen.insert(*raw))
        .collect()
}

fn raw_reference<'h>(caps: &Captures<'h>) -> &'h str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map_or("", |m| m.as_str().trim())
}

fn is_fetchable(raw: &str) -> bool {
    !raw.is_empty() && !raw.starts_with('#') && !is_data_uri(raw)
}
