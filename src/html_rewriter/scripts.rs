//! Pass 1: external scripts become inline scripts.

use std::cell::RefCell;
use std::sync::LazyLock;

use lol_html::html_content::ContentType;
use lol_html::{Settings, element, text};
use regex::Regex;

use super::document::{self, decoded_attribute, external_reference, render_attributes};
use super::{HtmlRewriter, RewriteError, RewriteStats, provenance_comment};
use crate::fetcher::ResourceError;
use crate::locator::{Base, resolve};

// `<!--`, `<script` and `</script` in inlined code would either close the
// element early or switch the tokenizer into its double-escaped state
static SCRIPT_MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(!--|/?script)").expect("SCRIPT_MARKUP_RE: hardcoded regex is valid")
});

const SCRIPT_SELECTOR: &str = "script[src]";

const DROPPED_ATTRIBUTES: &[&str] = &["src", "integrity", "crossorigin"];

/// `<script src="..."></script>` with an empty body
struct ExternalScript {
    /// `src` as written in the document
    src: String,
    decoded_src: String,
    /// Remaining attributes, each with a leading space
    attributes: String,
}

impl HtmlRewriter<'_> {
    pub(super) async fn inline_scripts(
        &self,
        html: &str,
        base: &Base,
        stats: &mut RewriteStats,
    ) -> Result<String, RewriteError> {
        let scripts = find_external_scripts(html)?;
        if scripts.iter().all(Option::is_none) {
            return Ok(html.to_string());
        }

        let mut replacements = Vec::with_capacity(scripts.len());
        for script in scripts {
            let Some(script) = script else {
                replacements.push(None);
                continue;
            };

            replacements.push(Some(self.inline_script(&script, base).await?));
            stats.scripts_inlined += 1;
        }

        replace_scripts(html, replacements)
    }

    async fn inline_script(&self, script: &ExternalScript, base: &Base) -> Result<String, RewriteError> {
        let script_error = |source: ResourceError| RewriteError::Script {
            src: script.src.clone(),
            source,
        };

        let location = resolve(&script.decoded_src, base).map_err(|e| script_error(e.into()))?;
        let js = self
            .fetcher
            .fetch_text(&location)
            .await
            .map_err(|e| script_error(e.into()))?;

        log::info!("✓ inlined <script src=\"...\"> {} ({} bytes)", script.src, js.len());

        let mut replacement = provenance_comment(&script.src);
        replacement.push_str("<script");
        replacement.push_str(&script.attributes);
        replacement.push_str(">\n");
        replacement.push_str(&SCRIPT_MARKUP_RE.replace_all(&js, r"\x3C$1"));
        replacement.push_str("\n</script>");
        Ok(replacement)
    }
}

/// One entry per `script[src]` element in document order, `None` where the
/// element is not an inlinable external script
fn find_external_scripts(html: &str) -> Result<Vec<Option<ExternalScript>>, RewriteError> {
    // (candidate, has non-whitespace body)
    let found: RefCell<Vec<(Option<ExternalScript>, bool)>> = RefCell::new(Vec::new());

    document::run(
        html,
        Settings {
            element_content_handlers: vec![
                element!(SCRIPT_SELECTOR, |el| {
                    let script = external_reference(el.get_attribute("src")).map(|src| ExternalScript {
                        decoded_src: decoded_attribute(el, "src").unwrap_or_default(),
                        attributes: render_attributes(el, DROPPED_ATTRIBUTES),
                        src,
                    });
                    found.borrow_mut().push((script, false));
                    Ok(())
                }),
                text!(SCRIPT_SELECTOR, |chunk| {
                    if !chunk.as_str().trim().is_empty()
                        && let Some((_, has_body)) = found.borrow_mut().last_mut()
                    {
                        *has_body = true;
                    }
                    Ok(())
                }),
            ],
            ..Settings::default()
        },
    )?;

    Ok(found
        .into_inner()
        .into_iter()
        .map(|(script, has_body)| script.filter(|_| !has_body))
        .collect())
}

fn replace_scripts(html: &str, replacements: Vec<Option<String>>) -> Result<String, RewriteError> {
    let mut replacements = replacements.into_iter();

    document::run(
        html,
        Settings {
            element_content_handlers: vec![element!(SCRIPT_SELECTOR, |el| {
                if let Some(Some(replacement)) = replacements.next() {
                    el.replace(&replacement, ContentType::Html);
                }
                Ok(())
            })],
            ..Settings::default()
        },
    )
}
