//! Pass 2: linked stylesheets become `data:text/css` links.

use std::cell::RefCell;

use lol_html::html_content::ContentType;
use lol_html::{Settings, element};

use super::document::{self, attribute_is, decoded_attribute, external_reference, render_attributes};
use super::{HtmlRewriter, RewriteError, RewriteStats, provenance_comment};
use crate::fetcher::ResourceError;
use crate::inline_css::inline_assets;
use crate::locator::{Base, Location, resolve};
use crate::utils::{data_uri, is_web_font_stylesheet};

const LINK_SELECTOR: &str = "link[href]";

const DROPPED_ATTRIBUTES: &[&str] = &["rel", "href", "integrity", "crossorigin"];

/// `<link rel="stylesheet" href="...">` pointing outside the document
struct LinkedStylesheet {
    /// `href` as written in the document
    href: String,
    decoded_href: String,
    /// Remaining attributes, each with a leading space
    attributes: String,
    self_closing: bool,
}

impl HtmlRewriter<'_> {
    pub(super) async fn inline_stylesheets(
        &self,
        html: &str,
        base: &Base,
        stats: &mut RewriteStats,
    ) -> Result<String, RewriteError> {
        let links = find_linked_stylesheets(html)?;
        if links.iter().all(Option::is_none) {
            return Ok(html.to_string());
        }

        let mut replacements = Vec::with_capacity(links.len());
        for link in links {
            let Some(link) = link else {
                replacements.push(None);
                continue;
            };

            replacements.push(Some(self.inline_stylesheet(&link, base, stats).await?));
            stats.stylesheets_inlined += 1;
        }

        replace_links(html, replacements)
    }

    async fn inline_stylesheet(
        &self,
        link: &LinkedStylesheet,
        base: &Base,
        stats: &mut RewriteStats,
    ) -> Result<String, RewriteError> {
        let href = link.href.as_str();
        let stylesheet_error = |source: ResourceError| RewriteError::Stylesheet {
            href: href.to_string(),
            source,
        };

        let location = resolve(&link.decoded_href, base).map_err(|e| stylesheet_error(e.into()))?;
        if let Location::Remote(url) = &location
            && is_web_font_stylesheet(url)
        {
            log::info!("→ web-font stylesheet {url}");
        }

        let css = self
            .fetcher
            .fetch_text(&location)
            .await
            .map_err(|e| stylesheet_error(e.into()))?;

        let inlining = inline_assets(&css, &location.as_base(), self.fetcher, self.max_css_depth).await;
        if inlining.has_failures() {
            log::warn!(
                "{} of {} assets in {href} left as external references",
                inlining.failures.len(),
                inlining.total()
            );
        }

        log::info!(
            "✓ inlined <link rel=\"stylesheet\"> {href} ({} bytes, {} assets)",
            inlining.css.len(),
            inlining.inlined
        );

        let mut replacement = provenance_comment(href);
        replacement.push_str("<link rel=\"stylesheet\"");
        replacement.push_str(&link.attributes);
        replacement.push_str(" href=\"");
        replacement.push_str(&data_uri("text/css", inlining.css.as_bytes()));
        replacement.push('"');
        if link.self_closing {
            replacement.push_str(" /");
        }
        replacement.push('>');

        stats.assets_inlined += inlining.inlined;
        stats.asset_failures.extend(inlining.failures);

        Ok(replacement)
    }
}

/// One entry per `link[href]` element in document order, `None` where the
/// link is not an external stylesheet
fn find_linked_stylesheets(html: &str) -> Result<Vec<Option<LinkedStylesheet>>, RewriteError> {
    let found = RefCell::new(Vec::new());

    document::run(
        html,
        Settings {
            element_content_handlers: vec![element!(LINK_SELECTOR, |el| {
                let link = external_reference(el.get_attribute("href"))
                    .filter(|_| attribute_is(el, "rel", "stylesheet"))
                    .map(|href| LinkedStylesheet {
                        decoded_href: decoded_attribute(el, "href").unwrap_or_default(),
                        attributes: render_attributes(el, DROPPED_ATTRIBUTES),
                        self_closing: el.is_self_closing(),
                        href,
                    });
                found.borrow_mut().push(link);
                Ok(())
            })],
            ..Settings::default()
        },
    )?;

    Ok(found.into_inner())
}

fn replace_links(html: &str, replacements: Vec<Option<String>>) -> Result<String, RewriteError> {
    let mut replacements = replacements.into_iter();

    document::run(
        html,
        Settings {
            element_content_handlers: vec![element!(LINK_SELECTOR, |el| {
                if let Some(Some(replacement)) = replacements.next() {
                    el.replace(&replacement, ContentType::Html);
                }
                Ok(())
            })],
            ..Settings::default()
        },
    )
}
