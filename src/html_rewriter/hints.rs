//! Pass 3: `preconnect` and `dns-prefetch` hints are removed.
//!
//! An offline document never connects anywhere, so the hints are dead weight.

use lol_html::{Settings, element};

use super::document::{self, attribute_is};
use super::{RewriteError, RewriteStats};
use crate::utils::RESOURCE_HINT_RELS;

pub(super) fn remove_resource_hints(html: &str, stats: &mut RewriteStats) -> Result<String, RewriteError> {
    let mut removed = 0;

    let html = document::run(
        html,
        Settings {
            element_content_handlers: vec![element!("link[rel]", |el| {
                if RESOURCE_HINT_RELS.iter().any(|rel| attribute_is(el, "rel", rel)) {
                    el.remove();
                    removed += 1;
                }
                Ok(())
            })],
            ..Settings::default()
        },
    )?;

    if removed > 0 {
        log::debug!("Removed {removed} resource hints");
    }
    stats.hints_removed += removed;

    Ok(html)
}
