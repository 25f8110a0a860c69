//! Pass 4: `integrity` and `crossorigin` are stripped from every start tag.
//!
//! Subresource integrity hashes describe the remote bytes, which are no longer
//! what the document loads.

use lol_html::{Settings, element};

use super::document;
use super::{RewriteError, RewriteStats};
use crate::utils::TRANSPORT_ATTRIBUTES;

pub(super) fn strip_transport_attributes(html: &str, stats: &mut RewriteStats) -> Result<String, RewriteError> {
    let mut stripped = 0;

    let html = document::run(
        html,
        Settings {
            element_content_handlers: vec![element!("*", |el| {
                for name in TRANSPORT_ATTRIBUTES {
                    if el.has_attribute(name) {
                        el.remove_attribute(name);
                        stripped += 1;
                    }
                }
                Ok(())
            })],
            ..Settings::default()
        },
    )?;

    stats.attributes_stripped += stripped;
    Ok(html)
}
