//! Streaming helpers shared by the rewrite passes.
//!
//! Every pass runs `lol_html` over the whole document. Bytes outside the
//! elements a handler touches are emitted unchanged.

use std::borrow::Cow;

use lol_html::html_content::Element;
use lol_html::{HtmlRewriter, Settings};

use super::RewriteError;

/// Run one `lol_html` pass over `html`
pub(super) fn run(html: &str, settings: Settings<'_, '_>) -> Result<String, RewriteError> {
    let mut output = Vec::with_capacity(html.len());

    let mut rewriter = HtmlRewriter::new(settings, |c: &[u8]| output.extend_from_slice(c));
    rewriter.write(html.as_bytes())?;
    rewriter.end()?;

    Ok(String::from_utf8(output)?)
}

/// Attribute value with character references decoded
pub(super) fn decoded_attribute(el: &Element<'_, '_>, name: &str) -> Option<String> {
    el.get_attribute(name)
        .map(|value| html_escape::decode_html_entities(&value).into_owned())
}

/// `true` if the attribute equals `expected` after trimming, ignoring ASCII case
pub(super) fn attribute_is(el: &Element<'_, '_>, name: &str, expected: &str) -> bool {
    el.get_attribute(name)
        .is_some_and(|value| value.trim().eq_ignore_ascii_case(expected))
}

/// Non-empty reference that still points somewhere other than a `data:` URI
pub(super) fn external_reference(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && !crate::utils::is_data_uri(v)
    })
}

/// Render every attribute not in `excluded` as ` name="value"`.
///
/// Empty values render as a bare name, so `defer` stays `defer`.
pub(super) fn render_attributes(el: &Element<'_, '_>, excluded: &[&str]) -> String {
    let mut rendered = String::new();

    for attr in el.attributes() {
        let name = attr.name();
        if excluded.iter().any(|ex| name.eq_ignore_ascii_case(ex)) {
            continue;
        }

        rendered.push(' ');
        rendered.push_str(&name);

        let value = attr.value();
        if !value.is_empty() {
            let decoded = html_escape::decode_html_entities(&value);
            let quoted: Cow<'_, str> = html_escape::encode_double_quoted_attribute(&decoded);
            rendered.push_str("=\"");
            rendered.push_str(&quoted);
            rendered.push('"');
        }
    }

    rendered
}
