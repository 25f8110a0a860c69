//! Extension-based MIME classification and data URI encoding.

use base64::Engine;

/// Fallback for anything we do not recognize
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Classify a location (URL or path) by its trailing file extension.
///
/// Query and fragment are stripped first, then the extension of the last path
/// segment is compared case-insensitively. Only the data URI header depends on
/// this; the embedded bytes are the same either way.
#[must_use]
pub fn classify(location: &str) -> &'static str {
    let without_fragment = location.split('#').next().unwrap_or_default();
    let path = without_fragment.split('?').next().unwrap_or_default();
    let segment = path.rsplit(['/', '\\']).next().unwrap_or_default();

    let Some((_, ext)) = segment.rsplit_once('.') else {
        return OCTET_STREAM;
    };

    match ext.to_ascii_lowercase().as_str() {
        "woff2" => "font/woff2",
        "woff" => "font/woff",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "svg" => "image/svg+xml",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        _ => OCTET_STREAM,
    }
}

/// Encode bytes as a `data:<mime>;base64,<payload>` URI
#[must_use]
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    let encoded_capacity = base64::encoded_len(bytes.len(), true).unwrap_or(0);
    let mut encoded = String::with_capacity(encoded_capacity + 14 + mime.len());

    encoded.push_str("data:");
    encoded.push_str(mime);
    encoded.push_str(";base64,");

    base64::engine::general_purpose::STANDARD.encode_string(bytes, &mut encoded);

    encoded
}
