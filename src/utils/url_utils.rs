//! URL and path manipulation utilities.
//!
//! Helpers shared by the locator and the rewrite passes for classifying
//! reference strings and normalizing filesystem paths without touching disk.

use std::path::{Component, Path, PathBuf};
use url::Url;

use super::constants::WEB_FONT_CSS_HOSTS;

/// Check if a reference is already an inline `data:` URI
#[must_use]
pub fn is_data_uri(reference: &str) -> bool {
    reference
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("data:"))
}

/// Check if a URL belongs to a web-font CSS service (Google Fonts and friends)
#[must_use]
pub fn is_web_font_stylesheet(url: &Url) -> bool {
    url.host_str()
        .is_some_and(|host| WEB_FONT_CSS_HOSTS.iter().any(|h| host.eq_ignore_ascii_case(h)))
}

/// Collapse `.` and `..` components of a path lexically.
///
/// No filesystem access and no symlink resolution. `..` above the root of an
/// absolute path is dropped; above the start of a relative path it is kept.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) && normalized.pop();

                if !popped && !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// Strip `?query` and `#fragment` suffixes from a local reference
#[must_use]
pub fn strip_query_and_fragment(reference: &str) -> &str {
    let end = reference.find(['?', '#']).unwrap_or(reference.len());
    &reference[..end]
}
