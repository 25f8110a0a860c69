//! Reference resolution
//!
//! Turns the raw text of a `src`, `href` or `url(...)` reference into an
//! absolute [`Location`] that the fetcher can retrieve. Resolution is a pure
//! function of the reference and the [`Base`] it was found in.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::utils::{normalize_path, strip_query_and_fragment};

/// Error types for reference resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    /// `//host/path` found somewhere with no scheme to inherit
    #[error("protocol-relative reference '{reference}' has no remote base to take a scheme from")]
    ProtocolRelative { reference: String },

    /// Reference uses a scheme we cannot fetch
    #[error("unsupported scheme '{scheme}' in reference '{reference}'")]
    UnsupportedScheme { reference: String, scheme: String },

    /// Reference could not be parsed or joined as a URL
    #[error("invalid URL reference '{reference}': {source}")]
    InvalidUrl {
        reference: String,
        #[source]
        source: url::ParseError,
    },

    /// `file:` URL that does not map to a local path
    #[error("file URL '{reference}' does not name a local path")]
    InvalidFileUrl { reference: String },
}

/// Absolute, fetchable form of a reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    Remote(Url),
    Local(PathBuf),
}

impl Location {
    /// Base context for references found inside the resource at this location.
    ///
    /// A remote resource resolves against its own URL, a local one against the
    /// directory it lives in.
    #[must_use]
    pub fn as_base(&self) -> Base {
        match self {
            Location::Remote(url) => Base::Remote(url.clone()),
            Location::Local(path) => Base::Local(
                path.parent()
                    .map_or_else(|| path.clone(), Path::to_path_buf),
            ),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Remote(url) => write!(f, "{url}"),
            Location::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// What a relative reference is resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base {
    /// URL of the document or stylesheet the reference was found in
    Remote(Url),
    /// Directory of the document or stylesheet the reference was found in
    Local(PathBuf),
}

impl Base {
    /// Base for a local document: the directory containing it
    #[must_use]
    pub fn for_document(path: &Path) -> Self {
        Location::Local(path.to_path_buf()).as_base()
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Base::Remote(url) => write!(f, "{url}"),
            Base::Local(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Resolve a raw reference against a base context.
///
/// - `http:`/`https:` references are used as-is
/// - `//host/path` inherits the scheme of a remote base, and fails for a local one
/// - `file:` URLs map to local paths, any other scheme is rejected
/// - everything else is relative: URL-joined against a remote base, or
///   path-joined against a local base directory (query and fragment dropped,
///   percent-escapes decoded, `.`/`..` collapsed)
pub fn resolve(reference: &str, base: &Base) -> Result<Location, LocateError> {
    let reference = reference.trim();

    if reference.starts_with("//") {
        return match base {
            Base::Remote(url) => {
                let absolute = format!("{}:{reference}", url.scheme());
                Url::parse(&absolute)
                    .map(Location::Remote)
                    .map_err(|source| LocateError::InvalidUrl {
                        reference: reference.to_string(),
                        source,
                    })
            }
            Base::Local(_) => Err(LocateError::ProtocolRelative {
                reference: reference.to_string(),
            }),
        };
    }

    match Url::parse(reference) {
        Ok(url) => match url.scheme() {
            "http" | "https" => return Ok(Location::Remote(url)),
            "file" => {
                return url
                    .to_file_path()
                    .map(|path| Location::Local(normalize_path(&path)))
                    .map_err(|()| LocateError::InvalidFileUrl {
                        reference: reference.to_string(),
                    });
            }
            // `C:\fonts\a.woff2` parses with scheme "c"; it is a path
            scheme if scheme.len() == 1 => {}
            scheme => {
                return Err(LocateError::UnsupportedScheme {
                    reference: reference.to_string(),
                    scheme: scheme.to_string(),
                });
            }
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => {}
        Err(source) => {
            return Err(LocateError::InvalidUrl {
                reference: reference.to_string(),
                source,
            });
        }
    }

    match base {
        Base::Remote(url) => url
            .join(reference)
            .map(Location::Remote)
            .map_err(|source| LocateError::InvalidUrl {
                reference: reference.to_string(),
                source,
            }),
        Base::Local(dir) => {
            let cleaned = strip_query_and_fragment(reference);
            let decoded = urlencoding::decode(cleaned).unwrap_or(Cow::Borrowed(cleaned));
            let path = Path::new(decoded.as_ref());
            let joined = if path.is_absolute() {
                path.to_path_buf()
            } else {
                dir.join(path)
            };
            Ok(Location::Local(normalize_path(&joined)))
        }
    }
}
