pub mod constants;
pub mod mime;
pub mod url_utils;

pub use constants::*;
pub use mime::{classify, data_uri};
pub use url_utils::{
    is_data_uri, is_web_font_stylesheet, normalize_path, strip_query_and_fragment,
};
