//! Stylesheet asset inlining
//!
//! This module embeds the fonts, images and nested stylesheets a CSS file
//! references through `url(...)`, turning each into a base64 data URI so the
//! stylesheet no longer needs the network.

pub mod resolver;
pub mod types;

pub use resolver::inline_assets;
pub use types::{AssetFailure, CssInlining};
