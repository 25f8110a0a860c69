pub mod cli;
pub mod config;
pub mod fetcher;
pub mod html_rewriter;
pub mod inline_css;
pub mod locator;
pub mod pipeline;
pub mod utils;

pub use config::BundleConfig;
pub use fetcher::{Fetch, FetchConfig, FetchError, ResourceError, ResourceFetcher};
pub use html_rewriter::{HtmlRewriter, RewriteError, RewriteStats, Rewritten};
pub use inline_css::{AssetFailure, CssInlining, inline_assets};
pub use locator::{Base, LocateError, Location, resolve};
pub use pipeline::{BundleError, BundleReport, build, bundle};
