//! Command-line interface definitions.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use crate::config::BundleConfig;
use crate::utils::DEV_FILE_INFIX;

/// Bundle an HTML page and everything it links into one offline file
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Source HTML document
    #[arg(value_name = "INPUT", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output path (default: INPUT without its `.dev` infix, or `<stem>.offline.html`)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Refuse any single resource larger than this many bytes
    #[arg(long, value_name = "N")]
    pub max_resource_bytes: Option<usize>,

    /// Levels of `@import url(...)` to follow inside stylesheets
    #[arg(long, value_name = "N")]
    pub max_css_depth: Option<u8>,

    /// Print a JSON report of the run to stdout
    #[arg(long)]
    pub report: bool,
}

impl Cli {
    /// Build the bundle configuration these arguments describe
    ///
    /// # Errors
    ///
    /// Returns an error if the paths are invalid or input and output coincide.
    pub fn to_config(&self) -> Result<BundleConfig> {
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output(&self.input));

        let mut builder = BundleConfig::builder().input(&self.input).output(output);
        if let Some(secs) = self.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(bytes) = self.max_resource_bytes {
            builder = builder.max_resource_bytes(bytes);
        }
        if let Some(depth) = self.max_css_depth {
            builder = builder.max_css_depth(depth);
        }

        builder.build()
    }
}

/// Output path next to `input`: `index.dev.html` becomes `index.html`,
/// anything else `<stem>.offline.html`
#[must_use]
pub fn default_output(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = match file_name.rfind(DEV_FILE_INFIX) {
        Some(idx)
            if idx > 0
                && file_name[idx + DEV_FILE_INFIX.len()..]
                    .chars()
                    .next()
                    .is_none_or(|c| c == '.') =>
        {
            format!(
                "{}{}",
                &file_name[..idx],
                &file_name[idx + DEV_FILE_INFIX.len()..]
            )
        }
        _ => {
            let stem = input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("{stem}.offline.html")
        }
    };

    input.with_file_name(name)
}
