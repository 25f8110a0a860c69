//! Type-safe builder for `BundleConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time validation
//! ensuring that the input and output paths are set before building a
//! `BundleConfig`.

use anyhow::{Context, Result, anyhow};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::types::{BundleConfig, BundleConfigFile};
use crate::fetcher::FetchConfig;
use crate::utils::{DEFAULT_GENERATOR, DEFAULT_MAX_CSS_DEPTH, normalize_path};

// Type states for the builder
pub struct WithInput;
pub struct WithOutput;

pub struct BundleConfigBuilder<State = ()> {
    pub(crate) input: Option<PathBuf>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) fetch: FetchConfig,
    pub(crate) max_css_depth: u8,
    pub(crate) generator: String,
    pub(crate) source_label: Option<String>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for BundleConfigBuilder<()> {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            fetch: FetchConfig::default(),
            max_css_depth: DEFAULT_MAX_CSS_DEPTH,
            generator: DEFAULT_GENERATOR.to_string(),
            source_label: None,
            _phantom: PhantomData,
        }
    }
}

impl BundleConfig {
    /// Create a builder for configuring a `BundleConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> BundleConfigBuilder<()> {
        BundleConfigBuilder::default()
    }
}

impl<State> BundleConfigBuilder<State> {
    fn into_state<Next>(self) -> BundleConfigBuilder<Next> {
        BundleConfigBuilder {
            input: self.input,
            output: self.output,
            fetch: self.fetch,
            max_css_depth: self.max_css_depth,
            generator: self.generator,
            source_label: self.source_label,
            _phantom: PhantomData,
        }
    }
}

impl BundleConfigBuilder<()> {
    pub fn input(mut self, path: impl Into<PathBuf>) -> BundleConfigBuilder<WithInput> {
        self.input = Some(path.into());
        self.into_state()
    }
}

impl BundleConfigBuilder<WithInput> {
    pub fn output(mut self, path: impl Into<PathBuf>) -> BundleConfigBuilder<WithOutput> {
        self.output = Some(path.into());
        self.into_state()
    }
}

impl BundleConfigBuilder<WithOutput> {
    /// Validate and build the configuration.
    ///
    /// Both paths are made absolute against the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if either path is empty, the input has no file name,
    /// or input and output are the same file.
    pub fn build(self) -> Result<BundleConfig> {
        let input = absolute(
            self.input
                .as_deref()
                .ok_or_else(|| anyhow!("input is required"))?,
            "input",
        )?;
        let output = absolute(
            self.output
                .as_deref()
                .ok_or_else(|| anyhow!("output is required"))?,
            "output",
        )?;

        if input.file_name().is_none() {
            return Err(anyhow!("input '{}' does not name a file", input.display()));
        }
        if input == output {
            return Err(anyhow!(
                "output '{}' would overwrite the input",
                output.display()
            ));
        }

        Ok(BundleConfig {
            input,
            output,
            fetch: self.fetch,
            max_css_depth: self.max_css_depth,
            generator: self.generator,
            source_label: self.source_label,
        })
    }
}

impl TryFrom<BundleConfigFile> for BundleConfig {
    type Error = anyhow::Error;

    fn try_from(file: BundleConfigFile) -> Result<Self> {
        let mut builder = BundleConfig::builder()
            .input(file.input)
            .output(file.output)
            .fetch_config(file.fetch)
            .max_css_depth(file.max_css_depth)
            .generator(file.generator);
        if let Some(label) = file.source_label {
            builder = builder.source_label(label);
        }
        builder.build()
    }
}

fn absolute(path: &Path, what: &str) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(anyhow!("{what} path is empty"));
    }
    let absolute = std::path::absolute(path)
        .with_context(|| format!("failed to make {what} path '{}' absolute", path.display()))?;
    Ok(normalize_path(&absolute))
}
