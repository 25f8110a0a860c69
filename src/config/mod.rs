//! Configuration module for offline bundling
//!
//! This module provides the `BundleConfig` struct and its type-safe builder
//! for configuring a bundle run with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{BundleConfigBuilder, WithInput, WithOutput};
pub use types::{BundleConfig, BundleConfigFile};
