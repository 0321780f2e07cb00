//! Configuration management for Sitepack.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Sitepack uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SITEPACK_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sitepack::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("sitepack.toml")?;
//!
//! println!("Artifact: {}", config.artifact_path().display());
//! println!("Batch size: {}", config.export.full_export_limit);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`SiteConfig`] - Site name, which names the artifact
//! - [`SourceConfig`] - Config record and file asset directories
//! - [`ExportConfig`] - Batch size, artifact location, exclusions
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [site]
//! name = "My Site"
//!
//! [source]
//! config_dir = "./config"
//! files_dir = "./files"
//!
//! [export]
//! full_export_limit = 10
//! temp_dir = "/tmp/sitepack"
//! excluded_types = ["custom_style_type"]
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, resolve_config_path};
pub use schema::{
    ApplicationConfig, ExportConfig, LoggingConfig, SiteConfig, SitepackConfig, SourceConfig,
};
