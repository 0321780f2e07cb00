// Sitepack - Site configuration package exporter
// Copyright (c) 2025 Sitepack Contributors
// Licensed under the MIT License

//! # Sitepack - Site configuration package exporter
//!
//! Sitepack exports the configuration of a site, either one named package or
//! the whole site, as a portable gzip tar archive or as flat files in a sync
//! directory.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resolving** a scope into an ordered list of config records and file assets
//! - **Encoding** records as deterministic YAML, with embedded JSON pretty-printed
//! - **Batching** entries so a large export never holds more than one asset in memory
//! - **Archiving** the entries, with a file index written last as the completeness marker
//! - **Tracking** one generation marker per artifact so runs never overlap
//!
//! ## Architecture
//!
//! Sitepack follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (encode, export, state, verification)
//! - [`adapters`] - Storage capabilities and their filesystem implementations
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sitepack::config::load_config;
//! use sitepack::core::export::ExportCoordinator;
//! use sitepack::domain::ExportScope;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("sitepack.toml")?;
//!
//!     let coordinator = ExportCoordinator::from_config(&config);
//!     let summary = coordinator
//!         .run(&ExportScope::Full, &config.artifact_path(), config.export.full_export_limit)
//!         .await?;
//!
//!     println!("Exported {} configs and {} files", summary.config_count, summary.file_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Step-wise Runs
//!
//! A job runner that schedules each batch separately drives the same run
//! through its steps:
//!
//! ```rust,no_run
//! use sitepack::core::export::ExportCoordinator;
//! use sitepack::domain::{ExportScope, PackageId};
//! # use sitepack::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let config = load_config("sitepack.toml")?;
//! let coordinator = ExportCoordinator::from_config(&config);
//! let scope = ExportScope::Named(PackageId::new("landing")?);
//!
//! let mut state = coordinator.prepare(&scope, &config.artifact_path(), 10).await?;
//! while let Some(result) = coordinator.process_next_batch(&mut state).await? {
//!     println!("{}", result.message);
//! }
//! let summary = coordinator.finish(state).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Sitepack uses the [`domain::SitepackError`] type for all errors:
//!
//! ```rust,no_run
//! use sitepack::domain::SitepackError;
//!
//! fn example() -> Result<(), SitepackError> {
//!     let config = sitepack::config::load_config("sitepack.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
