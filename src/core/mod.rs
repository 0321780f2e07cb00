//! Core business logic for Sitepack.
//!
//! This module contains the export engine.
//!
//! # Modules
//!
//! - [`encode`] - Deterministic YAML encoding of configuration records
//! - [`export`] - Resolution, batch planning, archive writing and orchestration
//! - [`state`] - Generation markers that serialize runs per artifact
//! - [`verification`] - Artifact checksums and completeness checks
//!
//! # Export Workflow
//!
//! 1. **Resolve**: Turn the scope into an ordered list of entries
//! 2. **Plan**: Split the entries into batches of `full_export_limit`
//! 3. **Open**: Replace any previous artifact with an empty archive
//! 4. **Write**: Append each batch, collecting the file index
//! 5. **Finalize**: Write the index member, close the streams, record the checksum
//!
//! # Example
//!
//! ```rust,no_run
//! use sitepack::config::load_config;
//! use sitepack::core::export::ExportCoordinator;
//! use sitepack::domain::ExportScope;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("sitepack.toml")?;
//!
//! let coordinator = ExportCoordinator::from_config(&config);
//! let summary = coordinator
//!     .run(&ExportScope::Full, &config.artifact_path(), config.export.full_export_limit)
//!     .await?;
//!
//! println!("Configs: {}", summary.config_count);
//! println!("Files: {}", summary.file_count);
//! println!("Batches: {}", summary.batch_count);
//! # Ok(())
//! # }
//! ```

pub mod encode;
pub mod export;
pub mod state;
pub mod verification;
