//! Domain models and types for Sitepack.
//!
//! This module contains the core domain types of a package export: identifiers,
//! entries, configuration records, file assets and package definitions, plus
//! the error taxonomy every layer reports through.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PackageId`], [`ConfigName`], [`FileUuid`])
//! - **Export units** ([`Entry`], [`EntryKind`], [`ExportScope`])
//! - **Payloads** ([`ConfigRecord`], [`FileAsset`], [`FileMetadata`])
//! - **Package definitions** ([`PackageDefinition`])
//! - **Error types** ([`SitepackError`]) and the [`Result`] alias
//!
//! # Type Safety
//!
//! Identifiers are newtypes, so a config name can never be passed where a file
//! UUID is expected:
//!
//! ```rust
//! use sitepack::domain::{ConfigName, FileUuid};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let name = ConfigName::new("cohesion_elements.component.hero")?;
//! let file = FileUuid::new("4b8f3a29-5d9c-4f87-aa95-84d7c3f51f6a")?;
//!
//! // let wrong: FileUuid = name;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, SitepackError>`]:
//!
//! ```rust,no_run
//! use sitepack::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = sitepack::config::load_config("sitepack.toml")?;
//!     Ok(())
//! }
//! ```

pub mod asset;
pub mod entry;
pub mod errors;
pub mod ids;
pub mod package;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use asset::{AssetContent, AssetReader, ExportIndex, FileAsset, FileMetadata, INDEX_FILE_NAME};
pub use entry::{Entry, EntryKind, ExportScope};
pub use errors::SitepackError;
pub use ids::{ConfigName, FileUuid, PackageId};
pub use package::{PackageDefinition, PackageMember};
pub use record::{ConfigRecord, PACKAGE_TYPE};
pub use result::Result;
