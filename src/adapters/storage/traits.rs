//! Storage abstraction traits
//!
//! This module defines the capabilities the export engine consumes. Each
//! trait is a narrow capability set; a concrete store implements whichever
//! of them it can serve.

use crate::core::state::marker::GenerationMarker;
use crate::domain::{ConfigName, ConfigRecord, FileAsset, FileUuid, PackageDefinition, PackageId};
use crate::domain::Result;
use async_trait::async_trait;
use std::path::Path;

/// Read side of a configuration store
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Every record name in the store, sorted
    async fn list_all(&self) -> Result<Vec<ConfigName>>;

    /// Read one record
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` when the record does not exist.
    async fn read(&self, name: &ConfigName) -> Result<Option<ConfigRecord>>;
}

/// Write side of a configuration store (flat-file export destination)
#[async_trait]
pub trait ConfigTarget: Send + Sync {
    /// Write one record, replacing any previous version
    async fn write(&self, record: &ConfigRecord) -> Result<()>;

    /// Delete every record of this collection
    async fn delete_all(&self) -> Result<()>;

    /// Names of the collections below this store
    async fn get_all_collection_names(&self) -> Result<Vec<String>>;

    /// A store scoped to the named collection
    fn create_collection(&self, name: &str) -> Box<dyn ConfigTarget>;

    /// Copy the given file assets next to the records and write the file index
    ///
    /// # Returns
    ///
    /// Returns the number of files exported.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SitepackError::AssetNotFound`] if an id does
    /// not resolve to an asset.
    async fn export_files(&self, files: &[FileUuid], repository: &dyn FileRepository)
        -> Result<usize>;
}

/// Lookup of file assets by UUID
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Load one asset
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if no asset has this UUID.
    async fn load(&self, uuid: &FileUuid) -> Result<Option<FileAsset>>;
}

/// Lookup of package definitions
#[async_trait]
pub trait PackageRepository: Send + Sync {
    /// Load one package definition
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if no package has this id.
    async fn load(&self, id: &PackageId) -> Result<Option<PackageDefinition>>;
}

/// State storage trait for generation marker persistence
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Load the marker of an artifact
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(marker))` if found, `Ok(None)` if not found.
    async fn load_marker(&self, artifact: &Path) -> Result<Option<GenerationMarker>>;

    /// Create or replace a marker
    async fn save_marker(&self, marker: &GenerationMarker) -> Result<()>;

    /// Remove the marker of an artifact; absence is not an error
    async fn clear_marker(&self, artifact: &Path) -> Result<()>;

    /// Get all markers from storage
    async fn all_markers(&self) -> Result<Vec<GenerationMarker>>;
}
