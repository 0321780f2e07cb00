//! Storage factory
//!
//! Builds the trait objects the export engine runs against from configuration.

use crate::adapters::filesystem::{DirectoryFileRepository, FileStorage, JsonStateStorage};
use crate::adapters::storage::packages::SourcePackageRepository;
use crate::adapters::storage::traits::{
    ConfigSource, FileRepository, PackageRepository, StateStorage,
};
use crate::config::SitepackConfig;
use std::sync::Arc;

/// The read-side stores of one site
#[derive(Clone)]
pub struct SourceStores {
    pub config: Arc<dyn ConfigSource + Send + Sync>,
    pub files: Arc<dyn FileRepository + Send + Sync>,
    pub packages: Arc<dyn PackageRepository + Send + Sync>,
}

/// Create the source stores described by the `[source]` section
pub fn create_source_stores(config: &SitepackConfig) -> SourceStores {
    tracing::info!(
        config_dir = %config.source.config_dir.display(),
        files_dir = %config.source.files_dir.display(),
        "Opening source stores"
    );

    let source: Arc<dyn ConfigSource + Send + Sync> =
        Arc::new(FileStorage::new(&config.source.config_dir));
    let files = Arc::new(DirectoryFileRepository::new(&config.source.files_dir));
    let packages = Arc::new(SourcePackageRepository::new(Arc::clone(&source)));

    SourceStores {
        config: source,
        files,
        packages,
    }
}

/// Create the generation marker store kept next to the artifacts
pub fn create_state_storage(config: &SitepackConfig) -> Arc<dyn StateStorage + Send + Sync> {
    Arc::new(JsonStateStorage::new(config.state_path()))
}
