//! Flat-file export
//!
//! Writes a scope as plain `<name>.yml` files plus the file assets and their
//! index into a destination store, instead of an archive.

use crate::adapters::storage::factory::SourceStores;
use crate::adapters::storage::traits::{ConfigSource, ConfigTarget, FileRepository};
use crate::core::export::resolver::{SourceResolver, TypePolicy};
use crate::domain::{ExportScope, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Counts of a finished flat-file export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySummary {
    pub config_count: usize,
    pub file_count: usize,
    /// Config names that were listed but could not be read
    pub skipped: usize,
    pub duration: Duration,
}

impl DirectorySummary {
    /// Completion message shown to the user
    ///
    /// # Examples
    ///
    /// ```
    /// use sitepack::core::export::DirectorySummary;
    ///
    /// let summary = DirectorySummary { config_count: 12, file_count: 3, ..Default::default() };
    /// assert_eq!(summary.message(), "Exported 12 config and 3 non-config files.");
    /// ```
    pub fn message(&self) -> String {
        format!(
            "Exported {} config and {} non-config files.",
            self.config_count, self.file_count
        )
    }
}

/// Exports a scope into a [`ConfigTarget`]
pub struct DirectoryExporter {
    source: Arc<dyn ConfigSource + Send + Sync>,
    files: Arc<dyn FileRepository + Send + Sync>,
    resolver: SourceResolver,
}

impl DirectoryExporter {
    pub fn new(
        source: Arc<dyn ConfigSource + Send + Sync>,
        files: Arc<dyn FileRepository + Send + Sync>,
        resolver: SourceResolver,
    ) -> Self {
        Self {
            source,
            files,
            resolver,
        }
    }

    /// Exporter over a site's source stores
    pub fn from_stores(stores: SourceStores, policy: TypePolicy) -> Self {
        let resolver = SourceResolver::new(Arc::clone(&stores.config), stores.packages, policy);
        Self::new(stores.config, stores.files, resolver)
    }

    /// Delete every record of the target and of each of its collections
    pub async fn reset_target(&self, target: &dyn ConfigTarget) -> Result<()> {
        target.delete_all().await?;
        for collection in target.get_all_collection_names().await? {
            tracing::debug!(collection = %collection, "Clearing collection");
            target.create_collection(&collection).delete_all().await?;
        }
        Ok(())
    }

    /// Write every record of the scope, then its file assets and index
    ///
    /// The scope is resolved before anything is deleted, so a missing package
    /// leaves the target untouched. With `reset` the target is cleared first
    /// (see [`DirectoryExporter::reset_target`]).
    pub async fn export(
        &self,
        scope: &ExportScope,
        target: &dyn ConfigTarget,
        reset: bool,
    ) -> Result<DirectorySummary> {
        let start = Instant::now();
        let resolved = self.resolver.resolve_scope(scope).await?;
        if reset {
            self.reset_target(target).await?;
        }
        let mut summary = DirectorySummary::default();

        for name in resolved.list_all() {
            match self.source.read(name).await? {
                Some(record) => {
                    target.write(&record).await?;
                    summary.config_count += 1;
                }
                None => {
                    tracing::debug!(name = %name, "Record absent at export time, skipping");
                    summary.skipped += 1;
                }
            }
        }

        summary.file_count = target
            .export_files(resolved.storage_file_list(), self.files.as_ref())
            .await?;
        summary.duration = start.elapsed();

        crate::log_export_complete!(summary.config_count, summary.file_count, summary.duration);
        Ok(summary)
    }
}
