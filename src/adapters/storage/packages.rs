//! Package definitions read from a configuration source

use super::traits::{ConfigSource, PackageRepository};
use crate::domain::{PackageDefinition, PackageId, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Looks up `sitepack.package.<id>` records in a configuration source
pub struct SourcePackageRepository {
    source: Arc<dyn ConfigSource + Send + Sync>,
}

impl SourcePackageRepository {
    pub fn new(source: Arc<dyn ConfigSource + Send + Sync>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl PackageRepository for SourcePackageRepository {
    async fn load(&self, id: &PackageId) -> Result<Option<PackageDefinition>> {
        let name = id
            .config_name()
            .parse()
            .map_err(crate::domain::SitepackError::Validation)?;

        match self.source.read(&name).await? {
            Some(record) if record.is_package() => {
                PackageDefinition::from_record(id.clone(), &record).map(Some)
            }
            Some(record) => {
                tracing::warn!(
                    package = %id,
                    record_type = record.record_type().unwrap_or("<none>"),
                    "Record exists but is not a package definition"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
