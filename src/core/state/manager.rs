//! State manager for generation markers
//!
//! Serializes runs that target the same artifact: a run registers itself
//! with [`StateManager::begin_generation`] and reports its outcome before it
//! returns.

use crate::adapters::storage::traits::StateStorage;
use crate::core::state::marker::{GenerationMarker, GenerationMarkerBuilder};
use crate::domain::{Result, SitepackError};
use std::path::Path;
use std::sync::Arc;

/// State manager for generation marker persistence
pub struct StateManager {
    storage: Arc<dyn StateStorage + Send + Sync>,
}

impl StateManager {
    /// Create a new StateManager with a state storage backend
    pub fn new_with_storage(storage: Arc<dyn StateStorage + Send + Sync>) -> Self {
        Self { storage }
    }

    /// Load the marker of an artifact
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(marker))` if found, `Ok(None)` if the artifact was
    /// never generated.
    pub async fn load_marker(&self, artifact: &Path) -> Result<Option<GenerationMarker>> {
        self.storage.load_marker(artifact).await
    }

    /// Get all markers known to the store
    pub async fn get_all_markers(&self) -> Result<Vec<GenerationMarker>> {
        self.storage.all_markers().await
    }

    /// Register a new run for an artifact
    ///
    /// # Errors
    ///
    /// Returns [`SitepackError::GenerationInProgress`] if another run holds
    /// the marker and `force` is not set.
    pub async fn begin_generation(&self, artifact: &Path, force: bool) -> Result<GenerationMarker> {
        let mut marker = match self.storage.load_marker(artifact).await? {
            Some(existing) if existing.is_in_progress() && !force => {
                return Err(SitepackError::GenerationInProgress(
                    artifact.display().to_string(),
                ));
            }
            Some(existing) => {
                if existing.is_in_progress() {
                    tracing::warn!(
                        artifact = %artifact.display(),
                        started_at = ?existing.started_at,
                        "Overriding stale in-progress marker"
                    );
                }
                existing
            }
            None => GenerationMarkerBuilder::new(artifact).build(),
        };

        marker.mark_started();
        self.storage.save_marker(&marker).await?;

        tracing::debug!(artifact = %artifact.display(), "Generation marker set");
        Ok(marker)
    }

    /// Record a successful run
    pub async fn complete_generation(
        &self,
        marker: &mut GenerationMarker,
        checksum: String,
        artifact_size: u64,
    ) -> Result<()> {
        marker.mark_completed(checksum, artifact_size);
        self.storage.save_marker(marker).await
    }

    /// Record a failed or interrupted run
    pub async fn fail_generation(
        &self,
        marker: &mut GenerationMarker,
        reason: impl Into<String>,
    ) -> Result<()> {
        marker.mark_failed(reason);
        self.storage.save_marker(marker).await
    }

    /// Forget an artifact after it was removed
    pub async fn clear_generation(&self, artifact: &Path) -> Result<()> {
        self.storage.clear_marker(artifact).await
    }
}
