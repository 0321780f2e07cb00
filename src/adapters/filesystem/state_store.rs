//! JSON-file generation marker store
//!
//! All markers live in one JSON object keyed by artifact path. Writes go to
//! a sibling temporary file that is then renamed over the store.

use crate::adapters::storage::traits::StateStorage;
use crate::core::state::marker::GenerationMarker;
use crate::domain::{Result, SitepackError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

type MarkerMap = BTreeMap<String, GenerationMarker>;

/// Marker store backed by a JSON file
#[derive(Debug)]
pub struct JsonStateStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonStateStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<MarkerMap> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(MarkerMap::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                SitepackError::State(format!(
                    "Corrupt state file {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(MarkerMap::new()),
            Err(e) => Err(SitepackError::State(format!(
                "Failed to read state file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write_all(&self, markers: &MarkerMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(markers)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, contents).await?;
        tokio::fs::rename(&staging, &self.path).await.map_err(|e| {
            SitepackError::State(format!(
                "Failed to replace state file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl StateStorage for JsonStateStorage {
    async fn load_marker(&self, artifact: &Path) -> Result<Option<GenerationMarker>> {
        let _guard = self.lock.lock().await;
        let mut markers = self.read_all().await?;
        Ok(markers.remove(&GenerationMarker::key_for(artifact)))
    }

    async fn save_marker(&self, marker: &GenerationMarker) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut markers = self.read_all().await?;
        markers.insert(marker.key(), marker.clone());
        self.write_all(&markers).await
    }

    async fn clear_marker(&self, artifact: &Path) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut markers = self.read_all().await?;
        if markers.remove(&GenerationMarker::key_for(artifact)).is_some() {
            self.write_all(&markers).await?;
        }
        Ok(())
    }

    async fn all_markers(&self) -> Result<Vec<GenerationMarker>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::marker::{GenerationMarkerBuilder, GenerationStatus};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let storage = JsonStateStorage::new(dir.path().join("nested").join("state.json"));
        let artifact = dir.path().join("site.tar.gz");

        assert!(storage.load_marker(&artifact).await.unwrap().is_none());

        let marker = GenerationMarkerBuilder::new(&artifact)
            .status(GenerationStatus::Completed)
            .checksum("abc")
            .build();
        storage.save_marker(&marker).await.unwrap();

        let loaded = storage.load_marker(&artifact).await.unwrap().unwrap();
        assert_eq!(loaded.status, GenerationStatus::Completed);
        assert_eq!(loaded.checksum.as_deref(), Some("abc"));
        assert_eq!(storage.all_markers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_markers_are_keyed_by_artifact() {
        let dir = TempDir::new().unwrap();
        let storage = JsonStateStorage::new(dir.path().join("state.json"));

        for name in ["a.tar.gz", "b.tar.gz"] {
            let marker = GenerationMarkerBuilder::new(dir.path().join(name)).build();
            storage.save_marker(&marker).await.unwrap();
        }
        storage.clear_marker(&dir.path().join("a.tar.gz")).await.unwrap();

        let remaining = storage.all_markers().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].artifact_path, dir.path().join("b.tar.gz"));
    }

    #[tokio::test]
    async fn test_clear_missing_marker_is_ok() {
        let dir = TempDir::new().unwrap();
        let storage = JsonStateStorage::new(dir.path().join("state.json"));
        storage.clear_marker(&dir.path().join("x")).await.unwrap();
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_state_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = JsonStateStorage::new(&path);
        let err = storage.all_markers().await.unwrap_err();
        assert!(matches!(err, SitepackError::State(_)));
    }
}
