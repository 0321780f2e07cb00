//! Directory-backed configuration store
//!
//! Each record is a `<name>.yml` file directly in the store's directory.
//! Collections are subdirectories holding their own records. The same store
//! serves as an export source and as a flat-file export destination.

use crate::adapters::storage::traits::{ConfigSource, ConfigTarget, FileRepository};
use crate::core::encode::RecordEncoder;
use crate::domain::{
    ConfigName, ConfigRecord, ExportIndex, FileUuid, Result, SitepackError, INDEX_FILE_NAME,
};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

const RECORD_EXTENSION: &str = "yml";

/// Configuration store rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
    encoder: RecordEncoder,
}

impl FileStorage {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            encoder: RecordEncoder::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file holding a record
    pub fn record_path(&self, name: &ConfigName) -> PathBuf {
        self.directory.join(name.member_name())
    }

    /// Whether the directory holds anything at all
    pub async fn is_empty(&self) -> Result<bool> {
        match fs::read_dir(&self.directory).await {
            Ok(mut entries) => Ok(entries.next_entry().await?.is_none()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(storage_error(&self.directory, e)),
        }
    }

    async fn record_files(&self) -> Result<Vec<(ConfigName, PathBuf)>> {
        let mut entries = match fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(&self.directory, e)),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match ConfigName::new(stem) {
                Ok(name) => records.push((name, path)),
                Err(reason) => {
                    tracing::warn!(path = %path.display(), %reason, "Skipping unreadable record file")
                }
            }
        }
        records.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(records)
    }
}

#[async_trait]
impl ConfigSource for FileStorage {
    async fn list_all(&self) -> Result<Vec<ConfigName>> {
        Ok(self
            .record_files()
            .await?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    async fn read(&self, name: &ConfigName) -> Result<Option<ConfigRecord>> {
        let path = self.record_path(name);
        match fs::read_to_string(&path).await {
            Ok(contents) => ConfigRecord::from_yaml(name.clone(), &contents).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&path, e)),
        }
    }
}

#[async_trait]
impl ConfigTarget for FileStorage {
    async fn write(&self, record: &ConfigRecord) -> Result<()> {
        let encoded = self.encoder.encode(record)?;
        fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| storage_error(&self.directory, e))?;

        let path = self.record_path(record.name());
        fs::write(&path, encoded)
            .await
            .map_err(|e| storage_error(&path, e))
    }

    async fn delete_all(&self) -> Result<()> {
        for (_, path) in self.record_files().await? {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(SitepackError::DeleteFailed {
                        path,
                        message: e.to_string(),
                    })
                }
            }
        }
        tracing::debug!(directory = %self.directory.display(), "Deleted all records");
        Ok(())
    }

    async fn get_all_collection_names(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(&self.directory, e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn create_collection(&self, name: &str) -> Box<dyn ConfigTarget> {
        Box::new(FileStorage::new(self.directory.join(name)))
    }

    async fn export_files(
        &self,
        files: &[FileUuid],
        repository: &dyn FileRepository,
    ) -> Result<usize> {
        fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| storage_error(&self.directory, e))?;

        let mut index = ExportIndex::new();
        for uuid in files {
            let asset = repository
                .load(uuid)
                .await?
                .ok_or_else(|| SitepackError::AssetNotFound(uuid.to_string()))?;

            let destination = self.directory.join(&asset.filename);
            let metadata = asset.metadata.clone();
            tokio::task::spawn_blocking(move || -> io::Result<u64> {
                let mut handle = asset.open()?;
                let mut out = std::fs::File::create(&destination)?;
                io::copy(&mut handle.reader, &mut out)
            })
            .await
            .map_err(|e| SitepackError::Storage(format!("File copy task failed: {e}")))??;

            index.insert(*uuid, metadata);
        }

        let index_path = self.directory.join(INDEX_FILE_NAME);
        fs::write(&index_path, index.to_pretty_json()?)
            .await
            .map_err(|e| storage_error(&index_path, e))?;

        Ok(index.len())
    }
}

fn storage_error(path: &Path, err: io::Error) -> SitepackError {
    SitepackError::Storage(format!("{}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetContent, FileAsset, FileMetadata};
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct MapRepository(HashMap<FileUuid, FileAsset>);

    #[async_trait]
    impl FileRepository for MapRepository {
        async fn load(&self, uuid: &FileUuid) -> Result<Option<FileAsset>> {
            Ok(self.0.get(uuid).cloned())
        }
    }

    fn name(s: &str) -> ConfigName {
        ConfigName::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        let record = ConfigRecord::from_yaml(name("system.site"), "name: Demo\n").unwrap();
        storage.write(&record).await.unwrap();

        assert_eq!(storage.list_all().await.unwrap(), vec![name("system.site")]);
        let read = storage.read(&name("system.site")).await.unwrap().unwrap();
        assert_eq!(read.get_str("name"), Some("Demo"));
        assert!(storage.read(&name("missing.record")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_is_sorted_and_ignores_other_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.type.two.yml"), "a: 1").unwrap();
        std::fs::write(dir.path().join("a.type.one.yml"), "a: 1").unwrap();
        std::fs::write(dir.path().join("logo.png"), b"png").unwrap();
        std::fs::create_dir(dir.path().join("collection")).unwrap();

        let storage = FileStorage::new(dir.path());
        assert_eq!(
            storage.list_all().await.unwrap(),
            vec![name("a.type.one"), name("b.type.two")]
        );
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("absent"));
        assert!(storage.list_all().await.unwrap().is_empty());
        assert!(storage.is_empty().await.unwrap());
        assert!(storage.get_all_collection_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_all_keeps_non_records_and_collections() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.b.c.yml"), "a: 1").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep").unwrap();
        std::fs::create_dir(dir.path().join("language")).unwrap();
        std::fs::write(dir.path().join("language").join("x.y.yml"), "a: 1").unwrap();

        let storage = FileStorage::new(dir.path());
        storage.delete_all().await.unwrap();

        assert!(!dir.path().join("a.b.c.yml").exists());
        assert!(dir.path().join("notes.txt").exists());
        assert_eq!(
            storage.get_all_collection_names().await.unwrap(),
            vec!["language".to_string()]
        );

        storage.create_collection("language").delete_all().await.unwrap();
        assert!(!dir.path().join("language").join("x.y.yml").exists());
    }

    #[tokio::test]
    async fn test_export_files_writes_blobs_and_index() {
        let dir = TempDir::new().unwrap();
        let uuid = FileUuid::new("4b8f3a29-5d9c-4f87-aa95-84d7c3f51f6a").unwrap();
        let mut fields = BTreeMap::new();
        fields.insert("filename".to_string(), serde_json::json!("logo.png"));
        let asset = FileAsset {
            uuid,
            filename: "logo.png".to_string(),
            created: 1_700_000_000,
            content: AssetContent::Inline(Arc::from(&b"png-bytes"[..])),
            metadata: FileMetadata::new(&uuid, fields),
        };
        let repository = MapRepository(HashMap::from([(uuid, asset)]));

        let storage = FileStorage::new(dir.path());
        let count = storage.export_files(&[uuid], &repository).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(std::fs::read(dir.path().join("logo.png")).unwrap(), b"png-bytes");
        let index: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(INDEX_FILE_NAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(
            index[uuid.to_string()]["file_dependency_name"],
            serde_json::json!(uuid.dependency_name())
        );
    }

    #[tokio::test]
    async fn test_export_files_missing_asset() {
        let dir = TempDir::new().unwrap();
        let uuid = FileUuid::new("4b8f3a29-5d9c-4f87-aa95-84d7c3f51f6a").unwrap();
        let repository = MapRepository(HashMap::new());

        let err = FileStorage::new(dir.path())
            .export_files(&[uuid], &repository)
            .await
            .unwrap_err();
        assert!(matches!(err, SitepackError::AssetNotFound(_)));
    }
}
