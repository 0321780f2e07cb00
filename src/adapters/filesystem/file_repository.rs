//! Directory-backed file asset repository
//!
//! Each asset is described by `<uuid>.yml` in the files directory:
//!
//! ```yaml
//! uuid: 4b8f3a29-5d9c-4f87-aa95-84d7c3f51f6a
//! filename: logo.png
//! uri: public/logo.png
//! created: 1700000000
//! filemime: image/png
//! ```
//!
//! `uri` is relative to the files directory and defaults to `filename`.
//! Every scalar field of the descriptor is carried into the index metadata.

use crate::adapters::storage::traits::FileRepository;
use crate::domain::{
    AssetContent, FileAsset, FileMetadata, FileUuid, Result, SitepackError,
};
use async_trait::async_trait;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// File repository reading descriptors from a directory
#[derive(Debug, Clone)]
pub struct DirectoryFileRepository {
    directory: PathBuf,
}

impl DirectoryFileRepository {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn descriptor_path(&self, uuid: &FileUuid) -> PathBuf {
        self.directory.join(format!("{uuid}.yml"))
    }

    fn parse_descriptor(&self, uuid: &FileUuid, contents: &str) -> Result<FileAsset> {
        let descriptor: Mapping = serde_yaml::from_str(contents).map_err(|e| {
            SitepackError::Storage(format!("Invalid file descriptor for {uuid}: {e}"))
        })?;

        let filename = descriptor
            .get("filename")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                SitepackError::Storage(format!("File descriptor for {uuid} has no filename"))
            })?
            .to_string();

        let mut components = Path::new(&filename).components();
        let plain_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain_name {
            return Err(SitepackError::Storage(format!(
                "File {uuid} has a filename with path components: {filename}"
            )));
        }

        let uri = descriptor
            .get("uri")
            .and_then(Value::as_str)
            .unwrap_or(&filename);
        let source = self.resolve_uri(uuid, uri)?;

        let created = descriptor
            .get("created")
            .and_then(Value::as_i64)
            .unwrap_or(0);

        if let Some(declared) = descriptor.get("uuid").and_then(Value::as_str) {
            if FileUuid::new(declared).ok().as_ref() != Some(uuid) {
                tracing::warn!(%uuid, declared, "File descriptor declares a different uuid");
            }
        }

        Ok(FileAsset {
            uuid: *uuid,
            filename,
            created,
            content: AssetContent::Path(source),
            metadata: FileMetadata::new(uuid, scalar_fields(&descriptor)),
        })
    }

    /// Resolves a descriptor `uri` inside the files directory
    fn resolve_uri(&self, uuid: &FileUuid, uri: &str) -> Result<PathBuf> {
        let relative = Path::new(uri);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(SitepackError::Storage(format!(
                "File {uuid} points outside the files directory: {uri}"
            )));
        }
        Ok(self.directory.join(relative))
    }
}

#[async_trait]
impl FileRepository for DirectoryFileRepository {
    async fn load(&self, uuid: &FileUuid) -> Result<Option<FileAsset>> {
        let path = self.descriptor_path(uuid);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => self.parse_descriptor(uuid, &contents).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SitepackError::Storage(format!("{}: {}", path.display(), e))),
        }
    }
}

/// Scalar descriptor fields as JSON values; nested values are dropped
fn scalar_fields(descriptor: &Mapping) -> BTreeMap<String, serde_json::Value> {
    let mut fields = BTreeMap::new();
    for (key, value) in descriptor {
        let Some(key) = key.as_str() else { continue };
        let json = match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    serde_json::Value::from(i)
                } else if let Some(u) = n.as_u64() {
                    serde_json::Value::from(u)
                } else {
                    match n.as_f64().and_then(serde_json::Number::from_f64) {
                        Some(f) => serde_json::Value::Number(f),
                        None => continue,
                    }
                }
            }
            _ => continue,
        };
        fields.insert(key.to_string(), json);
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    const UUID: &str = "4b8f3a29-5d9c-4f87-aa95-84d7c3f51f6a";

    fn setup(descriptor: &str) -> (TempDir, DirectoryFileRepository) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(format!("{UUID}.yml")), descriptor).unwrap();
        let repository = DirectoryFileRepository::new(dir.path());
        (dir, repository)
    }

    #[tokio::test]
    async fn test_load_descriptor() {
        let (dir, repository) = setup(&format!(
            "uuid: {UUID}\nfilename: logo.png\nuri: public/logo.png\ncreated: 1700000000\nfilesize: 9\nstatus: true\ntags:\n  - a\n"
        ));
        std::fs::create_dir(dir.path().join("public")).unwrap();
        std::fs::write(dir.path().join("public").join("logo.png"), b"png-bytes").unwrap();

        let uuid = FileUuid::new(UUID).unwrap();
        let asset = repository.load(&uuid).await.unwrap().unwrap();

        assert_eq!(asset.filename, "logo.png");
        assert_eq!(asset.created, 1_700_000_000);
        assert_eq!(asset.metadata.file_dependency_name, uuid.dependency_name());
        assert_eq!(asset.metadata.fields["filesize"], serde_json::json!(9));
        assert_eq!(asset.metadata.fields["status"], serde_json::json!(true));
        assert!(!asset.metadata.fields.contains_key("tags"));

        let mut handle = asset.open().unwrap();
        let mut bytes = Vec::new();
        handle.reader.read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes, b"png-bytes");
    }

    #[tokio::test]
    async fn test_uri_defaults_to_filename() {
        let (dir, repository) = setup("filename: doc.pdf\n");
        let asset = repository
            .load(&FileUuid::new(UUID).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(asset.content, AssetContent::Path(p) if p == dir.path().join("doc.pdf")));
        assert_eq!(asset.created, 0);
    }

    #[tokio::test]
    async fn test_missing_descriptor() {
        let dir = TempDir::new().unwrap();
        let repository = DirectoryFileRepository::new(dir.path());
        let result = repository.load(&FileUuid::new(UUID).unwrap()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_rejects_escaping_uri() {
        let (_dir, repository) = setup("filename: x.txt\nuri: ../../etc/passwd\n");
        let err = repository.load(&FileUuid::new(UUID).unwrap()).await.unwrap_err();
        assert!(err.to_string().contains("outside the files directory"));
    }

    #[tokio::test]
    async fn test_rejects_missing_filename() {
        let (_dir, repository) = setup("uri: x.txt\n");
        assert!(repository.load(&FileUuid::new(UUID).unwrap()).await.is_err());
    }
}
