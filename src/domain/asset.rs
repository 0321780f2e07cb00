//! File assets and their index metadata

use super::ids::FileUuid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;
use std::sync::Arc;

/// Metadata of one archived file, as written into the export index
///
/// Serializes flat: `file_dependency_name` next to the asset's own scalar
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// `file:file:<uuid>` dependency name of the asset
    pub file_dependency_name: String,

    /// Scalar field values of the asset
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl FileMetadata {
    pub fn new(uuid: &FileUuid, fields: BTreeMap<String, serde_json::Value>) -> Self {
        Self {
            file_dependency_name: uuid.dependency_name(),
            fields,
        }
    }
}

/// Name of the index member inside the archive and in sync directories
pub const INDEX_FILE_NAME: &str = "sitepack_package_files.json";

/// Manifest of exported file assets, keyed by file UUID
///
/// Built batch by batch and written once, after the last file is archived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportIndex(BTreeMap<FileUuid, FileMetadata>);

impl ExportIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uuid: FileUuid, metadata: FileMetadata) {
        self.0.insert(uuid, metadata);
    }

    /// Moves every entry of `other` into this index
    pub fn merge(&mut self, other: ExportIndex) {
        self.0.extend(other.0);
    }

    pub fn get(&self, uuid: &FileUuid) -> Option<&FileMetadata> {
        self.0.get(uuid)
    }

    pub fn contains(&self, uuid: &FileUuid) -> bool {
        self.0.contains_key(uuid)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FileUuid> {
        self.0.keys()
    }

    /// Pretty-printed JSON form, as stored in the index file
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Where the bytes of an asset come from
#[derive(Debug, Clone)]
pub enum AssetContent {
    /// A blob on the local filesystem
    Path(PathBuf),
    /// Bytes already held in memory
    Inline(Arc<[u8]>),
}

/// A binary file asset
///
/// Content is not loaded until [`FileAsset::open`] is called, and the handle
/// it returns is dropped as soon as the bytes are streamed.
#[derive(Debug, Clone)]
pub struct FileAsset {
    pub uuid: FileUuid,
    /// Member name inside the archive
    pub filename: String,
    /// Creation time, unix seconds
    pub created: i64,
    pub content: AssetContent,
    pub metadata: FileMetadata,
}

/// Scoped read handle over an asset's bytes
pub struct AssetReader {
    pub size: u64,
    pub reader: Box<dyn Read + Send>,
}

impl FileAsset {
    /// Opens the asset's content for streaming
    pub fn open(&self) -> io::Result<AssetReader> {
        match &self.content {
            AssetContent::Path(path) => {
                let file = File::open(path)?;
                let size = file.metadata()?.len();
                Ok(AssetReader {
                    size,
                    reader: Box::new(file),
                })
            }
            AssetContent::Inline(bytes) => Ok(AssetReader {
                size: bytes.len() as u64,
                reader: Box::new(Cursor::new(Arc::clone(bytes))),
            }),
        }
    }

    /// Archive mtime; negative creation times clamp to the epoch
    pub fn mtime(&self) -> u64 {
        u64::try_from(self.created).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn uuid() -> FileUuid {
        FileUuid::new("4b8f3a29-5d9c-4f87-aa95-84d7c3f51f6a").unwrap()
    }

    #[test]
    fn test_metadata_serializes_flat() {
        let mut fields = BTreeMap::new();
        fields.insert("filename".to_string(), json!("logo.png"));
        fields.insert("filesize".to_string(), json!(1024));
        let metadata = FileMetadata::new(&uuid(), fields);

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            value,
            json!({
                "file_dependency_name": "file:file:4b8f3a29-5d9c-4f87-aa95-84d7c3f51f6a",
                "filename": "logo.png",
                "filesize": 1024
            })
        );
    }

    #[test]
    fn test_index_merge_and_json() {
        let other_uuid = FileUuid::new("0f2b7a8c-3c3e-4e2b-9a64-7f4dbe0c6a11").unwrap();

        let mut index = ExportIndex::new();
        index.insert(uuid(), FileMetadata::new(&uuid(), BTreeMap::new()));

        let mut partial = ExportIndex::new();
        partial.insert(other_uuid, FileMetadata::new(&other_uuid, BTreeMap::new()));
        index.merge(partial);

        assert_eq!(index.len(), 2);
        assert!(index.contains(&other_uuid));

        let json = index.to_pretty_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed["0f2b7a8c-3c3e-4e2b-9a64-7f4dbe0c6a11"]["file_dependency_name"],
            json!("file:file:0f2b7a8c-3c3e-4e2b-9a64-7f4dbe0c6a11")
        );
        assert!(json.starts_with("{\n  \""));
    }

    #[test]
    fn test_empty_index_json() {
        assert_eq!(ExportIndex::new().to_pretty_json().unwrap(), "{}");
    }

    #[test]
    fn test_open_inline_content() {
        let asset = FileAsset {
            uuid: uuid(),
            filename: "logo.png".to_string(),
            created: 1_700_000_000,
            content: AssetContent::Inline(Arc::from(&b"png-bytes"[..])),
            metadata: FileMetadata::new(&uuid(), BTreeMap::new()),
        };

        let mut handle = asset.open().unwrap();
        assert_eq!(handle.size, 9);
        let mut buf = Vec::new();
        handle.reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"png-bytes");
        assert_eq!(asset.mtime(), 1_700_000_000);
    }

    #[test]
    fn test_open_path_content() {
        let mut blob = tempfile::NamedTempFile::new().unwrap();
        blob.write_all(b"hello").unwrap();
        blob.flush().unwrap();

        let asset = FileAsset {
            uuid: uuid(),
            filename: "hello.txt".to_string(),
            created: -5,
            content: AssetContent::Path(blob.path().to_path_buf()),
            metadata: FileMetadata::new(&uuid(), BTreeMap::new()),
        };

        let handle = asset.open().unwrap();
        assert_eq!(handle.size, 5);
        assert_eq!(asset.mtime(), 0);
    }
}
