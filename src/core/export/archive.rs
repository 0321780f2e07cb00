//! Gzip tar archive writer
//!
//! One writer per run. Members are appended batch by batch; the index member
//! is written last, by [`ArchiveWriter::finalize`], and its presence is what
//! marks an artifact as complete.

use crate::adapters::storage::traits::{ConfigSource, FileRepository};
use crate::core::encode::RecordEncoder;
use crate::core::export::batch::BatchResult;
use crate::core::export::planner::Batch;
use crate::core::export::summary::ArtifactInfo;
use crate::core::verification::checksum::calculate_file_checksum;
use crate::domain::{ConfigName, Entry, ExportIndex, Result, SitepackError, INDEX_FILE_NAME};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};

const MEMBER_MODE: u32 = 0o644;

type ArchiveStream = tar::Builder<GzEncoder<BufWriter<File>>>;

/// Streams export entries into a `.tar.gz` artifact
pub struct ArchiveWriter {
    path: PathBuf,
    builder: ArchiveStream,
    encoder: RecordEncoder,
    /// Timestamp given to config and index members, unix seconds
    config_mtime: u64,
}

impl ArchiveWriter {
    /// Delete any existing artifact at `path` and start a new one
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns [`SitepackError::DeleteFailed`] if an existing artifact cannot
    /// be removed. A missing artifact is not an error.
    pub fn open_or_reset(path: impl Into<PathBuf>, config_mtime: u64) -> Result<Self> {
        let path = path.into();

        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed previous artifact"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(SitepackError::DeleteFailed {
                    path,
                    message: e.to_string(),
                })
            }
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| archive_error(parent, e))?;
        }

        let file = File::create(&path).map_err(|e| archive_error(&path, e))?;
        let gzip = GzEncoder::new(BufWriter::new(file), Compression::default());
        let mut builder = tar::Builder::new(gzip);
        builder.mode(tar::HeaderMode::Complete);

        tracing::debug!(path = %path.display(), "Opened archive");

        Ok(Self {
            path,
            builder,
            encoder: RecordEncoder::new(),
            config_mtime,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append every entry of a batch, in order
    ///
    /// Config entries whose record is gone are skipped. Members written
    /// before a failure stay in the archive.
    ///
    /// # Errors
    ///
    /// Returns [`SitepackError::AssetNotFound`] if a file entry has no asset,
    /// [`SitepackError::Encoding`] if a record cannot be encoded, or a
    /// storage/archive error.
    pub async fn append_batch(
        &mut self,
        batch: &Batch,
        processed_before: usize,
        total_entries: usize,
        source: &dyn ConfigSource,
        files: &dyn FileRepository,
    ) -> Result<BatchResult> {
        let mut result = BatchResult::new(batch.number());

        for entry in &batch.entries {
            match entry {
                Entry::Config(name) => match source.read(name).await? {
                    Some(record) => {
                        let yaml = self.encoder.encode(&record)?;
                        self.append_config(name, &yaml)?;
                        result.add_config();
                    }
                    None => {
                        tracing::debug!(name = %name, "Record absent at archive time, skipping");
                        result.add_skipped();
                    }
                },
                Entry::File(uuid) => {
                    let asset = files
                        .load(uuid)
                        .await?
                        .ok_or_else(|| SitepackError::AssetNotFound(uuid.to_string()))?;

                    let handle = asset
                        .open()
                        .map_err(|e| SitepackError::Storage(format!("Failed to open {uuid}: {e}")))?;
                    self.append_stream(&asset.filename, handle.size, asset.mtime(), handle.reader)
                        .map_err(|e| member_error(&asset.filename, e))?;

                    result.add_file(*uuid, asset.metadata);
                }
            }
        }

        Ok(result.complete(processed_before, total_entries))
    }

    /// Append one encoded record as `<name>.yml`
    pub fn append_config(&mut self, name: &ConfigName, yaml: &str) -> Result<()> {
        let member = name.member_name();
        self.append_stream(&member, yaml.len() as u64, self.config_mtime, yaml.as_bytes())
            .map_err(|e| member_error(&member, e))
    }

    /// Write the index, close the streams and fingerprint the artifact
    pub fn finalize(mut self, index: &ExportIndex) -> Result<ArtifactInfo> {
        let json = index.to_pretty_json()?;
        self.append_stream(INDEX_FILE_NAME, json.len() as u64, self.config_mtime, json.as_bytes())
            .map_err(|e| member_error(INDEX_FILE_NAME, e))?;

        let path = self.close()?;
        let checksum = calculate_file_checksum(&path)?;
        let size = fs::metadata(&path).map_err(|e| archive_error(&path, e))?.len();

        tracing::info!(
            path = %path.display(),
            files = index.len(),
            size,
            "Archive finalized"
        );

        Ok(ArtifactInfo {
            path,
            checksum,
            size,
        })
    }

    /// Close the streams without writing the index
    ///
    /// The artifact stays readable but is incomplete.
    pub fn abandon(self) -> Result<PathBuf> {
        let path = self.close()?;
        tracing::warn!(path = %path.display(), "Archive abandoned without index");
        Ok(path)
    }

    fn append_stream<R: Read>(&mut self, name: &str, size: u64, mtime: u64, data: R) -> io::Result<()> {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(size);
        header.set_mode(MEMBER_MODE);
        header.set_mtime(mtime);
        self.builder.append_data(&mut header, name, data)
    }

    fn close(self) -> Result<PathBuf> {
        let Self { path, builder, .. } = self;
        let gzip = builder.into_inner().map_err(|e| archive_error(&path, e))?;
        let buffered = gzip.finish().map_err(|e| archive_error(&path, e))?;
        let file = buffered
            .into_inner()
            .map_err(|e| archive_error(&path, e.into_error()))?;
        file.sync_all().map_err(|e| archive_error(&path, e))?;
        Ok(path)
    }
}

fn archive_error(path: &Path, err: io::Error) -> SitepackError {
    SitepackError::Archive(format!("{}: {err}", path.display()))
}

fn member_error(member: &str, err: io::Error) -> SitepackError {
    SitepackError::Archive(format!("Failed to append {member}: {err}"))
}

/// Names of the members of a `.tar.gz` artifact, in archive order
pub fn list_members(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| archive_error(path, e))?;
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));

    let mut members = Vec::new();
    for entry in archive.entries().map_err(|e| archive_error(path, e))? {
        let entry = entry.map_err(|e| archive_error(path, e))?;
        let name = entry.path().map_err(|e| archive_error(path, e))?;
        members.push(name.to_string_lossy().into_owned());
    }
    Ok(members)
}

/// Whether a member name is the index
pub fn is_index_member(name: &str) -> bool {
    name == INDEX_FILE_NAME
}

/// Whether a member name is an encoded config record
pub fn is_config_member(name: &str) -> bool {
    name.ends_with(".yml")
}

impl std::fmt::Debug for ArchiveWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveWriter")
            .field("path", &self.path)
            .field("config_mtime", &self.config_mtime)
            .finish_non_exhaustive()
    }
}
