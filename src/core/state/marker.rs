//! Generation marker model
//!
//! A marker records the generation status of one artifact path. It is
//! checked before a run starts, set to `InProgress` while it runs and
//! replaced by `Completed` or `Failed` when it ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Generation status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    /// Artifact was never generated
    #[default]
    NotStarted,
    /// A run is writing the artifact
    InProgress,
    /// The artifact is complete and finalized
    Completed,
    /// The last run failed or was interrupted
    Failed,
}

impl std::fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

/// Persisted generation status of one artifact
///
/// # Examples
///
/// ```
/// use sitepack::core::state::marker::{GenerationMarkerBuilder, GenerationStatus};
///
/// let marker = GenerationMarkerBuilder::new("/tmp/sitepack/my-site.tar.gz")
///     .config_count(12)
///     .build();
///
/// assert_eq!(marker.config_count, 12);
/// assert_eq!(marker.status, GenerationStatus::NotStarted);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMarker {
    /// Artifact path this marker tracks, also its storage key
    pub artifact_path: PathBuf,

    pub status: GenerationStatus,

    /// When the last run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the last run ended (None while in progress)
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub config_count: usize,

    #[serde(default)]
    pub file_count: usize,

    #[serde(default)]
    pub batch_count: usize,

    /// SHA-256 of the finalized artifact
    #[serde(default)]
    pub checksum: Option<String>,

    /// Size in bytes of the finalized artifact
    #[serde(default)]
    pub artifact_size: Option<u64>,

    /// Failure reason of the last run
    #[serde(default)]
    pub last_error: Option<String>,
}

impl GenerationMarker {
    /// Storage key of the marker for an artifact path
    pub fn key_for(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    pub fn key(&self) -> String {
        Self::key_for(&self.artifact_path)
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == GenerationStatus::InProgress
    }

    pub fn is_completed(&self) -> bool {
        self.status == GenerationStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status == GenerationStatus::Failed
    }

    /// Duration of the last run if it ended
    pub fn last_run_duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.completed_at) {
            (Some(started), Some(completed)) => Some(completed - started),
            _ => None,
        }
    }

    /// Mark a run as started, clearing the results of the previous one
    pub fn mark_started(&mut self) {
        self.started_at = Some(Utc::now());
        self.completed_at = None;
        self.status = GenerationStatus::InProgress;
        self.config_count = 0;
        self.file_count = 0;
        self.batch_count = 0;
        self.checksum = None;
        self.artifact_size = None;
        self.last_error = None;
    }

    /// Mark the run as completed with the finalized artifact's integrity data
    pub fn mark_completed(&mut self, checksum: String, artifact_size: u64) {
        self.completed_at = Some(Utc::now());
        self.status = GenerationStatus::Completed;
        self.checksum = Some(checksum);
        self.artifact_size = Some(artifact_size);
    }

    /// Mark the run as failed
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.completed_at = Some(Utc::now());
        self.status = GenerationStatus::Failed;
        self.last_error = Some(reason.into());
    }

    /// Record entry counts of the run
    pub fn record_counts(&mut self, config_count: usize, file_count: usize, batch_count: usize) {
        self.config_count = config_count;
        self.file_count = file_count;
        self.batch_count = batch_count;
    }
}

/// Builder for creating GenerationMarker instances
pub struct GenerationMarkerBuilder {
    artifact_path: PathBuf,
    status: GenerationStatus,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    config_count: usize,
    file_count: usize,
    batch_count: usize,
    checksum: Option<String>,
    artifact_size: Option<u64>,
}

impl GenerationMarkerBuilder {
    pub fn new(artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            status: GenerationStatus::NotStarted,
            started_at: None,
            completed_at: None,
            config_count: 0,
            file_count: 0,
            batch_count: 0,
            checksum: None,
            artifact_size: None,
        }
    }

    pub fn status(mut self, status: GenerationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn started_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.started_at = Some(timestamp);
        self
    }

    pub fn completed_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.completed_at = Some(timestamp);
        self
    }

    pub fn config_count(mut self, count: usize) -> Self {
        self.config_count = count;
        self
    }

    pub fn file_count(mut self, count: usize) -> Self {
        self.file_count = count;
        self
    }

    pub fn batch_count(mut self, count: usize) -> Self {
        self.batch_count = count;
        self
    }

    pub fn checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    pub fn artifact_size(mut self, size: u64) -> Self {
        self.artifact_size = Some(size);
        self
    }

    pub fn build(self) -> GenerationMarker {
        GenerationMarker {
            artifact_path: self.artifact_path,
            status: self.status,
            started_at: self.started_at,
            completed_at: self.completed_at,
            config_count: self.config_count,
            file_count: self.file_count,
            batch_count: self.batch_count,
            checksum: self.checksum,
            artifact_size: self.artifact_size,
            last_error: None,
        }
    }
}
