//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::SitepackError;
use std::path::PathBuf;
use std::time::Duration;

/// A finished archive on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactInfo {
    pub path: PathBuf,
    /// Hex-encoded SHA-256 of the archive bytes
    pub checksum: String,
    /// Size in bytes
    pub size: u64,
}

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Human-readable scope, e.g. `full site`
    pub scope: String,

    /// Config members written
    pub config_count: usize,

    /// File members written
    pub file_count: usize,

    /// Batches planned for the run
    pub batch_count: usize,

    /// Config entries skipped because their record was gone
    pub skipped: usize,

    /// One progress message per completed batch
    pub messages: Vec<String>,

    /// Set when a shutdown signal stopped the run between batches
    pub interrupted: bool,

    /// The finalized archive, if the run completed
    pub artifact: Option<ArtifactInfo>,

    /// Duration of the export
    pub duration: Duration,

    /// Errors encountered during export
    pub errors: Vec<ExportError>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            config_count: 0,
            file_count: 0,
            batch_count: 0,
            skipped: 0,
            messages: Vec::new(),
            interrupted: false,
            artifact: None,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Total members written, index excluded
    pub fn total_members(&self) -> usize {
        self.config_count + self.file_count
    }

    /// Check if the export produced a finalized artifact without errors
    pub fn is_successful(&self) -> bool {
        !self.interrupted && self.errors.is_empty() && self.artifact.is_some()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            scope = %self.scope,
            config_count = self.config_count,
            file_count = self.file_count,
            batch_count = self.batch_count,
            skipped = self.skipped,
            interrupted = self.interrupted,
            duration_ms = self.duration.as_millis() as u64,
            "Export finished"
        );

        if let Some(artifact) = &self.artifact {
            tracing::info!(
                path = %artifact.path.display(),
                size = artifact.size,
                checksum = %artifact.checksum,
                "Artifact finalized"
            );
        }

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Export completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    "Export error"
                );
            }
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new("full site")
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Scope or destination could not be resolved
    Resolution,
    /// A file asset was missing at archive time
    Asset,
    /// A record could not be encoded
    Encoding,
    /// Source or destination storage error
    Storage,
    /// Archive stream error
    Archive,
    /// Generation marker error
    State,
    /// Configuration error
    Configuration,
    /// The run was stopped by a shutdown signal
    Interrupted,
    /// Unknown error
    Unknown,
}

impl From<&SitepackError> for ExportErrorType {
    fn from(err: &SitepackError) -> Self {
        match err {
            SitepackError::ScopeNotFound(_)
            | SitepackError::DestinationUnresolved(_)
            | SitepackError::DeleteFailed { .. } => Self::Resolution,
            SitepackError::AssetNotFound(_) => Self::Asset,
            SitepackError::Encoding { .. } => Self::Encoding,
            SitepackError::Storage(_) | SitepackError::Io(_) => Self::Storage,
            SitepackError::Archive(_) => Self::Archive,
            SitepackError::State(_)
            | SitepackError::GenerationInProgress(_)
            | SitepackError::InvalidStateTransition { .. } => Self::State,
            SitepackError::Configuration(_) | SitepackError::InvalidChunkSize(_) => {
                Self::Configuration
            }
            SitepackError::Validation(_) | SitepackError::Serialization(_) => Self::Unknown,
        }
    }
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Optional context (e.g., batch number)
    pub context: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

impl From<&SitepackError> for ExportError {
    fn from(err: &SitepackError) -> Self {
        Self::new(ExportErrorType::from(err), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ArtifactInfo {
        ArtifactInfo {
            path: PathBuf::from("/tmp/sitepack/my-site.tar.gz"),
            checksum: "ab".repeat(32),
            size: 512,
        }
    }

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new("package 'landing'");

        assert_eq!(summary.scope, "package 'landing'");
        assert_eq!(summary.config_count, 0);
        assert_eq!(summary.file_count, 0);
        assert_eq!(summary.batch_count, 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.errors.is_empty());
        assert!(summary.artifact.is_none());
        assert!(!summary.interrupted);
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::default().with_duration(Duration::from_secs(120));

        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_export_summary_is_successful() {
        let mut summary = ExportSummary::default();
        assert!(!summary.is_successful());

        summary.artifact = Some(artifact());
        assert!(summary.is_successful());

        summary.interrupted = true;
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_export_error_from_domain_error() {
        let err = SitepackError::AssetNotFound("4b8f3a29".to_string());
        let error = ExportError::from(&err).with_context("batch 2".to_string());

        assert_eq!(error.error_type, ExportErrorType::Asset);
        assert_eq!(error.message, "File asset not found: 4b8f3a29");
        assert_eq!(error.context, Some("batch 2".to_string()));
    }

    #[test]
    fn test_error_type_mapping() {
        assert_eq!(
            ExportErrorType::from(&SitepackError::ScopeNotFound("x".to_string())),
            ExportErrorType::Resolution
        );
        assert_eq!(
            ExportErrorType::from(&SitepackError::encoding("a.b", "tagged")),
            ExportErrorType::Encoding
        );
        assert_eq!(
            ExportErrorType::from(&SitepackError::InvalidChunkSize(0)),
            ExportErrorType::Configuration
        );
    }

    #[test]
    fn test_export_summary_add_error() {
        let mut summary = ExportSummary::default();
        summary.artifact = Some(artifact());

        summary.add_error(ExportError::new(
            ExportErrorType::Storage,
            "Failed to write".to_string(),
        ));

        assert_eq!(summary.errors.len(), 1);
        assert!(!summary.is_successful());
    }
}
