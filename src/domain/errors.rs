//! Domain error types
//!
//! This module defines the error hierarchy for Sitepack.
//! All errors are domain-specific and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main Sitepack error type
///
/// This is the primary error type used throughout the application. The first
/// five variants form the export taxonomy: resolution-time failures
/// (`ScopeNotFound`, `DestinationUnresolved`, `DeleteFailed`) are raised before
/// any archive member is written, batch-time failures (`AssetNotFound`,
/// `Encoding`) abort the remaining batches of a run.
#[derive(Debug, Error)]
pub enum SitepackError {
    /// A named export references a package that does not exist
    #[error("Cannot find package with id: {0}")]
    ScopeNotFound(String),

    /// No destination was supplied and no default is configured
    #[error("No destination provided and no value set in `{0}` settings")]
    DestinationUnresolved(String),

    /// A file entry could not be loaded at archive time
    #[error("File asset not found: {0}")]
    AssetNotFound(String),

    /// A configuration record cannot be serialized
    #[error("Encoding error in {name}: {message}")]
    Encoding { name: String, message: String },

    /// Stale artifact cleanup failed for a reason other than absence
    #[error("Failed to delete {}: {message}", path.display())]
    DeleteFailed { path: PathBuf, message: String },

    /// Another generation of the same artifact has not finished
    #[error("Generation already in progress for {0}")]
    GenerationInProgress(String),

    /// Chunk size outside the accepted range
    #[error("Invalid chunk size {0}: must be at least 1")]
    InvalidChunkSize(usize),

    /// Export run state machine misuse
    #[error("Invalid run state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Source or destination storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Archive construction errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// State management errors
    #[error("State management error: {0}")]
    State(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl SitepackError {
    /// Creates an encoding error for the named record
    pub fn encoding(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether the error aborts a run before any batch work happens
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::ScopeNotFound(_)
                | Self::DestinationUnresolved(_)
                | Self::DeleteFailed { .. }
                | Self::GenerationInProgress(_)
                | Self::InvalidChunkSize(_)
                | Self::Configuration(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SitepackError {
    fn from(err: std::io::Error) -> Self {
        SitepackError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SitepackError {
    fn from(err: serde_json::Error) -> Self {
        SitepackError::Serialization(err.to_string())
    }
}

// Conversion from serde_yaml::Error
impl From<serde_yaml::Error> for SitepackError {
    fn from(err: serde_yaml::Error) -> Self {
        SitepackError::Serialization(format!("YAML error: {err}"))
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SitepackError {
    fn from(err: toml::de::Error) -> Self {
        SitepackError::Configuration(format!("TOML parse error: {err}"))
    }
}
