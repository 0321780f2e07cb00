//! Export orchestration and batch processing
//!
//! This module provides the core export logic for Sitepack, including:
//! - Scope resolution and batch planning
//! - The archive writer and the run orchestrator
//! - Flat-file directory exports
//! - Summary and reporting

pub mod archive;
pub mod batch;
pub mod coordinator;
pub mod directory;
pub mod planner;
pub mod resolver;
pub mod summary;

pub use archive::ArchiveWriter;
pub use batch::BatchResult;
pub use coordinator::{ExportCoordinator, RunPhase, RunState};
pub use directory::{DirectoryExporter, DirectorySummary};
pub use planner::{plan, Batch};
pub use resolver::{ResolvedScope, SourceResolver, TypePolicy};
pub use summary::{ArtifactInfo, ExportError, ExportErrorType, ExportSummary};

use crate::domain::SitepackError;
use std::fmt;
use std::str::FromStr;

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// One gzip tar artifact in the temp directory
    #[default]
    Archive,
    /// Plain files in a destination directory
    Directory,
}

impl FromStr for ExportFormat {
    type Err = SitepackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "archive" => Ok(Self::Archive),
            "directory" => Ok(Self::Directory),
            _ => Err(SitepackError::Configuration(format!(
                "Invalid export format: {s}. Must be 'archive' or 'directory'"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive => write!(f, "archive"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!(ExportFormat::from_str("archive").unwrap(), ExportFormat::Archive);
        assert_eq!(ExportFormat::from_str("Directory").unwrap(), ExportFormat::Directory);
        assert!(ExportFormat::from_str("zip").is_err());
    }

    #[test]
    fn test_export_format_default() {
        assert_eq!(ExportFormat::default(), ExportFormat::Archive);
        assert_eq!(ExportFormat::Directory.to_string(), "directory");
    }
}
