//! Verification report structures
//!
//! This module defines the structures for reporting verification results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of inspecting one artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// When the verification was performed
    pub verified_at: DateTime<Utc>,

    /// Artifact that was inspected
    pub artifact_path: PathBuf,

    /// Config (`.yml`) members found
    pub config_members: usize,

    /// File asset members found
    pub file_members: usize,

    /// Entries listed by the index, if the index was readable
    pub index_entries: Option<usize>,

    /// SHA-256 of the artifact as it is on disk
    pub checksum: String,

    /// Whether the checksum matched the recorded one, if one was recorded
    pub checksum_matches: Option<bool>,

    /// Problems found
    pub failures: Vec<VerificationFailure>,

    /// Duration of verification in milliseconds
    pub duration_ms: u64,
}

/// Details of a failed check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// Member the problem concerns, if any
    pub member: Option<String>,

    /// Reason for failure
    pub reason: String,
}

impl VerificationReport {
    /// Create a new verification report
    pub fn new(artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            verified_at: Utc::now(),
            artifact_path: artifact_path.into(),
            config_members: 0,
            file_members: 0,
            index_entries: None,
            checksum: String::new(),
            checksum_matches: None,
            failures: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Record a failed check
    pub fn record_failure(&mut self, member: Option<&str>, reason: impl Into<String>) {
        self.failures.push(VerificationFailure {
            member: member.map(String::from),
            reason: reason.into(),
        });
    }

    /// Set the duration of verification
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Check if all verifications passed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Format the report as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("🔍 Artifact Verification\n");
        summary.push_str(&format!("  Artifact: {}\n", self.artifact_path.display()));
        summary.push_str(&format!("  Verified at: {}\n", self.verified_at));
        summary.push_str(&format!("  Duration: {} ms\n", self.duration_ms));
        summary.push_str(&format!("  Config members: {}\n", self.config_members));
        summary.push_str(&format!("  File members: {}\n", self.file_members));
        match self.index_entries {
            Some(entries) => summary.push_str(&format!("  Index entries: {entries}\n")),
            None => summary.push_str("  Index entries: unavailable\n"),
        }
        summary.push_str(&format!("  Checksum: {}\n", self.checksum));
        match self.checksum_matches {
            Some(true) => summary.push_str("  ✅ Checksum matches the recorded value\n"),
            Some(false) => summary.push_str("  ❌ Checksum differs from the recorded value\n"),
            None => summary.push_str("  ⏭️  No recorded checksum\n"),
        }

        if self.failures.is_empty() {
            summary.push_str("\n✅ Artifact is a complete package\n");
        } else {
            summary.push_str("\n❌ Failures:\n");
            for failure in &self.failures {
                match &failure.member {
                    Some(member) => {
                        summary.push_str(&format!("  - {member}: {}\n", failure.reason))
                    }
                    None => summary.push_str(&format!("  - {}\n", failure.reason)),
                }
            }
        }

        summary
    }
}
