//! Artifact verification
//!
//! Re-reads a finished artifact and checks that it is a complete package:
//! the index member is present, comes last, and lists exactly the file
//! members that were archived.

use crate::core::export::archive::{is_config_member, is_index_member};
use crate::core::verification::checksum::calculate_file_checksum;
use crate::core::verification::report::VerificationReport;
use crate::domain::{ExportIndex, Result, SitepackError};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

/// Inspect an artifact
///
/// # Arguments
///
/// * `path` - The `.tar.gz` artifact
/// * `expected_checksum` - Checksum recorded when the artifact was finalized
///
/// # Errors
///
/// Returns an error only when the artifact cannot be read at all; content
/// problems are reported as failures in the returned report.
pub fn verify_artifact(path: &Path, expected_checksum: Option<&str>) -> Result<VerificationReport> {
    let start = Instant::now();
    let mut report = VerificationReport::new(path);

    tracing::info!(path = %path.display(), "Verifying artifact");

    report.checksum = calculate_file_checksum(path)?;
    report.checksum_matches = expected_checksum.map(|e| e.eq_ignore_ascii_case(&report.checksum));
    if report.checksum_matches == Some(false) {
        report.record_failure(None, "checksum differs from the value recorded at finalize");
    }

    let file = File::open(path)
        .map_err(|e| SitepackError::Archive(format!("{}: {e}", path.display())))?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let mut index: Option<String> = None;
    let mut file_members: Vec<String> = Vec::new();
    let entries = archive
        .entries()
        .map_err(|e| SitepackError::Archive(format!("Unreadable archive: {e}")))?;

    for entry in entries {
        let mut entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.record_failure(None, format!("archive stream is truncated: {e}"));
                break;
            }
        };
        let name = entry
            .path()
            .map_err(|e| SitepackError::Archive(format!("Invalid member path: {e}")))?
            .to_string_lossy()
            .into_owned();

        if index.is_some() {
            report.record_failure(Some(&name), "member follows the index");
        }

        if is_index_member(&name) {
            let mut json = String::new();
            entry.read_to_string(&mut json)?;
            index = Some(json);
        } else if is_config_member(&name) {
            report.config_members += 1;
        } else {
            report.file_members += 1;
            file_members.push(name);
        }
    }

    match index {
        None => report.record_failure(None, "index member missing; the artifact is incomplete"),
        Some(json) => match serde_json::from_str::<ExportIndex>(&json) {
            Ok(parsed) => {
                report.index_entries = Some(parsed.len());
                if parsed.len() != file_members.len() {
                    report.record_failure(
                        None,
                        format!(
                            "index lists {} files but the archive holds {}",
                            parsed.len(),
                            file_members.len()
                        ),
                    );
                }
            }
            Err(e) => report.record_failure(None, format!("index is not valid JSON: {e}")),
        },
    }

    report.set_duration(start.elapsed().as_millis() as u64);

    tracing::info!(
        path = %path.display(),
        config_members = report.config_members,
        file_members = report.file_members,
        failures = report.failures.len(),
        "Artifact verification completed"
    );

    Ok(report)
}
