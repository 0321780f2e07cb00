//! Checksum calculation for artifact integrity
//!
//! This module fingerprints finished artifacts so later runs of `status`
//! can tell whether the file on disk is the one the export produced.

use crate::domain::{Result, SitepackError};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Calculate the SHA-256 checksum of a file
///
/// The file is streamed, never loaded whole.
///
/// # Returns
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
pub fn calculate_file_checksum(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| {
        SitepackError::Io(format!("Failed to open {} for checksum: {e}", path.display()))
    })?;
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    let result = hasher.finalize();

    Ok(format!("{result:x}"))
}

/// Calculate the SHA-256 checksum of in-memory bytes
///
/// # Examples
///
/// ```
/// use sitepack::core::verification::checksum::calculate_checksum;
///
/// let checksum = calculate_checksum(b"hello");
/// assert_eq!(checksum.len(), 64); // SHA-256 produces 64 hex characters
/// ```
pub fn calculate_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Verify a file against an expected checksum
pub fn verify_file_checksum(path: &Path, expected: &str) -> Result<bool> {
    let actual = calculate_file_checksum(path)?;
    Ok(actual.eq_ignore_ascii_case(expected))
}
