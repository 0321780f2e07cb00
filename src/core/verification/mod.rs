//! Artifact verification
//!
//! This module fingerprints finished artifacts and re-reads them to confirm
//! they are complete packages.

pub mod checksum;
pub mod report;
pub mod verify;

pub use checksum::{calculate_checksum, calculate_file_checksum, verify_file_checksum};
pub use report::{VerificationFailure, VerificationReport};
pub use verify::verify_artifact;
