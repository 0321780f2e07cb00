//! Per-batch results
//!
//! A [`BatchResult`] is what the archive writer reports back for one batch:
//! counters, the partial file index and a progress message. The orchestrator
//! folds them into its run state.

use crate::domain::{ExportIndex, FileMetadata, FileUuid};

/// Result of processing a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    /// One-based batch number
    pub batch_number: usize,
    /// Entries handled in this batch, skipped ones included
    pub processed: usize,
    /// Config entries whose record was absent at archive time
    pub skipped: usize,
    /// Config members written
    pub config_count: usize,
    /// File members written
    pub file_count: usize,
    /// Index entries of the files written in this batch
    pub index: ExportIndex,
    /// Progress message
    pub message: String,
}

impl BatchResult {
    /// Create a new empty batch result
    pub fn new(batch_number: usize) -> Self {
        Self {
            batch_number,
            ..Self::default()
        }
    }

    /// Record a written config member
    pub fn add_config(&mut self) {
        self.processed += 1;
        self.config_count += 1;
    }

    /// Record a written file member and its index entry
    pub fn add_file(&mut self, uuid: FileUuid, metadata: FileMetadata) {
        self.processed += 1;
        self.file_count += 1;
        self.index.insert(uuid, metadata);
    }

    /// Record a config entry whose record no longer exists
    pub fn add_skipped(&mut self) {
        self.processed += 1;
        self.skipped += 1;
    }

    /// Seal the result with its progress message
    ///
    /// The message counts entries across the whole run: `processed_before`
    /// entries from earlier batches plus this batch's, out of `total_entries`.
    pub fn complete(mut self, processed_before: usize, total_entries: usize) -> Self {
        self.message = format!(
            "batch {}: processed {} of {} entries",
            self.batch_number,
            processed_before + self.processed,
            total_entries
        );
        self
    }
}
