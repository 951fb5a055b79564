//! Load statistics and failed-batch records

use serde::{Deserialize, Serialize};

/// Counters for one loading stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadStats {
    /// Batches committed successfully
    pub batches_committed: usize,

    /// Rows persisted to the metrics table
    pub rows_loaded: usize,

    /// Batches that exhausted their attempts
    pub batches_failed: usize,

    /// Rows lost to failed batches
    pub rows_failed_load: usize,

    /// Commit attempts beyond the first, across all batches
    pub retries: usize,

    /// Rejected rows written to the quarantine table
    pub rejections_quarantined: usize,

    /// Rejected rows whose quarantine write failed (audit gap, not a run
    /// failure)
    pub quarantine_failures: usize,
}

impl LoadStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }
}

/// Record of one batch that exhausted its commit attempts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedBatch {
    /// Zero-based position of the batch within the run
    pub batch_index: usize,

    /// Rows the batch carried
    pub rows: usize,

    /// Commit attempts made before giving up
    pub attempts: u32,

    /// The final error, rendered for the run report
    pub error: String,
}
