//! Validation statistics

use crate::RejectReason;
use std::collections::BTreeMap;

/// Acceptance/rejection counts for one validation pass
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ValidationStats {
    /// Rows presented to the validator
    pub rows_seen: usize,

    /// Rows accepted as practice metrics
    pub accepted: usize,

    /// Rows rejected to quarantine
    pub rejected: usize,

    /// Rejection counts per reason code
    pub by_reason: BTreeMap<RejectReason, usize>,
}

impl ValidationStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted row
    pub fn record_accepted(&mut self) {
        self.rows_seen += 1;
        self.accepted += 1;
    }

    /// Record a rejected row under its reason code
    pub fn record_rejection(&mut self, reason: RejectReason) {
        self.rows_seen += 1;
        self.rejected += 1;
        *self.by_reason.entry(reason).or_insert(0) += 1;
    }
}
