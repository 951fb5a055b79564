//! Run state machine and the aggregated run report

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::app::services::batch_loader::{FailedBatch, LoadStats};
use crate::app::services::row_validator::ValidationStats;
use crate::app::services::workbook_reader::ExtractStats;
use crate::{Error, RejectReason};

/// Lifecycle state of one pipeline run
///
/// Runs progress `Starting → Extracting → Transforming → Loading →
/// Completed`. `Aborted` is the alternate terminal, reached when
/// configuration fails before `Starting` completes, when extraction fails
/// for every input file, or when the operator cancels the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Starting,
    Extracting,
    Transforming,
    Loading,
    Completed,
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunState::Starting => "starting",
            RunState::Extracting => "extracting",
            RunState::Transforming => "transforming",
            RunState::Loading => "loading",
            RunState::Completed => "completed",
            RunState::Aborted => "aborted",
        };
        write!(f, "{label}")
    }
}

/// Overall outcome of a run, distinguishable by callers via the process
/// exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Every row extracted, validated, and loaded cleanly
    Success,
    /// The run completed but rejected rows, failed batches, skipped files,
    /// or quarantine gaps occurred
    Partial,
    /// Nothing useful happened: every file failed, or the run was cut off
    /// before loading anything
    Failed,
}

impl RunStatus {
    /// Process exit code reported to the caller
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Partial => 1,
            RunStatus::Failed => 2,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunStatus::Success => "success",
            RunStatus::Partial => "partial",
            RunStatus::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

/// A file-level failure recorded against the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileError {
    pub file: PathBuf,
    pub error: String,
}

/// Summary of one pipeline execution
///
/// Mutated by the orchestrator as stages complete, immutable once the run
/// ends. This is in-process reporting state, not a database entity; the
/// pipeline holds no other state between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Current lifecycle state
    pub state: RunState,

    /// Overall outcome, finalized when the run ends
    pub status: RunStatus,

    /// Workbook files discovered for the run
    pub files_discovered: usize,

    /// Files fully extracted and validated
    pub files_processed: usize,

    /// Files that failed extraction
    pub files_failed: usize,

    /// Files skipped because the run was cancelled first
    pub files_skipped: usize,

    /// Data rows read across all sheets (blank rows included)
    pub rows_read: usize,

    /// Rows accepted by the validator
    pub rows_accepted: usize,

    /// Rows rejected to quarantine
    pub rows_rejected: usize,

    /// Rows committed to the metrics table
    pub rows_loaded: usize,

    /// Rows lost to batches that exhausted their retries
    pub rows_failed_load: usize,

    /// Rejections per reason code
    pub rejection_counts: BTreeMap<RejectReason, usize>,

    /// Every batch that exhausted its commit attempts
    pub failed_batches: Vec<FailedBatch>,

    /// Every file-level error
    pub file_errors: Vec<FileError>,

    /// Loader counters (retries, quarantine outcomes)
    pub load_stats: LoadStats,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl Default for RunResult {
    fn default() -> Self {
        Self::new()
    }
}

impl RunResult {
    /// Create the report for a run that is about to start
    pub fn new() -> Self {
        Self {
            state: RunState::Starting,
            status: RunStatus::Failed,
            files_discovered: 0,
            files_processed: 0,
            files_failed: 0,
            files_skipped: 0,
            rows_read: 0,
            rows_accepted: 0,
            rows_rejected: 0,
            rows_loaded: 0,
            rows_failed_load: 0,
            rejection_counts: BTreeMap::new(),
            failed_batches: Vec::new(),
            file_errors: Vec::new(),
            load_stats: LoadStats::new(),
            duration: Duration::ZERO,
        }
    }

    /// Move the run to a new lifecycle state
    pub fn transition(&mut self, state: RunState) {
        info!("Run state: {} -> {}", self.state, state);
        self.state = state;
    }

    /// Fold one file's extraction and validation statistics into the run
    pub fn absorb_file(&mut self, extract: &ExtractStats, validation: &ValidationStats) {
        self.files_processed += 1;
        self.rows_read += extract.rows_read;
        self.rows_accepted += validation.accepted;
        self.rows_rejected += validation.rejected;
        for (reason, count) in &validation.by_reason {
            *self.rejection_counts.entry(*reason).or_insert(0) += count;
        }
    }

    /// Record a file-level extraction failure
    pub fn record_file_error(&mut self, file: PathBuf, error: &Error) {
        self.files_failed += 1;
        self.file_errors.push(FileError {
            file,
            error: error.to_string(),
        });
    }

    /// Record a file skipped by cancellation
    pub fn record_file_skipped(&mut self) {
        self.files_skipped += 1;
    }

    /// Fold the loader's final statistics into the run
    pub fn absorb_load(&mut self, stats: LoadStats, failed_batches: Vec<FailedBatch>) {
        self.rows_loaded = stats.rows_loaded;
        self.rows_failed_load = stats.rows_failed_load;
        self.failed_batches = failed_batches;
        self.load_stats = stats;
    }

    /// Close out the run: set the terminal state and compute the status
    pub fn finalize(&mut self, interrupted: bool, duration: Duration) {
        self.duration = duration;

        let all_files_failed =
            self.files_discovered > 0 && self.files_failed == self.files_discovered;

        if interrupted {
            self.transition(RunState::Aborted);
            self.status = if self.rows_loaded > 0 {
                RunStatus::Partial
            } else {
                RunStatus::Failed
            };
        } else if all_files_failed {
            self.transition(RunState::Aborted);
            self.status = RunStatus::Failed;
        } else {
            self.transition(RunState::Completed);
            self.status = if self.is_clean() {
                RunStatus::Success
            } else {
                RunStatus::Partial
            };
        }
    }

    /// Whether the run degraded anywhere short of fatal
    fn is_clean(&self) -> bool {
        self.rows_rejected == 0
            && self.rows_failed_load == 0
            && self.files_failed == 0
            && self.files_skipped == 0
            && self.load_stats.quarantine_failures == 0
    }
}
