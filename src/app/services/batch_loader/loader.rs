//! The buffered batch loader and its retry loop

use std::time::Duration;
use tracing::{debug, error, warn};

use super::stats::{FailedBatch, LoadStats};
use crate::app::services::metric_store::MetricStore;
use crate::config::Settings;
use crate::constants;
use crate::{PracticeMetric, RejectedRecord};

/// Loader tunables, resolved from settings
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Rows per transaction
    pub batch_size: usize,

    /// Total commit attempts per batch (first try plus retries)
    pub max_attempts: u32,

    /// Base delay for exponential backoff between attempts
    pub backoff_base: Duration,
}

impl LoaderConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            batch_size: settings.batch_size,
            max_attempts: settings.max_load_attempts,
            backoff_base: settings.retry_backoff,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: constants::DEFAULT_BATCH_SIZE,
            max_attempts: constants::DEFAULT_MAX_LOAD_ATTEMPTS,
            backoff_base: Duration::from_millis(constants::DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

/// Buffered, retrying writer of accepted metrics
///
/// Owns the store exclusively for the duration of a load; callers get the
/// store back (with statistics and failed-batch records) via
/// [`into_parts`](BatchLoader::into_parts) once the stream is drained.
pub struct BatchLoader<S: MetricStore> {
    store: S,
    config: LoaderConfig,
    buffer: Vec<PracticeMetric>,
    stats: LoadStats,
    failed_batches: Vec<FailedBatch>,
    next_batch_index: usize,
}

impl<S: MetricStore> BatchLoader<S> {
    pub fn new(store: S, config: LoaderConfig) -> Self {
        Self {
            store,
            config,
            buffer: Vec::new(),
            stats: LoadStats::new(),
            failed_batches: Vec::new(),
            next_batch_index: 0,
        }
    }

    /// Buffer one accepted metric, committing a batch when the buffer
    /// reaches the configured size
    pub async fn push(&mut self, metric: PracticeMetric) {
        self.buffer.push(metric);
        if self.buffer.len() >= self.config.batch_size {
            self.commit_buffered().await;
        }
    }

    /// Commit whatever remains in the buffer as a final, short batch
    pub async fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.commit_buffered().await;
        }
    }

    /// Write rejected rows to quarantine, best-effort
    ///
    /// Quarantine data is audit data: a failed write is logged and counted
    /// but never affects accepted batches or the retry budget.
    pub fn quarantine(&mut self, rejections: &[RejectedRecord]) {
        if rejections.is_empty() {
            return;
        }
        match self.store.write_rejections(rejections) {
            Ok(written) => self.stats.rejections_quarantined += written,
            Err(e) => {
                self.stats.quarantine_failures += rejections.len();
                warn!(
                    "Quarantine write failed for {} rows: {e}",
                    rejections.len()
                );
            }
        }
    }

    /// Rows currently buffered and not yet committed
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Statistics so far
    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// Tear down into the store, final statistics, and failed batches
    pub fn into_parts(self) -> (S, LoadStats, Vec<FailedBatch>) {
        (self.store, self.stats, self.failed_batches)
    }

    async fn commit_buffered(&mut self) {
        let batch = std::mem::take(&mut self.buffer);
        self.commit_batch(batch).await;
    }

    /// Commit one batch, retrying transient failures with exponential
    /// backoff until the attempt budget is spent
    async fn commit_batch(&mut self, batch: Vec<PracticeMetric>) {
        let batch_index = self.next_batch_index;
        self.next_batch_index += 1;

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.store.upsert_batch(&batch) {
                Ok(rows) => {
                    self.stats.batches_committed += 1;
                    self.stats.rows_loaded += rows;
                    debug!(
                        "Committed batch {batch_index} ({rows} rows, attempt {attempt})"
                    );
                    return;
                }
                Err(e) if e.is_transient() && attempt < self.config.max_attempts => {
                    self.stats.retries += 1;
                    let delay = self.config.backoff_base * 2u32.pow(attempt - 1);
                    warn!(
                        "Batch {batch_index} attempt {attempt} hit a transient failure, \
                         retrying in {delay:?}: {e}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(
                        "Batch {batch_index} failed after {attempt} attempt(s), \
                         dropping {} rows: {e}",
                        batch.len()
                    );
                    self.stats.batches_failed += 1;
                    self.stats.rows_failed_load += batch.len();
                    self.failed_batches.push(FailedBatch {
                        batch_index,
                        rows: batch.len(),
                        attempts: attempt,
                        error: e.to_string(),
                    });
                    return;
                }
            }
        }
    }
}
