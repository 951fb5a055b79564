//! Worker fan-out, loader task, and run supervision

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::progress::ProgressReporter;
use super::run_result::{RunResult, RunState};
use crate::app::services::batch_loader::{BatchLoader, FailedBatch, LoadStats, LoaderConfig};
use crate::app::services::metric_store::{MemoryMetricStore, MetricStore, SqliteMetricStore};
use crate::app::services::row_validator::{RowOutcome, ValidationRules, ValidationStats};
use crate::app::services::workbook_reader::{
    discover_input_files, ExtractStats, FileExtract, WorkbookReader,
};
use crate::config::Settings;
use crate::{Error, PracticeMetric, RejectedRecord, Result};

/// Rejections are quarantined in chunks to keep audit writes off the
/// per-row hot path
const QUARANTINE_CHUNK: usize = 64;

/// One validated row crossing the worker/loader queue
enum PipelineEvent {
    Accepted(PracticeMetric),
    Rejected(RejectedRecord),
}

/// Per-file outcome reported by a worker
enum FileResult {
    /// Extraction and validation completed
    Processed(ExtractStats, ValidationStats),
    /// The run was cancelled before this file was touched
    Skipped,
    /// Extraction failed; siblings are unaffected
    Failed(Error),
}

struct FileOutcome {
    file: PathBuf,
    result: FileResult,
}

/// Supervisor for one pipeline run
///
/// Owns nothing between runs: every execution builds its own reader,
/// rules, store, and queue, and reports through a fresh [`RunResult`].
pub struct PipelineOrchestrator {
    settings: Settings,
    dry_run: bool,
}

impl PipelineOrchestrator {
    /// Create an orchestrator over resolved settings
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            dry_run: false,
        }
    }

    /// Run against the in-memory store instead of SQLite, persisting
    /// nothing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute one full pipeline run
    ///
    /// Returns `Err` only for failures that abort before any stage can
    /// run (invalid configuration, unusable database). Everything that
    /// happens after that, from rejected rows to failed batches to
    /// cancellation, is reported in the returned [`RunResult`].
    pub async fn execute(&self, cancel: CancellationToken) -> Result<RunResult> {
        let started = Instant::now();
        self.settings.validate()?;

        let mut run = RunResult::new();

        let files = discover_input_files(&self.settings.input_path)?;
        run.files_discovered = files.len();
        if files.is_empty() {
            warn!(
                "No workbook files found under {}",
                self.settings.input_path.display()
            );
            run.finalize(false, started.elapsed());
            return Ok(run);
        }
        info!(
            "Discovered {} workbook file(s) under {}",
            files.len(),
            self.settings.input_path.display()
        );

        let interrupted = if self.dry_run {
            info!("Dry run: loading into an in-memory store, nothing will be persisted");
            self.execute_with_store(MemoryMetricStore::new(), files, cancel, &mut run)
                .await?
        } else {
            let store =
                SqliteMetricStore::open(&self.settings.database_path, self.settings.io_timeout)?;
            self.execute_with_store(store, files, cancel, &mut run)
                .await?
        };

        run.finalize(interrupted, started.elapsed());
        Ok(run)
    }

    /// Drive the run against an opened store; returns whether the run was
    /// interrupted by cancellation
    async fn execute_with_store<S>(
        &self,
        store: S,
        files: Vec<PathBuf>,
        cancel: CancellationToken,
        run: &mut RunResult,
    ) -> Result<bool>
    where
        S: MetricStore + 'static,
    {
        let reader = WorkbookReader::from_settings(&self.settings)?;
        let rules = Arc::new(ValidationRules::from_settings(&self.settings));
        let loader = BatchLoader::new(store, LoaderConfig::from_settings(&self.settings));

        // Bounded queue between the per-file workers and the single loader
        // task; the loader owning all writes is what serializes commits on
        // the natural-key space.
        let (events, event_rx) = mpsc::channel(self.settings.batch_size.max(64));
        let loader_task = tokio::spawn(run_loader(loader, event_rx, cancel.clone()));

        run.transition(RunState::Extracting);
        let mut progress = ProgressReporter::new();
        progress.setup_progress(files.len());

        let semaphore = Arc::new(Semaphore::new(self.settings.max_concurrent_files));
        let mut workers = JoinSet::new();
        for file in files {
            workers.spawn(process_file(
                file,
                reader.clone(),
                Arc::clone(&rules),
                events.clone(),
                Arc::clone(&semaphore),
                cancel.clone(),
                self.settings.io_timeout,
            ));
        }
        drop(events);

        while let Some(joined) = workers.join_next().await {
            progress.increment();
            match joined {
                Ok(outcome) => match outcome.result {
                    FileResult::Processed(extract, validation) => {
                        info!(
                            "Processed {}: {} rows read, {} accepted, {} rejected",
                            outcome.file.display(),
                            extract.rows_read,
                            validation.accepted,
                            validation.rejected
                        );
                        run.absorb_file(&extract, &validation);
                    }
                    FileResult::Skipped => {
                        warn!("Skipped {} (run cancelled)", outcome.file.display());
                        run.record_file_skipped();
                    }
                    FileResult::Failed(e) => {
                        error!("Extraction failed for {}: {e}", outcome.file.display());
                        run.record_file_error(outcome.file, &e);
                    }
                },
                Err(join_error) => {
                    error!("File worker panicked: {join_error}");
                    run.record_file_error(
                        PathBuf::from("<unknown>"),
                        &Error::extraction("<unknown>", join_error.to_string()),
                    );
                }
            }
        }
        progress.finish();

        // Workers validate rows as they extract them, so both stages are
        // complete once the last worker joins; only the loader remains.
        run.transition(RunState::Transforming);
        run.transition(RunState::Loading);

        let (load_stats, failed_batches, interrupted) = loader_task
            .await
            .map_err(|e| Error::storage(format!("loader task failed: {e}"), None))?;
        run.absorb_load(load_stats, failed_batches);

        Ok(interrupted || cancel.is_cancelled())
    }
}

/// Extract and validate one file, streaming outcomes into the loader queue
async fn process_file(
    file: PathBuf,
    reader: WorkbookReader,
    rules: Arc<ValidationRules>,
    events: mpsc::Sender<PipelineEvent>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
    io_timeout: Duration,
) -> FileOutcome {
    let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            return FileOutcome {
                result: FileResult::Failed(Error::interrupted("worker pool closed")),
                file,
            };
        }
    };

    // Cancellation is honored between files, never mid-file
    if cancel.is_cancelled() {
        return FileOutcome {
            result: FileResult::Skipped,
            file,
        };
    }

    // File I/O runs on the blocking pool under the configured deadline
    let blocking_reader = reader.clone();
    let blocking_path = file.clone();
    let extraction = tokio::time::timeout(
        io_timeout,
        tokio::task::spawn_blocking(move || blocking_reader.read_file(&blocking_path)),
    )
    .await;

    let FileExtract { records, stats } = match extraction {
        Err(_) => {
            return FileOutcome {
                result: FileResult::Failed(Error::timeout(
                    format!("extraction of '{}'", file.display()),
                    io_timeout.as_secs(),
                )),
                file,
            };
        }
        Ok(Err(join_error)) => {
            return FileOutcome {
                result: FileResult::Failed(Error::extraction(
                    &file,
                    format!("extraction worker panicked: {join_error}"),
                )),
                file,
            };
        }
        Ok(Ok(Err(e))) => {
            return FileOutcome {
                result: FileResult::Failed(e),
                file,
            };
        }
        Ok(Ok(Ok(extract))) => extract,
    };

    let mut validation = ValidationStats::new();
    for record in records {
        let event = match rules.validate(&record) {
            RowOutcome::Accepted(metric) => {
                validation.record_accepted();
                PipelineEvent::Accepted(metric)
            }
            RowOutcome::Rejected(rejected) => {
                validation.record_rejection(rejected.reason);
                PipelineEvent::Rejected(rejected)
            }
        };
        if events.send(event).await.is_err() {
            // Loader is gone, which only happens on cancellation
            return FileOutcome {
                result: FileResult::Skipped,
                file,
            };
        }
    }

    FileOutcome {
        result: FileResult::Processed(stats, validation),
        file,
    }
}

/// Drain the event queue into the store
///
/// The loader task owns the run's only storage handle; it is released when
/// this function returns, whatever the exit path.
async fn run_loader<S: MetricStore>(
    mut loader: BatchLoader<S>,
    mut events: mpsc::Receiver<PipelineEvent>,
    cancel: CancellationToken,
) -> (LoadStats, Vec<FailedBatch>, bool) {
    let mut pending_rejections: Vec<RejectedRecord> = Vec::new();
    let mut interrupted = false;

    while let Some(event) = events.recv().await {
        // Checked between storage operations, never mid-transaction, so a
        // cancelled run leaves no half-applied commit behind.
        if cancel.is_cancelled() {
            interrupted = true;
            break;
        }
        match event {
            PipelineEvent::Accepted(metric) => loader.push(metric).await,
            PipelineEvent::Rejected(rejected) => {
                pending_rejections.push(rejected);
                if pending_rejections.len() >= QUARANTINE_CHUNK {
                    loader.quarantine(&pending_rejections);
                    pending_rejections.clear();
                }
            }
        }
    }
    events.close();

    if interrupted {
        warn!(
            "Loader stopped by cancellation, {} buffered row(s) left uncommitted",
            loader.buffered()
        );
    } else {
        loader.quarantine(&pending_rejections);
        loader.flush().await;
    }

    let (store, stats, failed_batches) = loader.into_parts();
    drop(store);
    (stats, failed_batches, interrupted)
}
