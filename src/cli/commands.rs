//! Command implementations for the practice processor CLI
//!
//! Dispatches the parsed arguments, resolves configuration (environment
//! first, CLI flags override), runs the pipeline, and renders the run
//! report. The run report enumerates every rejection reason with a count
//! and every failed batch with its retry count, so operators can triage
//! without re-reading logs.

use anyhow::{bail, Context};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::app::services::metric_store::{MetricStore, SqliteMetricStore};
use crate::app::services::pipeline::{PipelineOrchestrator, RunResult};
use crate::cli::args::{Args, Commands, RunArgs, SummaryArgs};
use crate::config::Settings;

/// Main command runner
pub async fn run(args: Args, cancel: CancellationToken) -> anyhow::Result<i32> {
    match args.get_command() {
        Commands::Run(run_args) => run_pipeline(run_args, cancel).await,
        Commands::Summary(summary_args) => run_summary(summary_args).await,
    }
}

/// Set up structured logging to stderr
///
/// `RUST_LOG` wins when set; otherwise the crate logs at the CLI-selected
/// level.
pub fn setup_logging(log_level: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("practice_processor={log_level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {log_level}");
}

/// Resolve settings from the environment, then apply CLI overrides
fn build_settings(args: &RunArgs) -> crate::Result<Settings> {
    let mut settings = Settings::from_env()?;

    if let Some(path) = &args.input_path {
        settings = settings.with_input_path(path);
    }
    if let Some(path) = &args.database_path {
        settings = settings.with_database_path(path);
    }
    if let Some(batch_size) = args.batch_size {
        settings = settings.with_batch_size(batch_size);
    }
    if let Some(pattern) = &args.sheet_pattern {
        settings = settings.with_sheet_pattern(pattern);
    }
    if let Some(max_files) = args.max_concurrent_files {
        settings = settings.with_max_concurrent_files(max_files);
    }

    settings.validate()?;
    Ok(settings)
}

async fn run_pipeline(args: RunArgs, cancel: CancellationToken) -> anyhow::Result<i32> {
    let settings = build_settings(&args).context("failed to resolve configuration")?;
    info!(
        "Ingesting {} into {}",
        settings.input_path.display(),
        settings.database_path.display()
    );

    let run = PipelineOrchestrator::new(settings)
        .with_dry_run(args.dry_run)
        .execute(cancel)
        .await
        .context("pipeline run aborted")?;

    print_run_report(&run);
    Ok(run.status.exit_code())
}

/// Render the run report for the operator
fn print_run_report(run: &RunResult) {
    println!();
    println!(
        "Run {} ({}) in {:.2}s",
        run.status,
        run.state,
        run.duration.as_secs_f64()
    );
    println!(
        "  Files:  {} processed, {} failed, {} skipped (of {} discovered)",
        run.files_processed, run.files_failed, run.files_skipped, run.files_discovered
    );
    println!(
        "  Rows:   {} read, {} accepted, {} rejected",
        run.rows_read, run.rows_accepted, run.rows_rejected
    );
    println!(
        "  Loaded: {} rows in {} batch(es), {} retries; {} rows in {} failed batch(es)",
        run.rows_loaded,
        run.load_stats.batches_committed,
        run.load_stats.retries,
        run.rows_failed_load,
        run.load_stats.batches_failed
    );
    println!(
        "  Audit:  {} rejections quarantined, {} quarantine write(s) failed",
        run.load_stats.rejections_quarantined, run.load_stats.quarantine_failures
    );

    if !run.rejection_counts.is_empty() {
        println!("Rejections by reason:");
        for (reason, count) in &run.rejection_counts {
            println!("  {:<20} {count}", reason.code());
        }
    }

    if !run.failed_batches.is_empty() {
        println!("Failed batches:");
        for batch in &run.failed_batches {
            println!(
                "  batch {} ({} rows, {} attempts): {}",
                batch.batch_index, batch.rows, batch.attempts, batch.error
            );
        }
    }

    if !run.file_errors.is_empty() {
        println!("File errors:");
        for file_error in &run.file_errors {
            println!("  {}: {}", file_error.file.display(), file_error.error);
        }
    }
}

async fn run_summary(args: SummaryArgs) -> anyhow::Result<i32> {
    let mut settings = Settings::from_env().context("failed to resolve configuration")?;
    if let Some(path) = &args.database_path {
        settings = settings.with_database_path(path);
    }

    if !settings.database_path.exists() {
        bail!(
            "database '{}' does not exist; run the pipeline first",
            settings.database_path.display()
        );
    }

    let store = SqliteMetricStore::open(&settings.database_path, settings.io_timeout)?;
    let summaries = store.player_day_summary()?;
    let metrics = store.metric_count()?;
    let rejections = store.rejection_count()?;

    if summaries.is_empty() {
        println!("No practice metrics loaded yet.");
    } else {
        println!(
            "{:<24} {:<12} {:>7} {:>8} {:>9} {:>8}",
            "Player", "Date", "Swings", "Avg EV", "Max Dist", "Hard %"
        );
        for s in &summaries {
            println!(
                "{:<24} {:<12} {:>7} {:>8.1} {:>9.0} {:>7.1}%",
                s.player_name,
                s.session_date.to_string(),
                s.swings,
                s.avg_exit_velocity,
                s.max_distance,
                s.hard_hit_pct
            );
        }
    }
    println!();
    println!("{metrics} metric row(s), {rejections} quarantined row(s)");

    Ok(0)
}
