//! Command-line argument definitions for the practice processor
//!
//! Configuration is environment-first: every flag here is an override on
//! top of the `PRACTICE_*` variables resolved by
//! [`Settings::from_env`](crate::Settings::from_env).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the practice-metric pipeline
#[derive(Debug, Clone, Parser)]
#[command(
    name = "practice-processor",
    version,
    about = "Ingest batting-practice spreadsheets into a SQLite metrics store",
    long_about = "Batch pipeline that extracts batting-practice session spreadsheets, \
                  validates and normalizes the recorded metrics, and loads clean records \
                  into a relational store for downstream reporting. Rejected rows are \
                  quarantined with a reason code; re-running against unchanged input is \
                  duplicate-free."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    pub log_level: String,
}

impl Args {
    /// Resolve the subcommand, defaulting to `run` with no overrides
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Execute a pipeline run (default command)
    Run(RunArgs),
    /// Report per-player, per-day aggregates from the metrics table
    Summary(SummaryArgs),
}

/// Arguments for the run command
#[derive(Debug, Clone, Default, Parser)]
pub struct RunArgs {
    /// Input workbook file or directory of workbooks
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input_path: Option<PathBuf>,

    /// SQLite database file receiving metrics and quarantined rows
    #[arg(short = 'd', long = "database", value_name = "PATH")]
    pub database_path: Option<PathBuf>,

    /// Accepted rows per storage transaction
    #[arg(long = "batch-size", value_name = "ROWS")]
    pub batch_size: Option<usize>,

    /// Regex selecting which workbook sheets to read (default: first sheet)
    #[arg(long = "sheet-pattern", value_name = "REGEX")]
    pub sheet_pattern: Option<String>,

    /// Maximum number of input files processed concurrently
    #[arg(long = "max-files", value_name = "COUNT")]
    pub max_concurrent_files: Option<usize>,

    /// Validate and report without persisting anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// Arguments for the summary command
#[derive(Debug, Clone, Default, Parser)]
pub struct SummaryArgs {
    /// SQLite database file to read (read-only)
    #[arg(short = 'd', long = "database", value_name = "PATH")]
    pub database_path: Option<PathBuf>,
}
