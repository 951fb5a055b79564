//! Practice Processor Library
//!
//! A Rust library for ingesting batting-practice session spreadsheets,
//! validating and normalizing the recorded metrics, and loading clean
//! records into a relational store for downstream reporting.
//!
//! This library provides tools for:
//! - Reading spreadsheet workbooks (.xlsx and .csv) with tolerant,
//!   case-insensitive header mapping
//! - Validating rows against range and categorical rules with a fixed
//!   rule order and per-row rejection reason codes
//! - Loading accepted metrics in atomic, idempotently-upserted batches
//!   with retry and backoff on transient storage failures
//! - Quarantining rejected rows for audit without coupling them to the
//!   accepted-data transaction
//! - Orchestrating the extract/transform/load stages into a supervised
//!   run with a structured result report

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod batch_loader;
        pub mod metric_store;
        pub mod pipeline;
        pub mod row_validator;
        pub mod workbook_reader;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{ContactQuality, PracticeMetric, RawRecord, RejectReason, RejectedRecord};
pub use config::Settings;

use std::path::{Path, PathBuf};

/// Result type alias for the practice processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for practice-metric processing operations
///
/// Row-level validation failures are deliberately absent: a row that fails
/// validation becomes a [`RejectedRecord`], never an `Error`, so a single
/// bad row can never abort a run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error (fatal, aborts before any stage runs)
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Extraction failed for a single input file
    #[error("extraction failed for '{file}': {reason}")]
    Extraction { file: PathBuf, reason: String },

    /// A required column header is absent from a sheet
    #[error("required column '{column}' missing from sheet '{sheet}' of '{file}'")]
    MissingHeader {
        file: PathBuf,
        sheet: String,
        column: String,
    },

    /// CSV parsing error
    #[error("CSV parsing error in '{file}': {message}")]
    CsvParsing {
        file: PathBuf,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Spreadsheet workbook error (unreadable, encrypted, or malformed)
    #[error("spreadsheet error in '{file}': {message}")]
    Spreadsheet { file: PathBuf, message: String },

    /// Storage failure expected to clear on retry (lock contention, busy
    /// database)
    #[error("transient storage error: {message}")]
    TransientStorage { message: String },

    /// Storage failure that will not clear on retry
    #[error("storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// A blocking operation exceeded its configured deadline
    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// Processing interrupted (operator-requested stop)
    #[error("processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a file-scoped extraction error
    pub fn extraction(file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Extraction {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing-header error
    pub fn missing_header(
        file: impl Into<PathBuf>,
        sheet: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self::MissingHeader {
            file: file.into(),
            sheet: sheet.into(),
            column: column.into(),
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<PathBuf>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a spreadsheet workbook error
    pub fn spreadsheet(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Spreadsheet {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a transient storage error
    pub fn transient_storage(message: impl Into<String>) -> Self {
        Self::TransientStorage {
            message: message.into(),
        }
    }

    /// Create a persistent storage error
    pub fn storage(message: impl Into<String>, source: Option<rusqlite::Error>) -> Self {
        Self::Storage {
            message: message.into(),
            source,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            seconds,
        }
    }

    /// Create an interrupted error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }

    /// Whether this error is expected to clear on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientStorage { .. } | Self::Timeout { .. })
    }

    /// Attach a file path to errors raised below the file boundary,
    /// collapsing them into a file-scoped extraction error
    pub fn into_extraction(self, file: &Path) -> Self {
        match self {
            already_scoped @ (Self::Extraction { .. }
            | Self::MissingHeader { .. }
            | Self::CsvParsing { .. }
            | Self::Spreadsheet { .. }) => already_scoped,
            other => Self::extraction(file, other.to_string()),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        // Lock contention and busy-database failures clear on retry and are
        // classified transient; everything else is persistent.
        if let rusqlite::Error::SqliteFailure(inner, _) = &error {
            if matches!(
                inner.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) {
                return Self::TransientStorage {
                    message: error.to_string(),
                };
            }
        }
        Self::Storage {
            message: error.to_string(),
            source: Some(error),
        }
    }
}
