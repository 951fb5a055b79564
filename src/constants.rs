//! Application constants for the practice processor
//!
//! This module contains the canonical column names, default configuration
//! values, and environment variable names used throughout the pipeline.

// =============================================================================
// Spreadsheet Columns
// =============================================================================

/// Canonical column names as stored on [`crate::RawRecord`]s
pub mod columns {
    pub const PLAYER_NAME: &str = "player_name";
    pub const SESSION_DATE: &str = "session_date";
    pub const DRILL_TYPE: &str = "drill_type";
    pub const EXIT_VELOCITY: &str = "exit_velocity";
    pub const LAUNCH_ANGLE: &str = "launch_angle";
    pub const DISTANCE: &str = "distance";
    pub const QUALITY_OF_CONTACT: &str = "quality_of_contact";

    /// Every column a sheet must carry for extraction to succeed
    pub const REQUIRED: &[&str] = &[
        PLAYER_NAME,
        SESSION_DATE,
        DRILL_TYPE,
        EXIT_VELOCITY,
        LAUNCH_ANGLE,
        DISTANCE,
        QUALITY_OF_CONTACT,
    ];

    /// Accepted alternate spellings, mapped to their canonical name.
    /// Session sheets exported from the team's template label the date
    /// column plain `date`.
    pub const ALIASES: &[(&str, &str)] = &[("date", SESSION_DATE)];
}

// =============================================================================
// Validation Defaults
// =============================================================================

/// Default accepted `session_date` formats (chrono strftime syntax).
/// The first matching format wins.
pub const DEFAULT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Default drill-type allow-list, in canonical spelling
pub const DEFAULT_DRILL_TYPES: &[&str] =
    &["Tee", "Front Toss", "Soft Toss", "Machine", "Live BP"];

/// Default exit velocity bounds in mph
pub const DEFAULT_EXIT_VELOCITY_MIN: f64 = 0.0;
pub const DEFAULT_EXIT_VELOCITY_MAX: f64 = 130.0;

/// Default launch angle bounds in degrees
pub const DEFAULT_LAUNCH_ANGLE_MIN: f64 = -90.0;
pub const DEFAULT_LAUNCH_ANGLE_MAX: f64 = 90.0;

/// Default carry distance bounds in feet
pub const DEFAULT_DISTANCE_MIN: f64 = 0.0;
pub const DEFAULT_DISTANCE_MAX: f64 = 600.0;

// =============================================================================
// Loader Defaults
// =============================================================================

/// Rows per storage transaction
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Total attempts per batch (first try plus retries)
pub const DEFAULT_MAX_LOAD_ATTEMPTS: u32 = 4;

/// Base delay for exponential retry backoff, in milliseconds
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

/// Deadline for blocking file and database operations, in seconds
pub const DEFAULT_IO_TIMEOUT_SECS: u64 = 30;

/// Default database path when none is configured
pub const DEFAULT_DATABASE_PATH: &str = "practice_metrics.db";

/// Upper bound on concurrently processed input files; the effective
/// default is the machine's core count capped at this value
pub const MAX_CONCURRENT_FILES_CAP: usize = 8;

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable names read by [`crate::Settings::from_env`]
pub mod env_vars {
    pub const DATABASE_PATH: &str = "PRACTICE_DATABASE_PATH";
    pub const INPUT_PATH: &str = "PRACTICE_INPUT_PATH";
    pub const BATCH_SIZE: &str = "PRACTICE_BATCH_SIZE";
    pub const SHEET_PATTERN: &str = "PRACTICE_SHEET_PATTERN";
    pub const DATE_FORMATS: &str = "PRACTICE_DATE_FORMATS";
    pub const DRILL_TYPES: &str = "PRACTICE_DRILL_TYPES";
    pub const EXIT_VELOCITY_MIN: &str = "PRACTICE_EXIT_VELOCITY_MIN";
    pub const EXIT_VELOCITY_MAX: &str = "PRACTICE_EXIT_VELOCITY_MAX";
    pub const LAUNCH_ANGLE_MIN: &str = "PRACTICE_LAUNCH_ANGLE_MIN";
    pub const LAUNCH_ANGLE_MAX: &str = "PRACTICE_LAUNCH_ANGLE_MAX";
    pub const DISTANCE_MIN: &str = "PRACTICE_DISTANCE_MIN";
    pub const DISTANCE_MAX: &str = "PRACTICE_DISTANCE_MAX";
    pub const MAX_LOAD_ATTEMPTS: &str = "PRACTICE_MAX_LOAD_ATTEMPTS";
    pub const RETRY_BACKOFF_MS: &str = "PRACTICE_RETRY_BACKOFF_MS";
    pub const IO_TIMEOUT_SECS: &str = "PRACTICE_IO_TIMEOUT_SECS";
    pub const MAX_CONCURRENT_FILES: &str = "PRACTICE_MAX_CONCURRENT_FILES";
}

/// File extensions recognized as input workbooks
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];
