//! Configuration management and validation.
//!
//! Provides the typed [`Settings`] object resolved from environment
//! variables, with builder-style overrides for callers (CLI flags, tests)
//! and validation of every tunable before a run starts.

use crate::constants::{self, env_vars};
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Accepted value ranges for the numeric metrics
///
/// Bounds are configuration rather than hard-coded constants so they can be
/// tuned per deployment without touching validation logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBounds {
    /// Exit velocity range in mph
    pub exit_velocity: RangeInclusive<f64>,

    /// Launch angle range in degrees
    pub launch_angle: RangeInclusive<f64>,

    /// Carry distance range in feet
    pub distance: RangeInclusive<f64>,
}

impl Default for MetricBounds {
    fn default() -> Self {
        Self {
            exit_velocity: constants::DEFAULT_EXIT_VELOCITY_MIN
                ..=constants::DEFAULT_EXIT_VELOCITY_MAX,
            launch_angle: constants::DEFAULT_LAUNCH_ANGLE_MIN
                ..=constants::DEFAULT_LAUNCH_ANGLE_MAX,
            distance: constants::DEFAULT_DISTANCE_MIN..=constants::DEFAULT_DISTANCE_MAX,
        }
    }
}

impl MetricBounds {
    /// Validate that every range is finite, non-empty, and inside the
    /// window the storage schema CHECKs unconditionally
    ///
    /// The store refuses negative velocities/distances and launch angles
    /// outside [-90, 90] regardless of configuration, so a configured
    /// range may narrow those windows but never widen them; otherwise the
    /// validator would accept rows the store must refuse, sinking their
    /// whole batch.
    pub fn validate(&self) -> Result<()> {
        for (name, range) in [
            ("exit_velocity", &self.exit_velocity),
            ("launch_angle", &self.launch_angle),
            ("distance", &self.distance),
        ] {
            if !range.start().is_finite() || !range.end().is_finite() {
                return Err(Error::configuration(format!(
                    "{name} bounds must be finite, got {:?}..={:?}",
                    range.start(),
                    range.end()
                )));
            }
            if range.start() > range.end() {
                return Err(Error::configuration(format!(
                    "{name} lower bound {} exceeds upper bound {}",
                    range.start(),
                    range.end()
                )));
            }
        }

        for (name, range) in [
            ("exit_velocity", &self.exit_velocity),
            ("distance", &self.distance),
        ] {
            if *range.start() < 0.0 {
                return Err(Error::configuration(format!(
                    "{name} lower bound {} must not be negative",
                    range.start()
                )));
            }
        }

        if *self.launch_angle.start() < constants::DEFAULT_LAUNCH_ANGLE_MIN
            || *self.launch_angle.end() > constants::DEFAULT_LAUNCH_ANGLE_MAX
        {
            return Err(Error::configuration(format!(
                "launch_angle bounds [{}, {}] must stay within [{}, {}]",
                self.launch_angle.start(),
                self.launch_angle.end(),
                constants::DEFAULT_LAUNCH_ANGLE_MIN,
                constants::DEFAULT_LAUNCH_ANGLE_MAX
            )));
        }

        Ok(())
    }
}

/// Global configuration for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// SQLite database file receiving metrics and quarantined rows
    pub database_path: PathBuf,

    /// Input workbook file, or directory of workbooks
    pub input_path: PathBuf,

    /// Accepted rows per storage transaction
    pub batch_size: usize,

    /// Regex selecting which workbook sheets to read; `None` reads the
    /// first sheet only
    pub sheet_pattern: Option<String>,

    /// Accepted `session_date` formats, tried in order
    pub date_formats: Vec<String>,

    /// Drill-type allow-list in canonical spelling
    pub drill_types: Vec<String>,

    /// Accepted numeric ranges
    pub bounds: MetricBounds,

    /// Total commit attempts per batch before it is marked failed
    pub max_load_attempts: u32,

    /// Base delay for exponential retry backoff
    pub retry_backoff: Duration,

    /// Deadline for blocking file and database operations
    pub io_timeout: Duration,

    /// Maximum number of input files processed concurrently
    pub max_concurrent_files: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(constants::DEFAULT_DATABASE_PATH),
            input_path: PathBuf::from("data"),
            batch_size: constants::DEFAULT_BATCH_SIZE,
            sheet_pattern: None,
            date_formats: constants::DEFAULT_DATE_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            drill_types: constants::DEFAULT_DRILL_TYPES
                .iter()
                .map(|d| d.to_string())
                .collect(),
            bounds: MetricBounds::default(),
            max_load_attempts: constants::DEFAULT_MAX_LOAD_ATTEMPTS,
            retry_backoff: Duration::from_millis(constants::DEFAULT_RETRY_BACKOFF_MS),
            io_timeout: Duration::from_secs(constants::DEFAULT_IO_TIMEOUT_SECS),
            max_concurrent_files: num_cpus::get().min(constants::MAX_CONCURRENT_FILES_CAP),
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment, starting from the
    /// built-in defaults
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();
        settings.apply_overrides(|name| std::env::var(name).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply overrides from a key/value source (the environment in
    /// production, a closure in tests)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(path) = lookup(env_vars::DATABASE_PATH) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(env_vars::INPUT_PATH) {
            self.input_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(env_vars::BATCH_SIZE) {
            self.batch_size = parse_var(env_vars::BATCH_SIZE, &value)?;
        }
        if let Some(pattern) = lookup(env_vars::SHEET_PATTERN) {
            self.sheet_pattern = Some(pattern);
        }
        if let Some(value) = lookup(env_vars::DATE_FORMATS) {
            self.date_formats = parse_list(&value);
        }
        if let Some(value) = lookup(env_vars::DRILL_TYPES) {
            self.drill_types = parse_list(&value);
        }
        if let Some(value) = lookup(env_vars::EXIT_VELOCITY_MIN) {
            self.bounds.exit_velocity = parse_var::<f64>(env_vars::EXIT_VELOCITY_MIN, &value)?
                ..=*self.bounds.exit_velocity.end();
        }
        if let Some(value) = lookup(env_vars::EXIT_VELOCITY_MAX) {
            self.bounds.exit_velocity = *self.bounds.exit_velocity.start()
                ..=parse_var::<f64>(env_vars::EXIT_VELOCITY_MAX, &value)?;
        }
        if let Some(value) = lookup(env_vars::LAUNCH_ANGLE_MIN) {
            self.bounds.launch_angle = parse_var::<f64>(env_vars::LAUNCH_ANGLE_MIN, &value)?
                ..=*self.bounds.launch_angle.end();
        }
        if let Some(value) = lookup(env_vars::LAUNCH_ANGLE_MAX) {
            self.bounds.launch_angle = *self.bounds.launch_angle.start()
                ..=parse_var::<f64>(env_vars::LAUNCH_ANGLE_MAX, &value)?;
        }
        if let Some(value) = lookup(env_vars::DISTANCE_MIN) {
            self.bounds.distance =
                parse_var::<f64>(env_vars::DISTANCE_MIN, &value)?..=*self.bounds.distance.end();
        }
        if let Some(value) = lookup(env_vars::DISTANCE_MAX) {
            self.bounds.distance =
                *self.bounds.distance.start()..=parse_var::<f64>(env_vars::DISTANCE_MAX, &value)?;
        }
        if let Some(value) = lookup(env_vars::MAX_LOAD_ATTEMPTS) {
            self.max_load_attempts = parse_var(env_vars::MAX_LOAD_ATTEMPTS, &value)?;
        }
        if let Some(value) = lookup(env_vars::RETRY_BACKOFF_MS) {
            self.retry_backoff =
                Duration::from_millis(parse_var(env_vars::RETRY_BACKOFF_MS, &value)?);
        }
        if let Some(value) = lookup(env_vars::IO_TIMEOUT_SECS) {
            self.io_timeout = Duration::from_secs(parse_var(env_vars::IO_TIMEOUT_SECS, &value)?);
        }
        if let Some(value) = lookup(env_vars::MAX_CONCURRENT_FILES) {
            self.max_concurrent_files = parse_var(env_vars::MAX_CONCURRENT_FILES, &value)?;
        }
        Ok(())
    }

    /// Validate the resolved configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::configuration("batch size must be at least 1"));
        }
        if self.max_load_attempts == 0 {
            return Err(Error::configuration(
                "max load attempts must be at least 1",
            ));
        }
        if self.max_concurrent_files == 0 {
            return Err(Error::configuration(
                "max concurrent files must be at least 1",
            ));
        }
        if self.date_formats.is_empty() {
            return Err(Error::configuration(
                "at least one session date format is required",
            ));
        }
        if self.drill_types.is_empty() || self.drill_types.iter().any(|d| d.trim().is_empty()) {
            return Err(Error::configuration(
                "drill type allow-list must be non-empty with no blank entries",
            ));
        }
        self.bounds.validate()?;
        self.sheet_regex()?;
        Ok(())
    }

    /// Compile the configured sheet pattern, if any
    pub fn sheet_regex(&self) -> Result<Option<Regex>> {
        match &self.sheet_pattern {
            None => Ok(None),
            Some(pattern) => Regex::new(pattern).map(Some).map_err(|e| {
                Error::configuration(format!("invalid sheet pattern '{pattern}': {e}"))
            }),
        }
    }

    /// Override the database path
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Override the input path
    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    /// Override the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Override the sheet-name pattern
    pub fn with_sheet_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.sheet_pattern = Some(pattern.into());
        self
    }

    /// Override the drill-type allow-list
    pub fn with_drill_types(mut self, drill_types: Vec<String>) -> Self {
        self.drill_types = drill_types;
        self
    }

    /// Override the accepted date formats
    pub fn with_date_formats(mut self, date_formats: Vec<String>) -> Self {
        self.date_formats = date_formats;
        self
    }

    /// Override the numeric bounds
    pub fn with_bounds(mut self, bounds: MetricBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Override the per-batch attempt limit
    pub fn with_max_load_attempts(mut self, attempts: u32) -> Self {
        self.max_load_attempts = attempts;
        self
    }

    /// Override the retry backoff base delay
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Override the blocking I/O deadline
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Override the concurrent-file limit
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e| {
        Error::configuration(format!("invalid value '{value}' for {name}: {e}"))
    })
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
