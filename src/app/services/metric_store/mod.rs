//! Relational storage for practice metrics and quarantined rows
//!
//! The loader's transaction and retry logic talks to storage exclusively
//! through the narrow [`MetricStore`] trait, so it can be exercised against
//! the in-memory fake without a database on disk. Two implementations ship:
//!
//! - [`SqliteMetricStore`] - production store backed by rusqlite
//! - [`MemoryMetricStore`] - in-memory fake with failure injection, also
//!   backing `--dry-run` executions
//!
//! Downstream reporting (the dashboard) consumes only the persisted
//! `practice_metrics` table; [`PlayerDaySummary`] is the read-side shape
//! the `summary` command exposes over it.

pub mod memory;
pub mod schema;
pub mod sqlite;

#[cfg(test)]
pub mod tests;

use crate::{PracticeMetric, RejectedRecord, Result};
use chrono::NaiveDate;

// Re-export main types for easy access
pub use memory::{MemoryMetricStore, StoreFault};
pub use sqlite::SqliteMetricStore;

/// Narrow persistence contract used by the batch loader
///
/// `upsert_batch` must be atomic: either every row in the slice is
/// persisted or none is. Upserts key on the metric's natural key and
/// overwrite the metric fields of an existing row, which is what makes
/// re-running a pipeline against unchanged input duplicate-free.
pub trait MetricStore: Send {
    /// Atomically upsert one batch of accepted metrics, returning the
    /// number of rows written
    fn upsert_batch(&mut self, batch: &[PracticeMetric]) -> Result<usize>;

    /// Append rejected rows to the quarantine table, outside any metric
    /// transaction
    fn write_rejections(&mut self, rejections: &[RejectedRecord]) -> Result<usize>;

    /// Total rows in the metrics table
    fn metric_count(&self) -> Result<u64>;

    /// Total rows in the quarantine table
    fn rejection_count(&self) -> Result<u64>;

    /// Per-player, per-day aggregates over the metrics table
    fn player_day_summary(&self) -> Result<Vec<PlayerDaySummary>>;
}

/// One player-day aggregate row from the metrics table
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDaySummary {
    pub player_name: String,
    pub session_date: NaiveDate,
    /// Swings recorded for the player on the day
    pub swings: u64,
    pub avg_exit_velocity: f64,
    pub max_distance: f64,
    /// Share of swings graded Hard, in percent
    pub hard_hit_pct: f64,
}
