//! SQLite-backed metric store
//!
//! One connection, owned exclusively by its caller for the duration of a
//! run. WAL journaling keeps concurrent readers (the dashboard) off the
//! writer's path, and `busy_timeout` bounds lock waits so contention
//! surfaces as a transient error that the loader's retry policy handles.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::schema;
use super::{MetricStore, PlayerDaySummary};
use crate::{Error, PracticeMetric, RejectedRecord, Result};

const UPSERT_METRIC: &str = "
INSERT INTO practice_metrics (
    player_name, session_date, drill_type, sequence,
    exit_velocity, launch_angle, distance, quality_of_contact,
    source_file, sheet_name, row_index, loaded_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
ON CONFLICT (player_name, session_date, drill_type, sequence) DO UPDATE SET
    exit_velocity = excluded.exit_velocity,
    launch_angle = excluded.launch_angle,
    distance = excluded.distance,
    quality_of_contact = excluded.quality_of_contact,
    source_file = excluded.source_file,
    sheet_name = excluded.sheet_name,
    row_index = excluded.row_index,
    loaded_at = excluded.loaded_at";

const INSERT_REJECTION: &str = "
INSERT INTO rejected_records (
    source_file, sheet_name, row_index, reason, detail, payload, rejected_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// Production metric store backed by a SQLite database file
pub struct SqliteMetricStore {
    conn: Connection,
}

impl SqliteMetricStore {
    /// Open (creating if necessary) the database at `path` and ensure the
    /// schema exists
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| Error::storage(format!("failed to open '{}'", path.display()), Some(e)))?;
        debug!("Opened metric store at {}", path.display());
        Self::initialize(conn, busy_timeout)
    }

    /// Open a private in-memory database (tests)
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?, Duration::from_millis(100))
    }

    fn initialize(conn: Connection, busy_timeout: Duration) -> Result<Self> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(busy_timeout)?;
        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl MetricStore for SqliteMetricStore {
    fn upsert_batch(&mut self, batch: &[PracticeMetric]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let loaded_at = Utc::now().to_rfc3339();

        {
            let mut stmt = tx.prepare_cached(UPSERT_METRIC)?;
            for metric in batch {
                stmt.execute(params![
                    metric.player_name,
                    metric.session_date.to_string(),
                    metric.drill_type,
                    metric.row_index as i64,
                    metric.exit_velocity,
                    metric.launch_angle,
                    metric.distance,
                    metric.contact_quality.as_str(),
                    metric.source_file.to_string_lossy(),
                    metric.sheet_name,
                    metric.row_index as i64,
                    loaded_at,
                ])?;
            }
        }

        tx.commit()?;
        Ok(batch.len())
    }

    fn write_rejections(&mut self, rejections: &[RejectedRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let rejected_at = Utc::now().to_rfc3339();

        {
            let mut stmt = tx.prepare_cached(INSERT_REJECTION)?;
            for rejection in rejections {
                let payload = serde_json::to_string(&rejection.record.fields)
                    .map_err(|e| Error::storage(format!("payload encoding failed: {e}"), None))?;
                stmt.execute(params![
                    rejection.record.source_file.to_string_lossy(),
                    rejection.record.sheet_name,
                    rejection.record.row_index as i64,
                    rejection.reason.code(),
                    rejection.detail,
                    payload,
                    rejected_at,
                ])?;
            }
        }

        tx.commit()?;
        Ok(rejections.len())
    }

    fn metric_count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM practice_metrics", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn rejection_count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM rejected_records", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn player_day_summary(&self) -> Result<Vec<PlayerDaySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT player_name,
                    session_date,
                    COUNT(*),
                    AVG(exit_velocity),
                    MAX(distance),
                    100.0 * SUM(CASE WHEN quality_of_contact = 'Hard' THEN 1 ELSE 0 END)
                        / COUNT(*)
             FROM practice_metrics
             GROUP BY player_name, session_date
             ORDER BY session_date, player_name",
        )?;

        let summaries = stmt
            .query_map([], |row| {
                let date_text: String = row.get(1)?;
                let session_date =
                    NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            1,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                let swings: i64 = row.get(2)?;

                Ok(PlayerDaySummary {
                    player_name: row.get(0)?,
                    session_date,
                    swings: swings as u64,
                    avg_exit_velocity: row.get(3)?,
                    max_distance: row.get(4)?,
                    hard_hit_pct: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(summaries)
    }
}
