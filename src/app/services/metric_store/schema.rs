//! SQLite schema for the metrics and quarantine tables
//!
//! The metrics table enforces the invariants that hold for every accepted
//! record regardless of configuration: physically impossible values and
//! unknown contact grades are rejected by CHECK constraints, and the
//! natural key is unique so upserts can never duplicate. The tunable
//! analytic bounds live in configuration, not here; settings validation
//! clamps every configurable range to the windows checked below, so a
//! validator-accepted row can never trip them.

use crate::Result;
use rusqlite::Connection;

pub const CREATE_METRICS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS practice_metrics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_name TEXT NOT NULL,
    session_date TEXT NOT NULL,
    drill_type TEXT NOT NULL,
    sequence INTEGER NOT NULL,
    exit_velocity REAL NOT NULL CHECK (exit_velocity >= 0.0),
    launch_angle REAL NOT NULL CHECK (launch_angle BETWEEN -90.0 AND 90.0),
    distance REAL NOT NULL CHECK (distance >= 0.0),
    quality_of_contact TEXT NOT NULL
        CHECK (quality_of_contact IN ('Hard', 'Medium', 'Weak')),
    source_file TEXT NOT NULL,
    sheet_name TEXT NOT NULL,
    row_index INTEGER NOT NULL,
    loaded_at TEXT NOT NULL,
    UNIQUE (player_name, session_date, drill_type, sequence)
)";

pub const CREATE_REJECTED_TABLE: &str = "
CREATE TABLE IF NOT EXISTS rejected_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_file TEXT NOT NULL,
    sheet_name TEXT NOT NULL,
    row_index INTEGER NOT NULL,
    reason TEXT NOT NULL,
    detail TEXT NOT NULL,
    payload TEXT NOT NULL,
    rejected_at TEXT NOT NULL
)";

pub const CREATE_INDEXES: &str = "
CREATE INDEX IF NOT EXISTS idx_metrics_player_date
    ON practice_metrics (player_name, session_date);
CREATE INDEX IF NOT EXISTS idx_metrics_session_date
    ON practice_metrics (session_date);
CREATE INDEX IF NOT EXISTS idx_rejected_reason
    ON rejected_records (reason)";

/// Create tables and indexes if they do not exist
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "{CREATE_METRICS_TABLE};\n{CREATE_REJECTED_TABLE};\n{CREATE_INDEXES};"
    ))?;
    Ok(())
}
