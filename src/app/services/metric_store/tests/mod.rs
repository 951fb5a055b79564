//! Test helpers for metric stores

use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::{ContactQuality, PracticeMetric, RawRecord, RejectReason, RejectedRecord};


/// A valid metric at the given source row
pub fn metric_at_row(row_index: usize) -> PracticeMetric {
    PracticeMetric {
        player_name: "Jo Tanaka".to_string(),
        session_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        drill_type: "Tee".to_string(),
        exit_velocity: 88.5,
        launch_angle: 12.0,
        distance: 210.0,
        contact_quality: ContactQuality::Hard,
        source_file: PathBuf::from("sessions/march.csv"),
        sheet_name: "march".to_string(),
        row_index,
    }
}

/// A small valid batch with distinct natural keys
pub fn batch_of(rows: usize) -> Vec<PracticeMetric> {
    (0..rows).map(|i| metric_at_row(i + 2)).collect()
}

/// A rejected record fixture
pub fn rejection_at_row(row_index: usize) -> RejectedRecord {
    let mut fields = HashMap::new();
    fields.insert("player_name".to_string(), "jo tanaka".to_string());
    fields.insert("distance".to_string(), "-3".to_string());
    let record = RawRecord::new("sessions/march.csv", "march", row_index, fields);
    RejectedRecord::new(record, RejectReason::OutOfRange, "distance -3 outside [0, 600]")
}
