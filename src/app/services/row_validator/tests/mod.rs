//! Test helpers for row validation

use std::collections::HashMap;

use crate::app::services::row_validator::ValidationRules;
use crate::config::Settings;
use crate::RawRecord;

mod rules_tests;

/// Rules compiled from default settings
pub fn default_rules() -> ValidationRules {
    ValidationRules::from_settings(&Settings::default())
}

/// A raw record that passes every default rule
pub fn valid_record() -> RawRecord {
    record_with(&[])
}

/// A valid record with specific fields overridden; an empty override value
/// blanks the field
pub fn record_with(overrides: &[(&str, &str)]) -> RawRecord {
    let mut fields: HashMap<String, String> = [
        ("player_name", " jo tanaka "),
        ("session_date", "2025-03-14"),
        ("drill_type", "tee"),
        ("exit_velocity", "88.5"),
        ("launch_angle", "12"),
        ("distance", "210"),
        ("quality_of_contact", "hard"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (column, value) in overrides {
        fields.insert(column.to_string(), value.to_string());
    }

    RawRecord::new("sessions/march.csv", "march", 2, fields)
}
