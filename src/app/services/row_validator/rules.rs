//! The ordered validation rules
//!
//! Rule order is part of the contract: presence, date parse, numeric
//! parse/range, categorical. The first failing rule determines the
//! rejection reason, so a row never carries more than one reason code.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::normalize;
use crate::config::{MetricBounds, Settings};
use crate::constants::columns;
use crate::{ContactQuality, PracticeMetric, RawRecord, RejectReason, RejectedRecord};

/// The exactly-one-of output of validating a single row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// The row passed every rule and was normalized
    Accepted(PracticeMetric),
    /// The row failed a rule and is bound for quarantine
    Rejected(RejectedRecord),
}

/// Compiled validation rules for a run
///
/// Built once from settings and shared read-only across workers; carries
/// the accepted date formats, numeric bounds, and the drill allow-list with
/// a case-insensitive lookup onto canonical spellings.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    date_formats: Vec<String>,
    bounds: MetricBounds,
    drill_lookup: HashMap<String, String>,
}

impl ValidationRules {
    /// Compile rules from resolved settings
    pub fn from_settings(settings: &Settings) -> Self {
        let drill_lookup = settings
            .drill_types
            .iter()
            .map(|canonical| (canonical.trim().to_lowercase(), canonical.trim().to_string()))
            .collect();

        Self {
            date_formats: settings.date_formats.clone(),
            bounds: settings.bounds.clone(),
            drill_lookup,
        }
    }

    /// Validate one raw row into exactly one outcome
    pub fn validate(&self, record: &RawRecord) -> RowOutcome {
        match self.check(record) {
            Ok(metric) => RowOutcome::Accepted(metric),
            Err((reason, detail)) => {
                RowOutcome::Rejected(RejectedRecord::new(record.clone(), reason, detail))
            }
        }
    }

    fn check(
        &self,
        record: &RawRecord,
    ) -> std::result::Result<PracticeMetric, (RejectReason, String)> {
        // Rule 1: required-field presence
        for column in columns::REQUIRED {
            let present = record
                .field(column)
                .is_some_and(|value| !value.trim().is_empty());
            if !present {
                return Err((
                    RejectReason::MissingField,
                    format!("required field '{column}' is empty"),
                ));
            }
        }

        // Rule 2: date parse
        let raw_date = record.field(columns::SESSION_DATE).unwrap_or("").trim();
        let session_date = self.parse_date(raw_date).ok_or_else(|| {
            (
                RejectReason::UnparseableDate,
                format!("session_date '{raw_date}' does not match any accepted format"),
            )
        })?;

        // Rule 3: numeric parse and range, in column order
        let exit_velocity =
            parse_in_range(record, columns::EXIT_VELOCITY, &self.bounds.exit_velocity)?;
        let launch_angle =
            parse_in_range(record, columns::LAUNCH_ANGLE, &self.bounds.launch_angle)?;
        let distance = parse_in_range(record, columns::DISTANCE, &self.bounds.distance)?;

        // Rule 4: categorical checks
        let raw_contact = record
            .field(columns::QUALITY_OF_CONTACT)
            .unwrap_or("")
            .trim();
        let contact_quality = ContactQuality::from_str(raw_contact).map_err(|_| {
            (
                RejectReason::InvalidCategory,
                format!("quality_of_contact '{raw_contact}' is not Hard, Medium, or Weak"),
            )
        })?;

        let raw_drill = record.field(columns::DRILL_TYPE).unwrap_or("").trim();
        let drill_type = self.canonical_drill(raw_drill).ok_or_else(|| {
            (
                RejectReason::InvalidCategory,
                format!("drill_type '{raw_drill}' is not in the configured allow-list"),
            )
        })?;

        // Normalization; numeric values pass through untouched
        let player_name =
            normalize::title_case(record.field(columns::PLAYER_NAME).unwrap_or(""));

        Ok(PracticeMetric {
            player_name,
            session_date,
            drill_type,
            exit_velocity,
            launch_angle,
            distance,
            contact_quality,
            source_file: record.source_file.clone(),
            sheet_name: record.sheet_name.clone(),
            row_index: record.row_index,
        })
    }

    /// Try each accepted format in order; first match wins
    fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        self.date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
    }

    /// Resolve a drill spelling onto its canonical allow-list entry
    fn canonical_drill(&self, raw: &str) -> Option<String> {
        self.drill_lookup.get(&raw.to_lowercase()).cloned()
    }
}

fn parse_in_range(
    record: &RawRecord,
    column: &str,
    range: &RangeInclusive<f64>,
) -> std::result::Result<f64, (RejectReason, String)> {
    let raw = record.field(column).unwrap_or("").trim();
    let value: f64 = raw.parse().map_err(|_| {
        (
            RejectReason::OutOfRange,
            format!("{column} '{raw}' is not numeric"),
        )
    })?;

    if !value.is_finite() || !range.contains(&value) {
        return Err((
            RejectReason::OutOfRange,
            format!(
                "{column} {value} outside [{}, {}]",
                range.start(),
                range.end()
            ),
        ));
    }

    Ok(value)
}
