//! Data models for practice-metric processing
//!
//! This module contains the core data structures flowing through the
//! pipeline: raw spreadsheet rows with provenance, validated practice
//! metrics with their natural key, rejected rows with reason codes, and
//! the contact-quality enumeration.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// Raw Record (pre-validation)
// =============================================================================

/// One spreadsheet row exactly as read, before any validation
///
/// Provenance fields record where the row originated for traceability back
/// to source. Cell values are carried as untyped strings keyed by canonical
/// column name; typing them is strictly the validator's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Workbook file this row was read from
    pub source_file: PathBuf,

    /// Sheet within the workbook (file stem for CSV input)
    pub sheet_name: String,

    /// 1-based row number within the sheet; the header row is row 1
    pub row_index: usize,

    /// Canonical column name to raw cell value
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(
        source_file: impl Into<PathBuf>,
        sheet_name: impl Into<String>,
        row_index: usize,
        fields: HashMap<String, String>,
    ) -> Self {
        Self {
            source_file: source_file.into(),
            sheet_name: sheet_name.into(),
            row_index,
            fields,
        }
    }

    /// Get a raw cell value by canonical column name
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Whether every cell in the row is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty())
    }

    /// Compact provenance label for logs and error messages
    pub fn provenance(&self) -> String {
        format!(
            "{}:{}:{}",
            self.source_file.display(),
            self.sheet_name,
            self.row_index
        )
    }
}

// =============================================================================
// Contact Quality
// =============================================================================

/// Quality-of-contact grade assigned to a swing
///
/// The three labels are fixed by the charting convention used on the field;
/// arbitrary spellings are accepted case-insensitively and canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactQuality {
    /// Squared up, ball struck flush
    Hard,
    /// Average contact
    Medium,
    /// Mis-hit, off the end or handle
    Weak,
}

impl ContactQuality {
    /// Canonical label as stored in the database
    pub fn as_str(self) -> &'static str {
        match self {
            ContactQuality::Hard => "Hard",
            ContactQuality::Medium => "Medium",
            ContactQuality::Weak => "Weak",
        }
    }

    /// All possible contact quality values
    pub fn all_values() -> [ContactQuality; 3] {
        [
            ContactQuality::Hard,
            ContactQuality::Medium,
            ContactQuality::Weak,
        ]
    }
}

impl FromStr for ContactQuality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hard" => Ok(ContactQuality::Hard),
            "medium" => Ok(ContactQuality::Medium),
            "weak" => Ok(ContactQuality::Weak),
            other => Err(Error::configuration(format!(
                "invalid contact quality '{other}': must be Hard, Medium, or Weak"
            ))),
        }
    }
}

impl fmt::Display for ContactQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Practice Metric (validated)
// =============================================================================

/// Natural key identifying one recorded swing
///
/// Used in place of a generated identifier so that re-running the pipeline
/// against the same source upserts instead of duplicating. The `sequence`
/// component is derived from the source row index, distinguishing multiple
/// swings by the same player, date, and drill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NaturalKey {
    pub player_name: String,
    pub session_date: NaiveDate,
    pub drill_type: String,
    pub sequence: i64,
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}#{}",
            self.player_name, self.session_date, self.drill_type, self.sequence
        )
    }
}

/// One validated, normalized batting-practice measurement
///
/// Created only by the validator; every field has passed presence, parse,
/// range, and categorical checks, and the string fields carry canonical
/// spellings. Immutable once accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeMetric {
    /// Player name, trimmed and title-cased
    pub player_name: String,

    /// Calendar date of the practice session
    pub session_date: NaiveDate,

    /// Drill type in the allow-list's canonical spelling
    pub drill_type: String,

    /// Ball exit velocity in mph
    pub exit_velocity: f64,

    /// Launch angle in degrees
    pub launch_angle: f64,

    /// Carry distance in feet
    pub distance: f64,

    /// Quality-of-contact grade
    pub contact_quality: ContactQuality,

    /// Workbook file the row was read from
    pub source_file: PathBuf,

    /// Sheet within the workbook
    pub sheet_name: String,

    /// 1-based source row number
    pub row_index: usize,
}

impl PracticeMetric {
    /// Natural key used for idempotent upsert
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            player_name: self.player_name.clone(),
            session_date: self.session_date,
            drill_type: self.drill_type.clone(),
            sequence: self.row_index as i64,
        }
    }
}

// =============================================================================
// Rejection
// =============================================================================

/// Reason code attached to a rejected row
///
/// Codes correspond to the validation rules in their fixed order; the first
/// failing rule determines the code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum RejectReason {
    /// A required field is absent or empty
    MissingField,
    /// The session date did not parse under any accepted format
    UnparseableDate,
    /// A numeric metric failed to parse or fell outside its bounds
    OutOfRange,
    /// A categorical field is not in its allow-list
    InvalidCategory,
}

impl RejectReason {
    /// Stable wire code as persisted in the quarantine table
    pub fn code(self) -> &'static str {
        match self {
            RejectReason::MissingField => "missing_field",
            RejectReason::UnparseableDate => "unparseable_date",
            RejectReason::OutOfRange => "out_of_range",
            RejectReason::InvalidCategory => "invalid_category",
        }
    }

    /// All reason codes, in rule order
    pub fn all_values() -> [RejectReason; 4] {
        [
            RejectReason::MissingField,
            RejectReason::UnparseableDate,
            RejectReason::OutOfRange,
            RejectReason::InvalidCategory,
        ]
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A raw row that failed validation, paired with why
///
/// Terminal: rejected records are written to the quarantine table for audit
/// and never retried automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    /// The offending row, untouched
    pub record: RawRecord,

    /// First failing rule's reason code
    pub reason: RejectReason,

    /// Human-readable detail for operators
    pub detail: String,
}

impl RejectedRecord {
    pub fn new(record: RawRecord, reason: RejectReason, detail: impl Into<String>) -> Self {
        Self {
            record,
            reason,
            detail: detail.into(),
        }
    }
}
