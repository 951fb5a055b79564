//! Row validation and normalization for practice metrics
//!
//! Turns each [`RawRecord`](crate::RawRecord) into exactly one of an
//! accepted [`PracticeMetric`](crate::PracticeMetric) or a
//! [`RejectedRecord`](crate::RejectedRecord): never both, never neither.
//! Validation is deterministic and side-effect-free, so identical input
//! always yields identical output and the stage can be unit tested without
//! file or database fixtures.
//!
//! Rules run in a fixed order (presence, date parse, numeric range,
//! categorical) and the first failing rule determines the single rejection
//! reason code.
//!
//! ## Architecture
//!
//! - [`rules`] - The ordered validation rules and [`ValidationRules`]
//! - [`normalize`] - Canonicalization applied to accepted rows
//! - [`stats`] - Per-stage acceptance/rejection statistics

pub mod normalize;
pub mod rules;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use rules::{RowOutcome, ValidationRules};
pub use stats::ValidationStats;
