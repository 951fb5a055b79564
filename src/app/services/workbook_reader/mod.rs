//! Workbook reader for batting-practice session spreadsheets
//!
//! This module extracts raw rows from input workbooks without validating
//! them; typing and range checks are strictly the row validator's job.
//! Extraction failures are scoped to one file so a corrupt workbook never
//! aborts its siblings in a multi-file run.
//!
//! ## Architecture
//!
//! - [`reader`] - Workbook opening, sheet selection, and row extraction
//! - [`header`] - Case-insensitive, alias-aware header mapping
//! - [`discovery`] - Input file discovery for directory runs
//! - [`stats`] - Extraction statistics and result structures
//!
//! ## Usage
//!
//! ```rust,no_run
//! use practice_processor::app::services::workbook_reader::WorkbookReader;
//!
//! # fn example() -> practice_processor::Result<()> {
//! let reader = WorkbookReader::new(None);
//! let extract = reader.read_file(std::path::Path::new("sessions.xlsx"))?;
//!
//! println!(
//!     "Extracted {} rows from {} sheets",
//!     extract.records.len(),
//!     extract.stats.sheets_read
//! );
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod header;
pub mod reader;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use discovery::discover_input_files;
pub use header::HeaderMap;
pub use reader::WorkbookReader;
pub use stats::{ExtractStats, FileExtract};
