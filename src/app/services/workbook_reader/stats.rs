//! Extraction statistics and result structures

use crate::RawRecord;

/// Extraction result for one workbook file
#[derive(Debug, Clone)]
pub struct FileExtract {
    /// Raw rows in sheet order, blanks excluded
    pub records: Vec<RawRecord>,

    /// Extraction statistics for the file
    pub stats: ExtractStats,
}

/// Simple extraction statistics
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ExtractStats {
    /// Data rows encountered (header rows excluded, blank rows included)
    pub rows_read: usize,

    /// Rows skipped because every cell was empty
    pub blank_rows_skipped: usize,

    /// Sheets read from the workbook
    pub sheets_read: usize,
}

impl ExtractStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }
}
