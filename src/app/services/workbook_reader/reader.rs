//! Core workbook reading implementation
//!
//! Opens `.xlsx`/`.xls` workbooks through calamine and `.csv` files through
//! the csv crate, treating a CSV file as a single-sheet workbook named
//! after the file stem. Every error raised here is scoped to the file being
//! read.

use calamine::{open_workbook_auto, Data, Reader};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use super::header::HeaderMap;
use super::stats::{ExtractStats, FileExtract};
use crate::config::Settings;
use crate::{Error, RawRecord, Result};

/// Reader for batting-practice session workbooks
///
/// Sheet selection: when a sheet pattern is configured, every sheet whose
/// name matches is read; otherwise only the first sheet is.
#[derive(Debug, Clone, Default)]
pub struct WorkbookReader {
    sheet_pattern: Option<Regex>,
}

impl WorkbookReader {
    /// Create a reader with an optional sheet-name pattern
    pub fn new(sheet_pattern: Option<Regex>) -> Self {
        Self { sheet_pattern }
    }

    /// Create a reader from resolved settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(settings.sheet_regex()?))
    }

    /// Extract every raw row from one workbook file
    ///
    /// The returned rows are in sheet order with blank rows dropped. Any
    /// failure (unreadable file, malformed content, missing required
    /// header) fails this file only.
    pub fn read_file(&self, path: &Path) -> Result<FileExtract> {
        info!("Extracting workbook: {}", path.display());

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let result = match extension.as_str() {
            "csv" => self.read_csv(path),
            "xlsx" | "xls" => self.read_spreadsheet(path),
            other => Err(Error::extraction(
                path,
                format!("unsupported file type '{other}'"),
            )),
        };

        result.map_err(|e| e.into_extraction(path))
    }

    /// Read a CSV file as a single-sheet workbook
    fn read_csv(&self, path: &Path) -> Result<FileExtract> {
        let sheet_name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("sheet1")
            .to_string();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::csv_parsing(path, "failed to open file", Some(e)))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::csv_parsing(path, "failed to read header row", Some(e)))?
            .iter()
            .map(str::to_string)
            .collect();
        let header_map = HeaderMap::analyze(path, &sheet_name, &headers)?;

        let mut stats = ExtractStats::new();
        stats.sheets_read = 1;
        let mut records = Vec::new();

        for (offset, row) in reader.records().enumerate() {
            // Header occupies row 1 of the sheet
            let row_index = offset + 2;
            let row = row.map_err(|e| {
                Error::csv_parsing(path, format!("failed to read row {row_index}"), Some(e))
            })?;

            let mut fields = HashMap::with_capacity(header_map.len());
            for (name, index) in header_map.columns() {
                fields.insert(
                    name.to_string(),
                    row.get(index).unwrap_or_default().to_string(),
                );
            }

            stats.rows_read += 1;
            let record = RawRecord::new(path, &sheet_name, row_index, fields);
            if record.is_blank() {
                stats.blank_rows_skipped += 1;
                continue;
            }
            records.push(record);
        }

        debug!(
            "Extracted {} rows ({} blank) from {}",
            stats.rows_read,
            stats.blank_rows_skipped,
            path.display()
        );

        Ok(FileExtract { records, stats })
    }

    /// Read an Excel workbook, selecting sheets by the configured pattern
    fn read_spreadsheet(&self, path: &Path) -> Result<FileExtract> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| Error::spreadsheet(path, format!("failed to open workbook: {e}")))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let selected: Vec<String> = match &self.sheet_pattern {
            Some(pattern) => sheet_names
                .iter()
                .filter(|name| pattern.is_match(name))
                .cloned()
                .collect(),
            None => sheet_names.first().cloned().into_iter().collect(),
        };

        if selected.is_empty() {
            let reason = if sheet_names.is_empty() {
                "workbook contains no sheets".to_string()
            } else {
                format!(
                    "no sheet matches the configured pattern (available: {})",
                    sheet_names.join(", ")
                )
            };
            return Err(Error::spreadsheet(path, reason));
        }

        let mut stats = ExtractStats::new();
        let mut records = Vec::new();

        for sheet_name in &selected {
            let range = workbook.worksheet_range(sheet_name).map_err(|e| {
                Error::spreadsheet(path, format!("failed to read sheet '{sheet_name}': {e}"))
            })?;

            let mut rows = range.rows();
            let header_row = match rows.next() {
                Some(row) => row,
                None => {
                    warn!(
                        "Sheet '{}' of {} is empty, skipping",
                        sheet_name,
                        path.display()
                    );
                    stats.sheets_read += 1;
                    continue;
                }
            };

            let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();
            let header_map = HeaderMap::analyze(path, sheet_name, &headers)?;
            stats.sheets_read += 1;

            for (offset, row) in rows.enumerate() {
                let row_index = offset + 2;

                let mut fields = HashMap::with_capacity(header_map.len());
                for (name, index) in header_map.columns() {
                    fields.insert(
                        name.to_string(),
                        row.get(index).map(cell_to_string).unwrap_or_default(),
                    );
                }

                stats.rows_read += 1;
                let record = RawRecord::new(path, sheet_name, row_index, fields);
                if record.is_blank() {
                    stats.blank_rows_skipped += 1;
                    continue;
                }
                records.push(record);
            }
        }

        debug!(
            "Extracted {} rows ({} blank) from {} sheets of {}",
            stats.rows_read,
            stats.blank_rows_skipped,
            stats.sheets_read,
            path.display()
        );

        Ok(FileExtract { records, stats })
    }
}

/// Render a spreadsheet cell as the raw string the validator will see
///
/// Whole-number floats lose their trailing `.0` so that a cell formatted as
/// a number round-trips the way it displays in the sheet. Date cells render
/// as ISO dates, matching the default accepted formats.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) if naive.time() == chrono::NaiveTime::MIN => {
                naive.date().format("%Y-%m-%d").to_string()
            }
            Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e}"),
    }
}
