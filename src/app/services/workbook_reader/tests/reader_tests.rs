//! Tests for workbook row extraction

use super::{session_csv, write_workbook};
use crate::app::services::workbook_reader::WorkbookReader;
use crate::constants::columns;
use crate::Error;
use tempfile::TempDir;

#[test]
fn extracts_rows_with_provenance() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(&dir, "march.csv", &session_csv());

    let extract = WorkbookReader::new(None).read_file(&path).unwrap();

    assert_eq!(extract.stats.rows_read, 4);
    assert_eq!(extract.stats.blank_rows_skipped, 1);
    assert_eq!(extract.stats.sheets_read, 1);
    assert_eq!(extract.records.len(), 3);

    let first = &extract.records[0];
    assert_eq!(first.source_file, path);
    assert_eq!(first.sheet_name, "march");
    // Header is row 1, so the first data row is row 2
    assert_eq!(first.row_index, 2);
    assert_eq!(first.field(columns::PLAYER_NAME), Some("jo tanaka"));
    assert_eq!(first.field(columns::SESSION_DATE), Some("2025-03-14"));
    assert_eq!(first.field(columns::EXIT_VELOCITY), Some("88.5"));

    // The blank row at sheet row 4 was dropped, not renumbered
    assert_eq!(extract.records[2].row_index, 5);
}

#[test]
fn ragged_rows_yield_empty_fields_not_errors() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(
        &dir,
        "ragged.csv",
        "player_name,date,drill_type,exit_velocity,launch_angle,distance,quality_of_contact\n\
         jo tanaka,2025-03-14,Tee\n",
    );

    let extract = WorkbookReader::new(None).read_file(&path).unwrap();
    assert_eq!(extract.records.len(), 1);
    let record = &extract.records[0];
    assert_eq!(record.field(columns::DRILL_TYPE), Some("Tee"));
    // Truncated cells surface as empty strings for the validator to reject
    assert_eq!(record.field(columns::DISTANCE), Some(""));
}

#[test]
fn missing_required_header_fails_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(
        &dir,
        "no_contact.csv",
        "player_name,date,drill_type,exit_velocity,launch_angle,distance\n\
         jo tanaka,2025-03-14,Tee,88.5,12,210\n",
    );

    let err = WorkbookReader::new(None).read_file(&path).unwrap_err();
    assert!(matches!(err, Error::MissingHeader { .. }));
}

#[test]
fn unsupported_extension_fails_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(&dir, "notes.txt", "not a workbook");

    let err = WorkbookReader::new(None).read_file(&path).unwrap_err();
    match err {
        Error::Extraction { file, reason } => {
            assert_eq!(file, path);
            assert!(reason.contains("unsupported"));
        }
        other => panic!("expected Extraction, got {other:?}"),
    }
}

#[test]
fn unreadable_workbook_fails_the_file() {
    let dir = TempDir::new().unwrap();
    // Garbage bytes with an .xlsx extension: not a zip container
    let path = write_workbook(&dir, "corrupt.xlsx", "\u{0}\u{1}\u{2}not-a-workbook");

    let err = WorkbookReader::new(None).read_file(&path).unwrap_err();
    assert!(matches!(err, Error::Spreadsheet { .. }));
}

#[test]
fn nonexistent_file_fails_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.csv");

    let err = WorkbookReader::new(None).read_file(&path).unwrap_err();
    assert!(matches!(err, Error::CsvParsing { .. }));
}
