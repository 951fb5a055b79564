//! Test fixtures and helpers for workbook reader testing

use std::path::PathBuf;
use tempfile::TempDir;

mod reader_tests;

/// CSV content matching the session-sheet template
pub fn session_csv() -> String {
    "player_name,date,drill_type,exit_velocity,launch_angle,distance,quality_of_contact\n\
     jo tanaka,2025-03-14,Tee,88.5,12,210,Hard\n\
     sam ruiz,2025-03-14,Front Toss,74.1,-4,95,Weak\n\
     ,,,,,,\n\
     ali brook,03/14/2025,Machine,101.3,24,345,hard\n"
        .to_string()
}

/// Write a workbook fixture into a temp directory and return its path
pub fn write_workbook(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
