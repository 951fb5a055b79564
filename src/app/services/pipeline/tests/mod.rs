//! Test helpers for orchestrated runs

use std::time::Duration;
use tempfile::TempDir;

use crate::config::Settings;

mod orchestrator_tests;

/// Settings pointed at a temp workspace with test-friendly tunables
pub fn test_settings(workspace: &TempDir) -> Settings {
    let input_dir = workspace.path().join("input");
    std::fs::create_dir_all(&input_dir).unwrap();

    Settings::default()
        .with_input_path(input_dir)
        .with_database_path(workspace.path().join("metrics.db"))
        .with_batch_size(4)
        .with_max_load_attempts(2)
        .with_retry_backoff(Duration::from_millis(1))
        .with_max_concurrent_files(2)
}

/// Drop a CSV workbook into the workspace's input directory
pub fn add_workbook(workspace: &TempDir, name: &str, content: &str) {
    let input_dir = workspace.path().join("input");
    std::fs::create_dir_all(&input_dir).unwrap();
    std::fs::write(input_dir.join(name), content).unwrap();
}
