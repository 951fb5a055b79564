//! Orchestrator behavior tests over the in-memory store

use super::{add_workbook, test_settings};
use crate::app::services::pipeline::{PipelineOrchestrator, RunState, RunStatus};
use crate::{Error, RejectReason};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const HEADER: &str =
    "player_name,date,drill_type,exit_velocity,launch_angle,distance,quality_of_contact\n";

#[tokio::test]
async fn dry_run_reports_without_persisting() {
    let workspace = TempDir::new().unwrap();
    add_workbook(
        &workspace,
        "sessions.csv",
        &format!(
            "{HEADER}\
             jo tanaka,2025-03-14,Tee,88.5,12,210,Hard\n\
             sam ruiz,2025-03-14,Tee,74.1,-4,95,Weak\n\
             ali brook,2025-03-14,Machine,101.3,24,-345,Hard\n"
        ),
    );

    let settings = test_settings(&workspace);
    let run = PipelineOrchestrator::new(settings.clone())
        .with_dry_run(true)
        .execute(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(run.state, RunState::Completed);
    assert_eq!(run.status, RunStatus::Partial);
    assert_eq!(run.files_discovered, 1);
    assert_eq!(run.files_processed, 1);
    assert_eq!(run.rows_read, 3);
    assert_eq!(run.rows_accepted, 2);
    assert_eq!(run.rows_rejected, 1);
    assert_eq!(run.rows_loaded, 2);
    assert_eq!(
        run.rejection_counts.get(&RejectReason::OutOfRange),
        Some(&1)
    );

    // Nothing was persisted
    assert!(!settings.database_path.exists());
}

#[tokio::test]
async fn clean_dry_run_is_success() {
    let workspace = TempDir::new().unwrap();
    add_workbook(
        &workspace,
        "sessions.csv",
        &format!("{HEADER}jo tanaka,2025-03-14,Tee,88.5,12,210,Hard\n"),
    );

    let run = PipelineOrchestrator::new(test_settings(&workspace))
        .with_dry_run(true)
        .execute(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Success);
    assert_eq!(run.rows_loaded, 1);
}

#[tokio::test]
async fn empty_input_directory_completes_cleanly() {
    let workspace = TempDir::new().unwrap();

    let run = PipelineOrchestrator::new(test_settings(&workspace))
        .with_dry_run(true)
        .execute(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(run.state, RunState::Completed);
    assert_eq!(run.status, RunStatus::Success);
    assert_eq!(run.files_discovered, 0);
    assert_eq!(run.rows_read, 0);
}

#[tokio::test]
async fn invalid_settings_abort_before_any_stage() {
    let workspace = TempDir::new().unwrap();
    let settings = test_settings(&workspace).with_batch_size(0);

    let err = PipelineOrchestrator::new(settings)
        .execute(CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[tokio::test]
async fn missing_input_path_aborts_before_any_stage() {
    let workspace = TempDir::new().unwrap();
    let settings =
        test_settings(&workspace).with_input_path(workspace.path().join("not-there"));

    let err = PipelineOrchestrator::new(settings)
        .execute(CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[tokio::test]
async fn cancelled_run_skips_files_and_aborts() {
    let workspace = TempDir::new().unwrap();
    add_workbook(
        &workspace,
        "sessions.csv",
        &format!("{HEADER}jo tanaka,2025-03-14,Tee,88.5,12,210,Hard\n"),
    );

    let cancel = CancellationToken::new();
    cancel.cancel();

    let run = PipelineOrchestrator::new(test_settings(&workspace))
        .with_dry_run(true)
        .execute(cancel)
        .await
        .unwrap();

    assert_eq!(run.state, RunState::Aborted);
    assert_eq!(run.status, RunStatus::Failed);
    assert_eq!(run.files_skipped, 1);
    assert_eq!(run.rows_loaded, 0);
}

#[tokio::test]
async fn one_bad_file_does_not_abort_its_siblings() {
    let workspace = TempDir::new().unwrap();
    // Missing the quality_of_contact column entirely
    add_workbook(
        &workspace,
        "broken.csv",
        "player_name,date,drill_type,exit_velocity,launch_angle,distance\n\
         jo tanaka,2025-03-14,Tee,88.5,12,210\n",
    );
    add_workbook(
        &workspace,
        "good.csv",
        &format!("{HEADER}sam ruiz,2025-03-15,Machine,95,18,310,Hard\n"),
    );

    let run = PipelineOrchestrator::new(test_settings(&workspace))
        .with_dry_run(true)
        .execute(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(run.state, RunState::Completed);
    assert_eq!(run.status, RunStatus::Partial);
    assert_eq!(run.files_failed, 1);
    assert_eq!(run.files_processed, 1);
    assert_eq!(run.rows_loaded, 1);
    assert_eq!(run.file_errors.len(), 1);
    assert!(run.file_errors[0].error.contains("quality_of_contact"));
}

#[tokio::test]
async fn all_files_failing_aborts_the_run() {
    let workspace = TempDir::new().unwrap();
    add_workbook(&workspace, "a.csv", "player_name\njo\n");
    add_workbook(&workspace, "b.csv", "player_name\nsam\n");

    let run = PipelineOrchestrator::new(test_settings(&workspace))
        .with_dry_run(true)
        .execute(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(run.state, RunState::Aborted);
    assert_eq!(run.status, RunStatus::Failed);
    assert_eq!(run.files_failed, 2);
}
