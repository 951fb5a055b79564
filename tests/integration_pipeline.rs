//! End-to-end pipeline tests against a real SQLite database
//!
//! Each test builds a workspace of CSV workbooks in a temp directory, runs
//! the orchestrator against a database file in the same workspace, and
//! asserts on both the run report and the persisted tables.

use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use practice_processor::app::services::metric_store::{MetricStore, SqliteMetricStore};
use practice_processor::app::services::pipeline::{PipelineOrchestrator, RunState, RunStatus};
use practice_processor::{RejectReason, Settings};

const HEADER: &str =
    "player_name,date,drill_type,exit_velocity,launch_angle,distance,quality_of_contact\n";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("input")).unwrap();
        Self { dir }
    }

    fn add_workbook(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join("input").join(name), content).unwrap();
    }

    fn database_path(&self) -> PathBuf {
        self.dir.path().join("metrics.db")
    }

    fn settings(&self) -> Settings {
        Settings::default()
            .with_input_path(self.dir.path().join("input"))
            .with_database_path(self.database_path())
            .with_batch_size(5)
            .with_max_load_attempts(2)
            .with_retry_backoff(Duration::from_millis(1))
            .with_max_concurrent_files(2)
    }

    fn open_store(&self) -> SqliteMetricStore {
        SqliteMetricStore::open(&self.database_path(), Duration::from_secs(5)).unwrap()
    }
}

/// Ten valid rows plus two with negative distance
fn mixed_quality_sheet() -> String {
    let mut content = String::from(HEADER);
    for i in 0..10 {
        content.push_str(&format!(
            "player {i},2025-03-14,Tee,{ev},12,210,Hard\n",
            ev = 80.0 + i as f64
        ));
    }
    content.push_str("bad row one,2025-03-14,Tee,85,10,-5,Hard\n");
    content.push_str("bad row two,2025-03-14,Tee,85,10,-120,Medium\n");
    content
}

#[tokio::test]
async fn rejected_rows_are_counted_and_quarantined_while_valid_rows_load() {
    let workspace = Workspace::new();
    workspace.add_workbook("sessions.csv", &mixed_quality_sheet());

    let run = PipelineOrchestrator::new(workspace.settings())
        .execute(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(run.state, RunState::Completed);
    assert_eq!(run.status, RunStatus::Partial);
    assert_eq!(run.rows_read, 12);
    assert_eq!(run.rows_accepted, 10);
    assert_eq!(run.rows_rejected, 2);
    assert_eq!(run.rows_loaded, 10);
    assert_eq!(run.rows_failed_load, 0);
    assert_eq!(
        run.rejection_counts.get(&RejectReason::OutOfRange),
        Some(&2)
    );

    let store = workspace.open_store();
    assert_eq!(store.metric_count().unwrap(), 10);
    assert_eq!(store.rejection_count().unwrap(), 2);
}

#[tokio::test]
async fn file_missing_a_required_column_fails_alone() {
    let workspace = Workspace::new();
    workspace.add_workbook(
        "broken.csv",
        "player_name,date,drill_type,exit_velocity,launch_angle,distance\n\
         jo tanaka,2025-03-14,Tee,88.5,12,210\n",
    );
    workspace.add_workbook(
        "good.csv",
        &format!(
            "{HEADER}\
             sam ruiz,2025-03-15,Machine,95,18,310,Hard\n\
             ali brook,2025-03-15,Front Toss,82,6,150,Medium\n"
        ),
    );

    let run = PipelineOrchestrator::new(workspace.settings())
        .execute(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Partial);
    assert_eq!(run.files_discovered, 2);
    assert_eq!(run.files_failed, 1);
    assert_eq!(run.files_processed, 1);
    assert_eq!(run.rows_loaded, 2);
    assert_eq!(run.file_errors.len(), 1);
    assert!(run.file_errors[0].file.ends_with("broken.csv"));
    assert!(run.file_errors[0].error.contains("quality_of_contact"));

    let store = workspace.open_store();
    assert_eq!(store.metric_count().unwrap(), 2);
}

#[tokio::test]
async fn rerunning_an_unchanged_file_is_a_pure_overwrite() {
    let workspace = Workspace::new();
    workspace.add_workbook(
        "sessions.csv",
        &format!(
            "{HEADER}\
             jo tanaka,2025-03-14,Tee,88.5,12,210,Hard\n\
             jo tanaka,2025-03-14,Tee,90.2,15,240,Hard\n\
             sam ruiz,2025-03-14,Machine,95,18,310,Medium\n"
        ),
    );

    let first = PipelineOrchestrator::new(workspace.settings())
        .execute(CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(first.status, RunStatus::Success);
    assert_eq!(first.rows_loaded, 3);
    assert_eq!(workspace.open_store().metric_count().unwrap(), 3);

    let second = PipelineOrchestrator::new(workspace.settings())
        .execute(CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(second.status, RunStatus::Success);
    // Every row loads again, but the table does not grow
    assert_eq!(second.rows_loaded, 3);
    assert_eq!(workspace.open_store().metric_count().unwrap(), 3);
}

#[tokio::test]
async fn multiple_files_aggregate_into_one_run() {
    let workspace = Workspace::new();
    for (name, player) in [
        ("a.csv", "jo tanaka"),
        ("b.csv", "sam ruiz"),
        ("c.csv", "ali brook"),
    ] {
        workspace.add_workbook(
            name,
            &format!(
                "{HEADER}\
                 {player},2025-03-14,Tee,88.5,12,210,Hard\n\
                 {player},2025-03-14,Live BP,93.0,20,280,Hard\n"
            ),
        );
    }

    let run = PipelineOrchestrator::new(workspace.settings())
        .execute(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Success);
    assert_eq!(run.files_processed, 3);
    assert_eq!(run.rows_read, 6);
    assert_eq!(run.rows_loaded, 6);

    let store = workspace.open_store();
    assert_eq!(store.metric_count().unwrap(), 6);

    let summary = store.player_day_summary().unwrap();
    assert_eq!(summary.len(), 3);
    assert!(summary.iter().all(|s| s.swings == 2));
}

#[tokio::test]
async fn normalization_is_visible_in_the_persisted_summary() {
    let workspace = Workspace::new();
    workspace.add_workbook(
        "sessions.csv",
        &format!(
            "{HEADER}\
             jo   tanaka,2025-03-14,tee,88.5,12,210,hard\n\
             JO TANAKA,2025-03-14,TEE,91.0,14,230,HARD\n"
        ),
    );

    let run = PipelineOrchestrator::new(workspace.settings())
        .execute(CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(run.status, RunStatus::Success);

    let summary = workspace.open_store().player_day_summary().unwrap();
    // Both spellings normalize to the same player
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].player_name, "Jo Tanaka");
    assert_eq!(summary[0].swings, 2);
    assert_eq!(summary[0].hard_hit_pct, 100.0);
}
