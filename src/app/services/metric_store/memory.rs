//! In-memory metric store
//!
//! A faithful fake of the relational store used two ways: by tests that
//! exercise the loader's transaction/retry behavior without a database,
//! and by `--dry-run` executions that validate input without persisting.
//!
//! Failure injection mirrors the real store's behavior: injected faults
//! fail the *next* upsert call (transient or persistent), and the same
//! value constraints the SQLite schema enforces with CHECK clauses are
//! checked up front so a bad row fails its whole batch atomically.

use std::collections::{BTreeMap, VecDeque};

use super::{MetricStore, PlayerDaySummary};
use crate::app::models::NaturalKey;
use crate::{ContactQuality, Error, PracticeMetric, RejectedRecord, Result};

/// A fault to inject into an upcoming upsert call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
    /// Fails with an error the retry policy will retry
    Transient,
    /// Fails with an error that exhausts the batch immediately
    Persistent,
}

/// In-memory fake of the relational metric store
#[derive(Debug, Default)]
pub struct MemoryMetricStore {
    metrics: BTreeMap<NaturalKey, PracticeMetric>,
    rejections: Vec<RejectedRecord>,
    faults: VecDeque<StoreFault>,
    fail_rejection_writes: bool,
    /// Number of upsert calls observed, including failed ones
    pub upsert_calls: usize,
}

impl MemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a fault for the next upsert call; faults apply in FIFO order,
    /// one per call
    pub fn inject_fault(&mut self, fault: StoreFault) {
        self.faults.push_back(fault);
    }

    /// Queue `count` identical faults
    pub fn inject_faults(&mut self, fault: StoreFault, count: usize) {
        for _ in 0..count {
            self.inject_fault(fault);
        }
    }

    /// Make every subsequent quarantine write fail
    pub fn fail_rejection_writes(&mut self) {
        self.fail_rejection_writes = true;
    }

    /// Look up a stored metric by natural key
    pub fn get(&self, key: &NaturalKey) -> Option<&PracticeMetric> {
        self.metrics.get(key)
    }

    /// Quarantined rows, in write order
    pub fn rejections(&self) -> &[RejectedRecord] {
        &self.rejections
    }
}

impl MetricStore for MemoryMetricStore {
    fn upsert_batch(&mut self, batch: &[PracticeMetric]) -> Result<usize> {
        self.upsert_calls += 1;

        if let Some(fault) = self.faults.pop_front() {
            return Err(match fault {
                StoreFault::Transient => Error::transient_storage("injected transient fault"),
                StoreFault::Persistent => Error::storage("injected persistent fault", None),
            });
        }

        // Value constraints checked before any mutation, keeping the batch
        // all-or-nothing exactly like the SQLite CHECK clauses.
        for metric in batch {
            let impossible = metric.exit_velocity < 0.0
                || metric.distance < 0.0
                || !(-90.0..=90.0).contains(&metric.launch_angle)
                || !ContactQuality::all_values().contains(&metric.contact_quality);
            if impossible {
                return Err(Error::storage(
                    format!("CHECK constraint failed for {}", metric.natural_key()),
                    None,
                ));
            }
        }

        for metric in batch {
            self.metrics.insert(metric.natural_key(), metric.clone());
        }
        Ok(batch.len())
    }

    fn write_rejections(&mut self, rejections: &[RejectedRecord]) -> Result<usize> {
        if self.fail_rejection_writes {
            return Err(Error::storage("quarantine table unavailable", None));
        }
        self.rejections.extend_from_slice(rejections);
        Ok(rejections.len())
    }

    fn metric_count(&self) -> Result<u64> {
        Ok(self.metrics.len() as u64)
    }

    fn rejection_count(&self) -> Result<u64> {
        Ok(self.rejections.len() as u64)
    }

    fn player_day_summary(&self) -> Result<Vec<PlayerDaySummary>> {
        let mut grouped: BTreeMap<(chrono::NaiveDate, String), Vec<&PracticeMetric>> =
            BTreeMap::new();
        for metric in self.metrics.values() {
            grouped
                .entry((metric.session_date, metric.player_name.clone()))
                .or_default()
                .push(metric);
        }

        Ok(grouped
            .into_iter()
            .map(|((session_date, player_name), metrics)| {
                let swings = metrics.len() as u64;
                let avg_exit_velocity =
                    metrics.iter().map(|m| m.exit_velocity).sum::<f64>() / swings as f64;
                let max_distance = metrics
                    .iter()
                    .map(|m| m.distance)
                    .fold(f64::NEG_INFINITY, f64::max);
                let hard = metrics
                    .iter()
                    .filter(|m| m.contact_quality == ContactQuality::Hard)
                    .count();

                PlayerDaySummary {
                    player_name,
                    session_date,
                    swings,
                    avg_exit_velocity,
                    max_distance,
                    hard_hit_pct: 100.0 * hard as f64 / swings as f64,
                }
            })
            .collect())
    }
}
