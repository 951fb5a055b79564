//! Batch loading of accepted metrics
//!
//! Buffers accepted metrics to the configured batch size and commits each
//! batch as a single atomic transaction through the
//! [`MetricStore`](crate::app::services::metric_store::MetricStore)
//! abstraction. Transient storage failures are retried with exponential
//! backoff; a batch that exhausts its attempts is recorded as failed and
//! the run continues with the next batch. Rejected rows are quarantined
//! best-effort, outside any metric transaction.
//!
//! ## Architecture
//!
//! - [`loader`] - The buffered [`BatchLoader`] and its retry loop
//! - [`stats`] - Load statistics and failed-batch records

pub mod loader;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use loader::{BatchLoader, LoaderConfig};
pub use stats::{FailedBatch, LoadStats};
