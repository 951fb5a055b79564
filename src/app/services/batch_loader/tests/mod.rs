//! Test helpers for the batch loader

use std::time::Duration;

use crate::app::services::batch_loader::{BatchLoader, LoaderConfig};
use crate::app::services::metric_store::MemoryMetricStore;


/// Loader over a fresh memory store with test-friendly tunables
pub fn test_loader(batch_size: usize, max_attempts: u32) -> BatchLoader<MemoryMetricStore> {
    test_loader_with_store(MemoryMetricStore::new(), batch_size, max_attempts)
}

/// Loader wrapping a pre-configured store
pub fn test_loader_with_store(
    store: MemoryMetricStore,
    batch_size: usize,
    max_attempts: u32,
) -> BatchLoader<MemoryMetricStore> {
    BatchLoader::new(
        store,
        LoaderConfig {
            batch_size,
            max_attempts,
            backoff_base: Duration::from_millis(1),
        },
    )
}
