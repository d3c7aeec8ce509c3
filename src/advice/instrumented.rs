//! Tracing instrumentation advice.
//!
//! Wraps an item store to log the duration and outcome of each call
//! without modifying core implementations.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::item::Item;
use crate::storage::{ItemStore, Result, StoreError};

/// Wrapper that adds tracing instrumentation to any storage implementation.
///
/// Emits one event per call with `storage`, `operation` and `elapsed_ms`
/// fields. Successful calls log at debug, `Unknown` failures at error, and
/// all other failures at warn.
///
/// # Example
///
/// ```ignore
/// let store = SqliteItemStore::new(pool);
/// let store = Instrumented::new(store, "sqlite");
/// ```
pub struct Instrumented<T> {
    inner: T,
    storage_type: &'static str,
}

impl<T> Instrumented<T> {
    /// Wrap a storage implementation with tracing instrumentation.
    ///
    /// # Arguments
    /// * `inner` - The storage implementation to wrap
    /// * `storage_type` - Label for log events (e.g., "sqlite", "dynamo")
    pub fn new(inner: T, storage_type: &'static str) -> Self {
        Self {
            inner,
            storage_type,
        }
    }

    /// Get a reference to the inner storage.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consume the wrapper and return the inner storage.
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn record_failure(
        &self,
        operation: &'static str,
        pk: &str,
        elapsed_ms: u128,
        err: &StoreError,
    ) {
        match err {
            StoreError::Unknown(_) => error!(
                storage = self.storage_type,
                operation,
                pk = %pk,
                elapsed_ms,
                error = %err,
                "Store call failed"
            ),
            _ => warn!(
                storage = self.storage_type,
                operation,
                pk = %pk,
                elapsed_ms,
                kind = err.kind(),
                error = %err,
                "Store call failed"
            ),
        }
    }
}

#[async_trait]
impl<T: ItemStore> ItemStore for Instrumented<T> {
    async fn put(&self, item: Item) -> Result<()> {
        let start = Instant::now();
        let pk = item.partition_key.clone();
        let sk = item.sort_key.clone();

        let result = self.inner.put(item).await;
        let elapsed_ms = start.elapsed().as_millis();

        match &result {
            Ok(()) => debug!(
                storage = self.storage_type,
                operation = "put",
                pk = %pk,
                sk = %sk,
                elapsed_ms,
                "Store call succeeded"
            ),
            Err(e) => self.record_failure("put", &pk, elapsed_ms, e),
        }

        result
    }

    async fn query_by_partition(&self, partition_key: &str) -> Result<Vec<Item>> {
        let start = Instant::now();

        let result = self.inner.query_by_partition(partition_key).await;
        let elapsed_ms = start.elapsed().as_millis();

        match &result {
            Ok(items) => debug!(
                storage = self.storage_type,
                operation = "query_by_partition",
                pk = %partition_key,
                count = items.len(),
                elapsed_ms,
                "Store call succeeded"
            ),
            Err(e) => self.record_failure("query_by_partition", partition_key, elapsed_ms, e),
        }

        result
    }
}
