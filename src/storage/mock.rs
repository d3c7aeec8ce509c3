//! Mock item store for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use super::{InMemoryItemStore, ItemStore, Result, StoreError};
use crate::item::Item;

/// Fake adapter that stores items in memory and records every call.
///
/// Counters increment when a call reaches the store, before any injected
/// failure is returned, so a zero count proves no store call was made.
#[derive(Default)]
pub struct MockItemStore {
    inner: InMemoryItemStore,
    put_calls: AtomicUsize,
    query_calls: AtomicUsize,
    fail_on_put: RwLock<Option<StoreError>>,
    fail_on_query: RwLock<Option<StoreError>>,
    queued_put_errors: Mutex<VecDeque<StoreError>>,
    queued_query_errors: Mutex<VecDeque<StoreError>>,
    delay: RwLock<Option<Duration>>,
}

impl MockItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.put_calls() + self.query_calls()
    }

    /// Fail every `put` with `error` until cleared with `None`.
    pub async fn set_fail_on_put(&self, error: Option<StoreError>) {
        *self.fail_on_put.write().await = error;
    }

    /// Fail every `query_by_partition` with `error` until cleared with `None`.
    pub async fn set_fail_on_query(&self, error: Option<StoreError>) {
        *self.fail_on_query.write().await = error;
    }

    /// Fail the next `put` with `error`. Queued errors are consumed in order.
    pub async fn queue_put_error(&self, error: StoreError) {
        self.queued_put_errors.lock().await.push_back(error);
    }

    /// Fail the next `query_by_partition` with `error`.
    pub async fn queue_query_error(&self, error: StoreError) {
        self.queued_query_errors.lock().await.push_back(error);
    }

    /// Sleep for `delay` at the start of every call.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write().await = delay;
    }

    /// Look up a stored item, bypassing the counters.
    pub async fn get_stored(&self, partition_key: &str, sort_key: &str) -> Option<Item> {
        self.inner.get(partition_key, sort_key).await
    }

    pub async fn stored_count(&self) -> usize {
        self.inner.len().await
    }

    async fn pause(&self) {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ItemStore for MockItemStore {
    async fn put(&self, item: Item) -> Result<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        if let Some(err) = self.queued_put_errors.lock().await.pop_front() {
            return Err(err);
        }
        if let Some(err) = self.fail_on_put.read().await.clone() {
            return Err(err);
        }
        self.inner.put(item).await
    }

    async fn query_by_partition(&self, partition_key: &str) -> Result<Vec<Item>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        if let Some(err) = self.queued_query_errors.lock().await.pop_front() {
            return Err(err);
        }
        if let Some(err) = self.fail_on_query.read().await.clone() {
            return Err(err);
        }
        self.inner.query_by_partition(partition_key).await
    }
}
