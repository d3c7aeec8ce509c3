//! Deadline advice.
//!
//! Bounds every store call by a fixed timeout. A call that outlives its
//! deadline is dropped and reported as [`StoreError::Cancelled`].

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use crate::item::Item;
use crate::storage::{ItemStore, Result, StoreError};

/// Wrapper that enforces a per-call deadline on any storage implementation.
///
/// Dropping the in-flight future is the cancellation mechanism; a `put`
/// cancelled this way may or may not have been applied by the backend.
pub struct Deadline<T> {
    inner: T,
    timeout: Duration,
}

impl<T> Deadline<T> {
    pub fn new(inner: T, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    fn expired(&self, operation: &str) -> StoreError {
        StoreError::Cancelled(format!(
            "{} exceeded deadline of {}ms",
            operation,
            self.timeout.as_millis()
        ))
    }
}

#[async_trait]
impl<T: ItemStore> ItemStore for Deadline<T> {
    async fn put(&self, item: Item) -> Result<()> {
        timeout(self.timeout, self.inner.put(item))
            .await
            .map_err(|_| self.expired("put"))?
    }

    async fn query_by_partition(&self, partition_key: &str) -> Result<Vec<Item>> {
        timeout(self.timeout, self.inner.query_by_partition(partition_key))
            .await
            .map_err(|_| self.expired("query_by_partition"))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemType;
    use crate::storage::MockItemStore;
    use serde_json::json;

    fn item() -> Item {
        Item::new("p1", "meta", ItemType::Parent, json!({"name": "a"}))
    }

    #[tokio::test]
    async fn test_fast_calls_pass_through() {
        let store = Deadline::new(MockItemStore::new(), Duration::from_secs(5));

        store.put(item()).await.unwrap();
        let items = store.query_by_partition("p1").await.unwrap();

        assert_eq!(items, vec![item()]);
    }

    #[tokio::test]
    async fn test_slow_query_is_cancelled() {
        let mock = MockItemStore::new();
        mock.set_delay(Some(Duration::from_millis(200))).await;
        let store = Deadline::new(mock, Duration::from_millis(20));

        let err = store.query_by_partition("p1").await.unwrap_err();
        assert!(matches!(err, StoreError::Cancelled(_)));
    }

    #[tokio::test]
    async fn test_slow_put_is_cancelled() {
        let mock = MockItemStore::new();
        mock.set_delay(Some(Duration::from_millis(200))).await;
        let store = Deadline::new(mock, Duration::from_millis(20));

        let err = store.put(item()).await.unwrap_err();
        assert_eq!(err.kind(), "cancelled");
    }

    #[tokio::test]
    async fn test_inner_errors_are_not_rewritten() {
        let mock = MockItemStore::new();
        mock.set_fail_on_put(Some(StoreError::Throttled("slow down".into())))
            .await;
        let store = Deadline::new(mock, Duration::from_secs(5));

        let err = store.put(item()).await.unwrap_err();
        assert_eq!(err, StoreError::Throttled("slow down".into()));
    }
}
