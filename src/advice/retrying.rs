//! Retry advice.
//!
//! Re-issues store calls that failed with a retryable error, using the
//! exponential backoff from [`RetryConfig`]. Only applied when explicitly
//! enabled in configuration; the store adapter itself never retries.
//!
//! `put` is retried on `Throttled` only. `query_by_partition` is a pure
//! read and is also retried on `Unavailable`, where a `put` may have been
//! applied before the failure surfaced.

use std::time::Duration;

use async_trait::async_trait;
use backon::Retryable;
use tracing::warn;

use crate::item::Item;
use crate::storage::{ItemStore, Result, StoreError};
use crate::utils::retry::RetryConfig;

/// Wrapper that retries transient failures of any storage implementation.
pub struct Retrying<T> {
    inner: T,
    config: RetryConfig,
}

impl<T> Retrying<T> {
    pub fn new(inner: T, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

fn retry_put(err: &StoreError) -> bool {
    matches!(err, StoreError::Throttled(_))
}

fn retry_query(err: &StoreError) -> bool {
    err.is_retryable()
}

#[async_trait]
impl<T: ItemStore> ItemStore for Retrying<T> {
    async fn put(&self, item: Item) -> Result<()> {
        let inner = &self.inner;
        let pk = item.partition_key.clone();

        (|| {
            let item = item.clone();
            async move { inner.put(item).await }
        })
        .retry(self.config.backoff())
        .when(retry_put)
        .notify(|err: &StoreError, dur: Duration| {
            warn!(
                operation = "put",
                pk = %pk,
                error = %err,
                delay = ?dur,
                "Store call failed, retrying"
            );
        })
        .await
    }

    async fn query_by_partition(&self, partition_key: &str) -> Result<Vec<Item>> {
        let inner = &self.inner;

        (|| async move { inner.query_by_partition(partition_key).await })
            .retry(self.config.backoff())
            .when(retry_query)
            .notify(|err: &StoreError, dur: Duration| {
                warn!(
                    operation = "query_by_partition",
                    pk = %partition_key,
                    error = %err,
                    delay = ?dur,
                    "Store call failed, retrying"
                );
            })
            .await
    }
}
