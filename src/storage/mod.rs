//! Key-value store adapter.
//!
//! Isolates the resolver from any particular store client. The adapter
//! exposes exactly two primitives:
//!
//! - [`ItemStore::put`]: unconditional upsert keyed by `(PK, SK)`
//! - [`ItemStore::query_by_partition`]: every item under one partition key,
//!   sort key ascending
//!
//! Backends translate their native failures into the closed [`StoreError`]
//! taxonomy. Backend error types never cross this boundary.
//!
//! ## Backends
//!
//! - [`InMemoryItemStore`]: ordered in-process map
//! - [`MockItemStore`]: in-memory fake with call counters and error injection
//! - `SqliteItemStore` (feature: sqlite)
//! - `DynamoItemStore` (feature: dynamo)

mod config;
pub mod memory;
pub mod mock;

#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "dynamo")]
pub mod dynamo;

#[cfg(feature = "dynamo")]
pub use config::DynamoConfig;
#[cfg(feature = "sqlite")]
pub use config::SqliteConfig;
pub use config::{StorageConfig, StorageType};
pub use memory::InMemoryItemStore;
pub use mock::MockItemStore;

#[cfg(feature = "dynamo")]
pub use dynamo::DynamoItemStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteItemStore;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::advice::{Deadline, Instrumented, Retrying};
use crate::item::Item;
use crate::utils::retry::RetryConfig;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the store adapter.
///
/// This set is closed: every backend maps its failures onto one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Backend rate-limited the call. Safe to retry with backoff.
    #[error("store throttled: {0}")]
    Throttled(String),

    /// Transient backend or network failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Deadline elapsed or the caller cancelled.
    ///
    /// A cancelled `put` may still have been applied; treat the write as
    /// indeterminate, not failed.
    #[error("store call cancelled: {0}")]
    Cancelled(String),

    /// Backend rejected the request as malformed (e.g. key too long).
    #[error("store rejected input: {0}")]
    InvalidInput(String),

    #[error("store error: {0}")]
    Unknown(String),
}

impl StoreError {
    /// Stable, lowercase name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Throttled(_) => "throttled",
            StoreError::Unavailable(_) => "unavailable",
            StoreError::Cancelled(_) => "cancelled",
            StoreError::InvalidInput(_) => "invalid_input",
            StoreError::Unknown(_) => "unknown",
        }
    }

    /// True for errors a caller may reasonably retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Throttled(_) | StoreError::Unavailable(_))
    }
}

/// Capability interface over a key-value store.
///
/// Implementations must be safe for concurrent use without external
/// locking. Neither method caches or retries; each invocation makes at most
/// one logical call to the backend.
///
/// Read consistency is whatever the backend natively offers. This layer
/// does not upgrade it.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert or fully replace the item stored under `(PK, SK)`.
    async fn put(&self, item: Item) -> Result<()>;

    /// Return every item whose partition key equals `partition_key`,
    /// ordered by sort key ascending.
    ///
    /// An empty partition yields an empty vector, not an error.
    async fn query_by_partition(&self, partition_key: &str) -> Result<Vec<Item>>;
}

#[async_trait]
impl<T: ItemStore + ?Sized> ItemStore for Arc<T> {
    async fn put(&self, item: Item) -> Result<()> {
        (**self).put(item).await
    }

    async fn query_by_partition(&self, partition_key: &str) -> Result<Vec<Item>> {
        (**self).query_by_partition(partition_key).await
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Unknown(format!("payload encoding: {}", err))
    }
}

/// Reject empty keys before they reach a backend.
pub(crate) fn ensure_key(partition_key: &str, sort_key: &str) -> Result<()> {
    if partition_key.is_empty() {
        return Err(StoreError::InvalidInput(
            "partition key cannot be empty".to_string(),
        ));
    }
    if sort_key.is_empty() {
        return Err(StoreError::InvalidInput(
            "sort key cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Reject an empty partition key before it reaches a backend.
pub(crate) fn ensure_partition_key(partition_key: &str) -> Result<()> {
    if partition_key.is_empty() {
        return Err(StoreError::InvalidInput(
            "partition key cannot be empty".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Factory
// ============================================================================

/// Initialize the item store based on configuration.
///
/// The backend is wrapped, innermost first, in [`Deadline`] (when a timeout
/// is configured), [`Retrying`] (when enabled) and [`Instrumented`].
pub async fn init_storage(
    config: &StorageConfig,
    retry: &RetryConfig,
) -> std::result::Result<Arc<dyn ItemStore>, Box<dyn std::error::Error>> {
    match config.storage_type {
        StorageType::Memory => {
            info!("Storage: memory");
            Ok(apply_advice(InMemoryItemStore::new(), "memory", config, retry))
        }
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            info!(path = %config.sqlite.path, "Storage: sqlite");
            let store = SqliteItemStore::connect(&config.sqlite.path).await?;
            store.init().await?;
            Ok(apply_advice(store, "sqlite", config, retry))
        }
        #[cfg(feature = "dynamo")]
        StorageType::Dynamo => {
            info!(
                table = %config.dynamo.table_name,
                region = ?config.dynamo.region,
                endpoint = ?config.dynamo.endpoint,
                consistent_read = config.dynamo.consistent_read,
                "Storage: dynamo"
            );
            let store = DynamoItemStore::from_config(&config.dynamo).await;
            Ok(apply_advice(store, "dynamo", config, retry))
        }
    }
}

/// Wrap a backend in the configured advice layers.
pub fn apply_advice<S: ItemStore + 'static>(
    store: S,
    storage_type: &'static str,
    config: &StorageConfig,
    retry: &RetryConfig,
) -> Arc<dyn ItemStore> {
    let store: Arc<dyn ItemStore> = match config.timeout() {
        Some(timeout) => Arc::new(Deadline::new(store, timeout)),
        None => Arc::new(store),
    };

    let store: Arc<dyn ItemStore> = if retry.enabled {
        Arc::new(Retrying::new(store, retry.clone()))
    } else {
        store
    };

    Arc::new(Instrumented::new(store, storage_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemType;
    use serde_json::json;

    #[test]
    fn test_store_error_kind() {
        assert_eq!(StoreError::Throttled("x".into()).kind(), "throttled");
        assert_eq!(StoreError::Unavailable("x".into()).kind(), "unavailable");
        assert_eq!(StoreError::Cancelled("x".into()).kind(), "cancelled");
        assert_eq!(StoreError::InvalidInput("x".into()).kind(), "invalid_input");
        assert_eq!(StoreError::Unknown("x".into()).kind(), "unknown");
    }

    #[test]
    fn test_store_error_is_retryable() {
        assert!(StoreError::Throttled("x".into()).is_retryable());
        assert!(StoreError::Unavailable("x".into()).is_retryable());
        assert!(!StoreError::Cancelled("x".into()).is_retryable());
        assert!(!StoreError::InvalidInput("x".into()).is_retryable());
        assert!(!StoreError::Unknown("x".into()).is_retryable());
    }

    #[test]
    fn test_ensure_key() {
        assert!(ensure_key("p1", "s1").is_ok());
        assert!(matches!(
            ensure_key("", "s1"),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            ensure_key("p1", ""),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_init_storage_memory() {
        let config = StorageConfig {
            storage_type: StorageType::Memory,
            ..Default::default()
        };
        let store = init_storage(&config, &RetryConfig::default())
            .await
            .unwrap();

        store
            .put(Item::new("p1", "meta", ItemType::Parent, json!(1)))
            .await
            .unwrap();

        let items = store.query_by_partition("p1").await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_init_storage_sqlite_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("items.db");

        let mut config = StorageConfig {
            storage_type: StorageType::Sqlite,
            ..Default::default()
        };
        config.sqlite.path = path.to_string_lossy().to_string();

        let store = init_storage(&config, &RetryConfig::default())
            .await
            .unwrap();
        store
            .put(Item::new("p1", "meta", ItemType::Parent, json!({"a": 1})))
            .await
            .unwrap();

        assert!(path.exists());
        let items = store.query_by_partition("p1").await.unwrap();
        assert_eq!(items[0].data, json!({"a": 1}));
    }
}
