//! In-process item store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ensure_key, ensure_partition_key, ItemStore, Result};
use crate::item::{Item, ItemKey};

/// Item store backed by an ordered map.
///
/// Keys order by partition then sort key, so a partition query is a single
/// contiguous range scan. Reads are strongly consistent.
#[derive(Default)]
pub struct InMemoryItemStore {
    items: RwLock<BTreeMap<ItemKey, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single item by key.
    pub async fn get(&self, partition_key: &str, sort_key: &str) -> Option<Item> {
        let key = ItemKey::new(partition_key, sort_key);
        self.items.read().await.get(&key).cloned()
    }

    /// Number of stored items across all partitions.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn put(&self, item: Item) -> Result<()> {
        ensure_key(&item.partition_key, &item.sort_key)?;

        let key = item.key();
        debug!(pk = %key.partition_key, sk = %key.sort_key, "Stored item in memory");
        self.items.write().await.insert(key, item);
        Ok(())
    }

    async fn query_by_partition(&self, partition_key: &str) -> Result<Vec<Item>> {
        ensure_partition_key(partition_key)?;

        // The empty sort key is the smallest possible key in the partition.
        let start = ItemKey::new(partition_key, "");
        let items = self.items.read().await;
        Ok(items
            .range(start..)
            .take_while(|(k, _)| k.partition_key == partition_key)
            .map(|(_, item)| item.clone())
            .collect())
    }
}
