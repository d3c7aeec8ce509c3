//! SQLite ItemStore implementation.

use std::path::Path;

use async_trait::async_trait;
use sea_query::{Expr, OnConflict, Order, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::item::{Item, ItemType};
use crate::storage::schema::{Items, CREATE_ITEMS_TABLE};
use crate::storage::{ensure_key, ensure_partition_key, ItemStore, Result};

/// Path value selecting a private in-memory database.
const MEMORY_PATH: &str = ":memory:";

/// SQLite implementation of ItemStore.
pub struct SqliteItemStore {
    pool: SqlitePool,
}

impl SqliteItemStore {
    /// Create a new SQLite item store over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `path`.
    ///
    /// `:memory:` opens a single-connection in-memory database, since every
    /// SQLite connection to `:memory:` sees its own empty database.
    pub async fn connect(path: &str) -> Result<Self> {
        let pool = if path == MEMORY_PATH {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await?
        } else {
            if let Some(parent) = Path::new(path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
            {
                std::fs::create_dir_all(parent)
                    .map_err(|e| crate::storage::StoreError::Unavailable(e.to_string()))?;
            }
            SqlitePool::connect(&format!("sqlite:{}?mode=rwc", path)).await?
        };

        Ok(Self::new(pool))
    }

    /// Create the items table if it does not exist.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(CREATE_ITEMS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// The underlying pool, for test cleanup and diagnostics.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn put(&self, item: Item) -> Result<()> {
        ensure_key(&item.partition_key, &item.sort_key)?;

        let data = serde_json::to_string(&item.data)?;

        let (sql, values) = Query::insert()
            .into_table(Items::Table)
            .columns([Items::Pk, Items::Sk, Items::ItemType, Items::Data])
            .values_panic([
                item.partition_key.as_str().into(),
                item.sort_key.as_str().into(),
                item.item_type.as_str().into(),
                data.into(),
            ])
            .on_conflict(
                OnConflict::columns([Items::Pk, Items::Sk])
                    .update_columns([Items::ItemType, Items::Data])
                    .to_owned(),
            )
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        debug!(pk = %item.partition_key, sk = %item.sort_key, "Stored item in SQLite");
        Ok(())
    }

    async fn query_by_partition(&self, partition_key: &str) -> Result<Vec<Item>> {
        ensure_partition_key(partition_key)?;

        let (sql, values) = Query::select()
            .columns([Items::Pk, Items::Sk, Items::ItemType, Items::Data])
            .from(Items::Table)
            .and_where(Expr::col(Items::Pk).eq(partition_key))
            .order_by(Items::Sk, Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_with(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let item_type: String = row.try_get("item_type")?;
            let data: String = row.try_get("data")?;
            items.push(Item {
                partition_key: row.try_get("pk")?,
                sort_key: row.try_get("sk")?,
                item_type: ItemType::from(item_type),
                data: serde_json::from_str(&data)?,
            });
        }

        debug!(pk = %partition_key, count = items.len(), "Queried partition in SQLite");
        Ok(items)
    }
}
