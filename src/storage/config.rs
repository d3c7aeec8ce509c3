//! Storage configuration types.

use std::time::Duration;

use serde::Deserialize;

/// Storage type discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// In-process ordered map. Contents are lost on exit.
    Memory,
    /// SQLite file (requires `sqlite` feature).
    #[cfg(feature = "sqlite")]
    Sqlite,
    /// Amazon DynamoDB (requires `dynamo` feature).
    #[cfg(feature = "dynamo")]
    Dynamo,
}

impl Default for StorageType {
    #[cfg(feature = "sqlite")]
    fn default() -> Self {
        StorageType::Sqlite
    }

    #[cfg(not(feature = "sqlite"))]
    fn default() -> Self {
        StorageType::Memory
    }
}

/// Storage configuration (discriminated union).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage type discriminator.
    #[serde(rename = "type")]
    pub storage_type: StorageType,

    /// SQLite-specific configuration.
    #[cfg(feature = "sqlite")]
    pub sqlite: SqliteConfig,

    /// DynamoDB-specific configuration.
    #[cfg(feature = "dynamo")]
    pub dynamo: DynamoConfig,

    /// Per-call deadline in milliseconds. 0 disables the deadline.
    pub timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::default(),
            #[cfg(feature = "sqlite")]
            sqlite: SqliteConfig::default(),
            #[cfg(feature = "dynamo")]
            dynamo: DynamoConfig::default(),
            timeout_ms: 0,
        }
    }
}

impl StorageConfig {
    /// Get the per-call deadline, or None if disabled.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms > 0 {
            Some(Duration::from_millis(self.timeout_ms))
        } else {
            None
        }
    }
}

/// SQLite-specific configuration.
#[cfg(feature = "sqlite")]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database file path. `:memory:` selects a private in-memory database.
    pub path: String,
}

#[cfg(feature = "sqlite")]
impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "data/singletable.db".to_string(),
        }
    }
}

/// DynamoDB-specific configuration.
#[cfg(feature = "dynamo")]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DynamoConfig {
    /// Table name. Must have string hash key `PK` and string range key `SK`.
    pub table_name: String,
    /// AWS region. Falls back to the default provider chain when unset.
    pub region: Option<String>,
    /// Custom endpoint URL (e.g. DynamoDB Local).
    pub endpoint: Option<String>,
    /// Request strongly-consistent reads for partition queries.
    /// DynamoDB's default is eventually consistent.
    pub consistent_read: bool,
}

#[cfg(feature = "dynamo")]
impl Default for DynamoConfig {
    fn default() -> Self {
        Self {
            table_name: "DDB-Table".to_string(),
            region: None,
            endpoint: None,
            consistent_read: false,
        }
    }
}
