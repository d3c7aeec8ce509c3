//! Stored item model.
//!
//! Parents and children live in one table. Every item belonging to a parent,
//! the parent included, carries the parent's partition key; the sort key
//! disambiguates items within that partition.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire value of [`ItemType::Parent`].
pub const PARENT_TYPE: &str = "Parent";
/// Wire value of [`ItemType::Child`].
pub const CHILD_TYPE: &str = "Child";

/// Parent/child discriminator, stored as data because the store has no
/// native notion of hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemType {
    Parent,
    Child,
    /// Any other caller-supplied value, kept verbatim.
    Other(String),
}

impl ItemType {
    pub fn as_str(&self) -> &str {
        match self {
            ItemType::Parent => PARENT_TYPE,
            ItemType::Child => CHILD_TYPE,
            ItemType::Other(s) => s,
        }
    }

    pub fn is_parent(&self) -> bool {
        matches!(self, ItemType::Parent)
    }

    pub fn is_child(&self) -> bool {
        matches!(self, ItemType::Child)
    }
}

impl From<&str> for ItemType {
    fn from(s: &str) -> Self {
        match s {
            PARENT_TYPE => ItemType::Parent,
            CHILD_TYPE => ItemType::Child,
            other => ItemType::Other(other.to_string()),
        }
    }
}

impl From<String> for ItemType {
    fn from(s: String) -> Self {
        match s.as_str() {
            PARENT_TYPE => ItemType::Parent,
            CHILD_TYPE => ItemType::Child,
            _ => ItemType::Other(s),
        }
    }
}

impl From<ItemType> for String {
    fn from(t: ItemType) -> Self {
        match t {
            ItemType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite primary key.
///
/// Ordering is partition key first, then sort key, both compared byte-wise.
/// That matches the range-scan order of the backends.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey {
    pub partition_key: String,
    pub sort_key: String,
}

impl ItemKey {
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition_key, self.sort_key)
    }
}

/// A parent or child record.
///
/// Serialises with the table's attribute names (`PK`, `SK`, `type`, `data`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "PK")]
    pub partition_key: String,
    #[serde(rename = "SK")]
    pub sort_key: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Caller payload, stored and returned verbatim.
    pub data: serde_json::Value,
}

impl Item {
    pub fn new(
        partition_key: impl Into<String>,
        sort_key: impl Into<String>,
        item_type: ItemType,
        data: serde_json::Value,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
            item_type,
            data,
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.partition_key.clone(), self.sort_key.clone())
    }
}
