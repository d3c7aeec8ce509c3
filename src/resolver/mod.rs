//! Resolver layer: the three parent/child access operations.
//!
//! Each operation validates its input, issues exactly one store call and
//! returns the outcome. The resolver holds no state beyond its store handle
//! and never retries; wrap the store in [`crate::advice::Retrying`] for that.
//!
//! | Operation | Store call |
//! |---|---|
//! | [`Resolver::create_parent_item`] | `put` |
//! | [`Resolver::create_child_item`] | `put` |
//! | [`Resolver::get_parent_with_children`] | `query_by_partition` |

pub mod presentation;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::item::{Item, ItemType};
use crate::storage::{ItemStore, StoreError};
use crate::validation::{
    validate_data, validate_item_type, validate_partition_key, validate_sort_key, ValidationError,
};

pub use presentation::ParentWithChildren;

/// Input for `createParentItem` and `createChildItem`.
///
/// Missing fields deserialize as empty and are rejected by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateItemRequest {
    #[serde(rename = "PK")]
    pub partition_key: String,
    #[serde(rename = "SK")]
    pub sort_key: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub data: Value,
}

impl CreateItemRequest {
    pub fn new(
        partition_key: impl Into<String>,
        sort_key: impl Into<String>,
        item_type: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
            item_type: item_type.into(),
            data,
        }
    }
}

/// Input for `getParentWithChildren`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetParentWithChildrenRequest {
    #[serde(rename = "PK")]
    pub partition_key: String,
}

impl GetParentWithChildrenRequest {
    pub fn new(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
        }
    }
}

/// How the caller-supplied `type` field is treated on create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypePolicy {
    /// Reject a type that does not match the operation.
    #[default]
    Verify,
    /// Replace the supplied type with the operation's type.
    Force,
    /// Store whatever non-empty type the caller supplied.
    Trust,
}

impl TypePolicy {
    fn resolve(self, supplied: String, expected: ItemType) -> Result<ItemType, ValidationError> {
        match self {
            TypePolicy::Verify if supplied == expected.as_str() => Ok(expected),
            TypePolicy::Verify => Err(ValidationError::TypeMismatch {
                expected,
                actual: supplied,
            }),
            TypePolicy::Force => Ok(expected),
            TypePolicy::Trust => Ok(ItemType::from(supplied)),
        }
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub type_policy: TypePolicy,
}

/// Failure of a resolver operation.
///
/// Validation failures happen before any store call; store failures are
/// passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResolverError {
    /// `validation`, or the store error's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolverError::Validation(_) => "validation",
            ResolverError::Store(e) => e.kind(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ResolverError::Validation(_))
    }

    pub fn is_store(&self) -> bool {
        matches!(self, ResolverError::Store(_))
    }
}

/// Entry point for the parent/child access patterns.
///
/// Cheap to clone; clones share the store handle.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn ItemStore>,
    type_policy: TypePolicy,
}

impl Resolver {
    /// Create a resolver with the default `verify` type policy.
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            store,
            type_policy: TypePolicy::default(),
        }
    }

    pub fn with_type_policy(mut self, type_policy: TypePolicy) -> Self {
        self.type_policy = type_policy;
        self
    }

    pub fn from_config(store: Arc<dyn ItemStore>, config: &ResolverConfig) -> Self {
        Self::new(store).with_type_policy(config.type_policy)
    }

    pub fn type_policy(&self) -> TypePolicy {
        self.type_policy
    }

    /// Store a parent item, overwriting any item under the same key pair.
    ///
    /// Returns the item as stored.
    pub async fn create_parent_item(&self, req: CreateItemRequest) -> Result<Item, ResolverError> {
        self.create_item(req, ItemType::Parent, "createParentItem").await
    }

    /// Store a child item, overwriting any item under the same key pair.
    ///
    /// The owning parent is not checked: a child written under a partition
    /// with no parent item is stored and later returned on its own.
    pub async fn create_child_item(&self, req: CreateItemRequest) -> Result<Item, ResolverError> {
        self.create_item(req, ItemType::Child, "createChildItem").await
    }

    /// Return every item in a partition, ordered by sort key ascending.
    ///
    /// The parent and its children come back as one flat list. An unknown
    /// partition yields an empty list. See [`ParentWithChildren`] to split
    /// the result.
    pub async fn get_parent_with_children(
        &self,
        req: GetParentWithChildrenRequest,
    ) -> Result<Vec<Item>, ResolverError> {
        if let Err(e) = validate_partition_key(&req.partition_key) {
            warn!(operation = "getParentWithChildren", error = %e, "Rejected request");
            return Err(e.into());
        }

        let items = self.store.query_by_partition(&req.partition_key).await?;

        debug!(
            operation = "getParentWithChildren",
            pk = %req.partition_key,
            count = items.len(),
            "Resolved partition"
        );
        Ok(items)
    }

    async fn create_item(
        &self,
        req: CreateItemRequest,
        expected: ItemType,
        operation: &'static str,
    ) -> Result<Item, ResolverError> {
        let item = match self.build_item(req, expected) {
            Ok(item) => item,
            Err(e) => {
                warn!(operation, error = %e, "Rejected request");
                return Err(e.into());
            }
        };

        self.store.put(item.clone()).await?;

        debug!(
            operation,
            pk = %item.partition_key,
            sk = %item.sort_key,
            item_type = %item.item_type,
            "Stored item"
        );
        Ok(item)
    }

    fn build_item(
        &self,
        req: CreateItemRequest,
        expected: ItemType,
    ) -> Result<Item, ValidationError> {
        validate_partition_key(&req.partition_key)?;
        validate_sort_key(&req.sort_key)?;
        validate_item_type(&req.item_type)?;
        validate_data(&req.data)?;

        let item_type = self.type_policy.resolve(req.item_type, expected)?;

        Ok(Item {
            partition_key: req.partition_key,
            sort_key: req.sort_key,
            item_type,
            data: req.data,
        })
    }
}
