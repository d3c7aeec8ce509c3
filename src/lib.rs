//! singletable - parent/child access over a single key-value table
//!
//! Parents and their children share one partition key and are told apart
//! by a stored `type` attribute, so one partition query returns a parent
//! together with all of its children.
//!
//! ## Layers
//! ```text
//! api::dispatch --> resolver::Resolver --> storage::ItemStore
//!                                              |
//!                          advice (Instrumented, Retrying, Deadline)
//!                                              |
//!                                  memory | sqlite | dynamo
//! ```

pub mod advice;
pub mod api;
pub mod config;
pub mod item;
pub mod resolver;
pub mod storage;
pub mod utils;
pub mod validation;

pub use item::{Item, ItemKey, ItemType};
pub use resolver::{
    CreateItemRequest, GetParentWithChildrenRequest, ParentWithChildren, Resolver, ResolverError,
    TypePolicy,
};
pub use storage::{ItemStore, StoreError};
pub use validation::ValidationError;
