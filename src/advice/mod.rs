//! Aspect-oriented advice for cross-cutting concerns.
//!
//! This module provides wrapper types that add orthogonal behavior
//! (tracing, deadlines, retries) around any [`ItemStore`] without polluting
//! the backends or the resolver.
//!
//! # Architecture
//!
//! Advice is applied at store composition time, not in implementations:
//!
//! ```ignore
//! // Core implementation - pure storage logic
//! let store = SqliteItemStore::new(pool);
//!
//! // Apply advice layers
//! let store = Deadline::new(store, Duration::from_secs(2));
//! let store = Instrumented::new(store, "sqlite");
//!
//! // Use as normal - advice is transparent
//! store.put(item).await?;
//! ```
//!
//! # Available Advice
//!
//! - [`Instrumented`] - Logs duration and outcome of every call
//! - [`Deadline`] - Bounds every call, yielding `StoreError::Cancelled`
//! - [`Retrying`] - Retries retryable failures with exponential backoff
//!
//! [`ItemStore`]: crate::storage::ItemStore

mod deadline;
mod instrumented;
mod retrying;

pub use deadline::Deadline;
pub use instrumented::Instrumented;
pub use retrying::Retrying;
