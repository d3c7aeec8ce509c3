//! Input validation for resolver requests.
//!
//! Every check here runs before any store call, so a request that fails
//! validation never reaches the backend.

use crate::item::ItemType;

/// Length limits for validated fields (bytes, UTF-8).
///
/// Key limits follow DynamoDB's: 2048 bytes for a partition key and
/// 1024 bytes for a sort key.
pub mod limits {
    /// Maximum partition key length.
    pub const MAX_PARTITION_KEY_LENGTH: usize = 2048;
    /// Maximum sort key length.
    pub const MAX_SORT_KEY_LENGTH: usize = 1024;
    /// Maximum item type length.
    pub const MAX_ITEM_TYPE_LENGTH: usize = 64;
}

/// Request field names, as they appear on the wire.
pub mod fields {
    pub const PARTITION_KEY: &str = "PK";
    pub const SORT_KEY: &str = "SK";
    pub const ITEM_TYPE: &str = "type";
    pub const DATA: &str = "data";
}

/// Caller input was malformed or incomplete.
///
/// Always recoverable by correcting the input; never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: ItemType, actual: String },

    #[error("malformed request: {0}")]
    Malformed(String),
}

fn validate_bounded(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.len() > max {
        return Err(ValidationError::TooLong {
            field,
            max,
            actual: value.len(),
        });
    }
    Ok(())
}

/// Validate a partition key: non-empty, at most 2048 bytes.
pub fn validate_partition_key(pk: &str) -> Result<(), ValidationError> {
    validate_bounded(
        fields::PARTITION_KEY,
        pk,
        limits::MAX_PARTITION_KEY_LENGTH,
    )
}

/// Validate a sort key: non-empty, at most 1024 bytes.
pub fn validate_sort_key(sk: &str) -> Result<(), ValidationError> {
    validate_bounded(fields::SORT_KEY, sk, limits::MAX_SORT_KEY_LENGTH)
}

/// Validate a caller-supplied item type: non-empty, at most 64 bytes.
///
/// Whether the value must match the invoked operation is decided by the
/// resolver's type policy, not here.
pub fn validate_item_type(item_type: &str) -> Result<(), ValidationError> {
    validate_bounded(fields::ITEM_TYPE, item_type, limits::MAX_ITEM_TYPE_LENGTH)
}

/// Validate the payload is present. JSON `null` counts as absent.
pub fn validate_data(data: &serde_json::Value) -> Result<(), ValidationError> {
    if data.is_null() {
        return Err(ValidationError::Empty {
            field: fields::DATA,
        });
    }
    Ok(())
}
