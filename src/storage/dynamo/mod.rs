//! DynamoDB implementation of the item store.
//!
//! The table uses a string hash key `PK` and a string range key `SK`.
//! Non-key attributes are `type` (string) and `data` (the payload, converted
//! from JSON into native attribute values).

mod attribute;
mod item_store;

pub use attribute::{attribute_to_json, item_from_attributes, item_to_attributes, json_to_attribute};
pub use item_store::DynamoItemStore;

/// Partition key attribute name.
pub const PK_ATTR: &str = "PK";
/// Sort key attribute name.
pub const SK_ATTR: &str = "SK";
/// Item type attribute name.
pub const TYPE_ATTR: &str = "type";
/// Payload attribute name.
pub const DATA_ATTR: &str = "data";
