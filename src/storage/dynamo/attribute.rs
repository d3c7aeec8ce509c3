//! JSON <-> DynamoDB attribute value conversion.
//!
//! Writes produce `M`, `L`, `S`, `N`, `BOOL` and `NULL`. Reads additionally
//! accept string and number sets, which come back as JSON arrays.
//!
//! Payloads are preserved by value, not by text. DynamoDB normalises `N`
//! attributes, so `1.0` is stored as the number 1 and reads back as the JSON
//! integer `1`, and trailing zeros or exponents are not kept.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};

use super::{DATA_ATTR, PK_ATTR, SK_ATTR, TYPE_ATTR};
use crate::item::{Item, ItemType};
use crate::storage::{Result, StoreError};

/// Convert a JSON value into a DynamoDB attribute value.
pub fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(json_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

fn parse_number(n: &str) -> Result<Value> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(Value::Number(i.into()));
    }
    if let Ok(u) = n.parse::<u64>() {
        return Ok(Value::Number(u.into()));
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| StoreError::Unknown(format!("unrepresentable number attribute: {}", n)))
}

/// Convert a DynamoDB attribute value back into JSON.
pub fn attribute_to_json(attr: &AttributeValue) -> Result<Value> {
    match attr {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::L(values) => values
            .iter()
            .map(attribute_to_json)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::M(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), attribute_to_json(v)?);
            }
            Ok(Value::Object(out))
        }
        AttributeValue::Ss(values) => Ok(Value::Array(
            values.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(values) => values
            .iter()
            .map(|n| parse_number(n))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Err(StoreError::Unknown(format!(
            "unsupported attribute type: {:?}",
            other
        ))),
    }
}

/// Build the attribute map written for an item.
pub fn item_to_attributes(item: &Item) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            PK_ATTR.to_string(),
            AttributeValue::S(item.partition_key.clone()),
        ),
        (SK_ATTR.to_string(), AttributeValue::S(item.sort_key.clone())),
        (
            TYPE_ATTR.to_string(),
            AttributeValue::S(item.item_type.as_str().to_string()),
        ),
        (DATA_ATTR.to_string(), json_to_attribute(&item.data)),
    ])
}

fn string_attr(attrs: &HashMap<String, AttributeValue>, name: &str) -> Result<String> {
    match attrs.get(name) {
        Some(AttributeValue::S(s)) => Ok(s.clone()),
        Some(_) => Err(StoreError::Unknown(format!(
            "attribute {} is not a string",
            name
        ))),
        None => Err(StoreError::Unknown(format!("missing attribute {}", name))),
    }
}

/// Rebuild an item from a stored attribute map.
pub fn item_from_attributes(attrs: &HashMap<String, AttributeValue>) -> Result<Item> {
    let data = attrs
        .get(DATA_ATTR)
        .ok_or_else(|| StoreError::Unknown(format!("missing attribute {}", DATA_ATTR)))?;

    Ok(Item {
        partition_key: string_attr(attrs, PK_ATTR)?,
        sort_key: string_attr(attrs, SK_ATTR)?,
        item_type: ItemType::from(string_attr(attrs, TYPE_ATTR)?),
        data: attribute_to_json(data)?,
    })
}
