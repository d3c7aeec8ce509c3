//! DynamoDB ItemStore implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::debug;

use super::attribute::{item_from_attributes, item_to_attributes};
use super::PK_ATTR;
use crate::item::Item;
use crate::storage::{
    ensure_key, ensure_partition_key, DynamoConfig, ItemStore, Result, StoreError,
};

/// DynamoDB-backed item store.
///
/// `Client` is cheap to clone and safe for concurrent use; one instance is
/// shared by all callers.
pub struct DynamoItemStore {
    client: Client,
    table_name: String,
    consistent_read: bool,
}

impl DynamoItemStore {
    /// Create with an explicit client (for testing).
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            consistent_read: false,
        }
    }

    /// Request strongly-consistent partition queries.
    pub fn with_consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = consistent_read;
        self
    }

    /// Build a client from configuration.
    ///
    /// Uses default credentials from the environment (AWS_ACCESS_KEY_ID,
    /// AWS_SECRET_ACCESS_KEY, or IAM role).
    pub async fn from_config(config: &DynamoConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self::new(Client::from_conf(builder.build()), &config.table_name)
            .with_consistent_read(config.consistent_read)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// Map a DynamoDB error code onto the store taxonomy.
pub(crate) fn classify_error_code(code: Option<&str>, message: String) -> StoreError {
    match code {
        Some(
            "ProvisionedThroughputExceededException"
            | "ThrottlingException"
            | "RequestLimitExceeded"
            | "LimitExceededException",
        ) => StoreError::Throttled(message),
        Some("InternalServerError" | "ServiceUnavailable" | "InternalFailure") => {
            StoreError::Unavailable(message)
        }
        Some(
            "ValidationException"
            | "ResourceNotFoundException"
            | "ItemCollectionSizeLimitExceededException"
            | "SerializationException",
        ) => StoreError::InvalidInput(message),
        _ => StoreError::Unknown(message),
    }
}

/// Translate an SDK error without leaking its type.
fn translate<E, R>(operation: &str, err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = format!("{} failed: {}", operation, DisplayErrorContext(&err));
    match &err {
        SdkError::ServiceError(ctx) => classify_error_code(ctx.err().code(), message),
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            StoreError::Unavailable(message)
        }
        SdkError::ConstructionFailure(_) => StoreError::InvalidInput(message),
        _ => StoreError::Unknown(message),
    }
}

#[async_trait]
impl ItemStore for DynamoItemStore {
    async fn put(&self, item: Item) -> Result<()> {
        ensure_key(&item.partition_key, &item.sort_key)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item_to_attributes(&item)))
            .send()
            .await
            .map_err(|e| translate("PutItem", e))?;

        debug!(
            table = %self.table_name,
            pk = %item.partition_key,
            sk = %item.sort_key,
            "Stored item in DynamoDB"
        );
        Ok(())
    }

    async fn query_by_partition(&self, partition_key: &str) -> Result<Vec<Item>> {
        ensure_partition_key(partition_key)?;

        let mut items = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        // Follow pagination until the partition is exhausted.
        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("#pk = :pk")
                .expression_attribute_names("#pk", PK_ATTR)
                .expression_attribute_values(":pk", AttributeValue::S(partition_key.to_string()))
                .consistent_read(self.consistent_read)
                .scan_index_forward(true)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| translate("Query", e))?;

            for attrs in output.items() {
                items.push(item_from_attributes(attrs)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!(
            table = %self.table_name,
            pk = %partition_key,
            count = items.len(),
            "Queried partition in DynamoDB"
        );
        Ok(items)
    }
}
