//! Typed request/response contract for the three operations.
//!
//! Field and operation names follow the wire schema: requests carry `PK`,
//! `SK`, `type` and `data`; operations are named `createParentItem`,
//! `createChildItem` and `getParentWithChildren`.
//!
//! ```json
//! {"op": "createParentItem", "PK": "p1", "SK": "meta", "type": "Parent", "data": {}}
//! {"op": "getParentWithChildren", "PK": "p1"}
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::item::Item;
use crate::resolver::{CreateItemRequest, GetParentWithChildrenRequest, Resolver, ResolverError};
use crate::validation::ValidationError;

/// One request, tagged by operation name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Operation {
    #[serde(rename = "createParentItem")]
    CreateParentItem(CreateItemRequest),
    #[serde(rename = "createChildItem")]
    CreateChildItem(CreateItemRequest),
    #[serde(rename = "getParentWithChildren")]
    GetParentWithChildren(GetParentWithChildrenRequest),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateParentItem(_) => "createParentItem",
            Operation::CreateChildItem(_) => "createChildItem",
            Operation::GetParentWithChildren(_) => "getParentWithChildren",
        }
    }
}

/// Successful result: the stored item or the partition's items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Item(Item),
    Items(Vec<Item>),
}

/// Error body returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// `validation`, `throttled`, `unavailable`, `cancelled`,
    /// `invalid_input` or `unknown`.
    pub kind: String,
    pub message: String,
}

impl From<&ResolverError> for ErrorBody {
    fn from(err: &ResolverError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Outcome of one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Ok(Payload),
    Error(ErrorBody),
}

impl Response {
    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok(_))
    }
}

impl From<Result<Payload, ResolverError>> for Response {
    fn from(result: Result<Payload, ResolverError>) -> Self {
        match result {
            Ok(payload) => Response::Ok(payload),
            Err(e) => Response::Error(ErrorBody::from(&e)),
        }
    }
}

/// Run one operation against the resolver.
pub async fn dispatch(resolver: &Resolver, op: Operation) -> Response {
    debug!(operation = op.name(), "Dispatching request");

    let result = match op {
        Operation::CreateParentItem(req) => {
            resolver.create_parent_item(req).await.map(Payload::Item)
        }
        Operation::CreateChildItem(req) => {
            resolver.create_child_item(req).await.map(Payload::Item)
        }
        Operation::GetParentWithChildren(req) => resolver
            .get_parent_with_children(req)
            .await
            .map(Payload::Items),
    };
    result.into()
}

/// Decode one JSON request line, run it, and encode the response line.
///
/// A line that does not decode yields a `validation` error response.
pub async fn handle_line(resolver: &Resolver, line: &str) -> String {
    let response = match serde_json::from_str::<Operation>(line) {
        Ok(op) => dispatch(resolver, op).await,
        Err(e) => {
            let err = ResolverError::from(ValidationError::Malformed(e.to_string()));
            Response::Error(ErrorBody::from(&err))
        }
    };
    encode(&response)
}

fn encode(response: &Response) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            r#"{{"error":{{"kind":"unknown","message":"response encoding failed: {}"}}}}"#,
            e.to_string().replace('"', "'")
        )
    })
}
