//! JSON-RPC envelopes as Bitcoin Core speaks them.
//!
//! Requests carry `{method, params, jsonrpc, id}`; responses carry
//! `{result, error, id}`. Optional request members are left off the wire
//! when unset so caller-built batches go out exactly as built.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RpcError, ServerError};

/// Version marker sent with every single call.
pub const JSONRPC_VERSION: f64 = 1.0;

// ==============================================================================
// Request Ids
// ==============================================================================

/// A JSON-RPC request id. Bitcoin Core echoes it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Num(i64),
    Str(String),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Num(n)
    }
}

impl From<i32> for RequestId {
    fn from(n: i32) -> Self {
        Self::Num(n.into())
    }
}

impl From<u32> for RequestId {
    fn from(n: u32) -> Self {
        Self::Num(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

// ==============================================================================
// Envelopes
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: None,
            jsonrpc: None,
            id: None,
        }
    }

    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn jsonrpc(mut self, jsonrpc: Value) -> Self {
        self.jsonrpc = Some(jsonrpc);
        self
    }

    pub fn id(mut self, id: impl Into<RequestId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub id: Option<RequestId>,
}

impl RpcResponse {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub(crate) fn id_display(&self) -> String {
        match &self.id {
            Some(id) => id.to_string(),
            None => "null".to_owned(),
        }
    }
}

/// Body of a batch call: one envelope or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchRequest {
    Single(RpcRequest),
    Many(Vec<RpcRequest>),
}

impl From<RpcRequest> for BatchRequest {
    fn from(request: RpcRequest) -> Self {
        Self::Single(request)
    }
}

impl From<Vec<RpcRequest>> for BatchRequest {
    fn from(requests: Vec<RpcRequest>) -> Self {
        Self::Many(requests)
    }
}

/// Raw reply to a batch call, in the order the server sent it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchResponse {
    Single(RpcResponse),
    Many(Vec<RpcResponse>),
}

impl BatchResponse {
    /// Look up a response by id. Ids are not checked for uniqueness, the
    /// first match wins.
    pub fn by_id(&self, id: &RequestId) -> Option<&RpcResponse> {
        match self {
            Self::Single(response) => (response.id.as_ref() == Some(id)).then_some(response),
            Self::Many(responses) => responses.iter().find(|r| r.id.as_ref() == Some(id)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(responses) => responses.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ==============================================================================
// Decoding
// ==============================================================================

/// Decode a body as a response envelope. Returns `None` unless the body is a
/// JSON object carrying a `result` or `error` member.
pub(crate) fn decode_envelope(body: &[u8]) -> Option<RpcResponse> {
    let value: Value = serde_json::from_slice(body).ok()?;
    envelope_from_value(value)
}

pub(crate) fn decode_batch(body: &[u8]) -> Option<BatchResponse> {
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Array(items) => items
            .into_iter()
            .map(envelope_from_value)
            .collect::<Option<Vec<_>>>()
            .map(BatchResponse::Many),
        value => envelope_from_value(value).map(BatchResponse::Single),
    }
}

fn envelope_from_value(value: Value) -> Option<RpcResponse> {
    let obj = value.as_object()?;
    if !obj.contains_key("result") && !obj.contains_key("error") {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Parse the `error` member of an envelope into a [`ServerError`].
///
/// Bitcoin Core errors are `{"code": <int>, "message": <string>}`. Anything
/// else is reported as an invalid response carrying the raw JSON.
pub(crate) fn parse_server_error(err: Value) -> RpcError {
    match serde_json::from_value::<ServerError>(err.clone()) {
        Ok(parsed) => RpcError::Server(parsed),
        Err(_) => RpcError::InvalidResponse(format!("non-standard JSON-RPC error: {err}")),
    }
}
