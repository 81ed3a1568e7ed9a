//! JSON-RPC 2.0 request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::template;

/// The request id sent with every call.
///
/// The client performs exactly one HTTP exchange per call and matches the
/// response to its continuations by the exchange itself, so the id is a
/// fixed sentinel rather than a correlation key.
pub const REQUEST_ID: u64 = 42;

/// JSON-RPC protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request envelope. Outbound only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    pub id: u64,
    #[serde(rename = "jsonrpc")]
    pub protocol_version: String,
    pub method: String,
    pub params: Value,
}

impl JsonRpcRequest {
    /// Build a request carrying the fixed [`REQUEST_ID`].
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            id: REQUEST_ID,
            protocol_version: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }
}

/// The `error` member of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorShape {
    /// JSON-RPC error code, when the server sends one. Not part of the
    /// normalized message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

impl ErrorShape {
    pub fn new(message: impl Into<String>, data: Value) -> Self {
        Self {
            code: None,
            message: message.into(),
            data,
        }
    }

    /// Render as `"<message>: <data>"`.
    ///
    /// String data is inserted as-is; anything else as compact JSON.
    pub fn normalized(&self) -> String {
        template!("{0}: {1}", self.message, display_value(&self.data))
    }

    /// Extract the error shape from a parsed failure body, if it carries one.
    pub fn from_failure_body(body: &Value) -> Option<Self> {
        Self::deserialize(body.get("error")?).ok()
    }
}

/// Render a JSON value for human-facing text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A parsed JSON-RPC response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    Success { result: Value },
    ProtocolError(ErrorShape),
}

/// Why a response body could not be read as an envelope.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("malformed error object: {0}")]
    MalformedError(String),
}

impl ResponseEnvelope {
    /// Classify a response body.
    ///
    /// A non-null `error` member makes the response a protocol error;
    /// otherwise it is a success and a missing `result` reads as `null`.
    pub fn parse(body: &str) -> Result<Self, EnvelopeError> {
        Self::from_value(&read_body(body)?)
    }

    /// Classify an already parsed body. Only the `result` or `error`
    /// member is copied out.
    pub fn from_value(value: &Value) -> Result<Self, EnvelopeError> {
        let object = value.as_object().ok_or(EnvelopeError::NotAnObject)?;

        match object.get("error") {
            Some(Value::Null) | None => Ok(ResponseEnvelope::Success {
                result: object.get("result").cloned().unwrap_or(Value::Null),
            }),
            Some(error) => ErrorShape::deserialize(error)
                .map(ResponseEnvelope::ProtocolError)
                .map_err(|e| EnvelopeError::MalformedError(e.to_string())),
        }
    }

    /// Whether the body explicitly carried a `result` member.
    pub fn has_result(value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|object| object.contains_key("result"))
    }
}

/// Parse a response body into JSON once; everything else works on the value.
pub(crate) fn read_body(body: &str) -> Result<Value, EnvelopeError> {
    serde_json::from_str(body).map_err(|e| EnvelopeError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_serializes_wire_shape() {
        let request = JsonRpcRequest::new("stats_current", json!([1, "two"]));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 42,
                "jsonrpc": "2.0",
                "method": "stats_current",
                "params": [1, "two"]
            })
        );
    }

    #[test]
    fn test_request_id_is_fixed() {
        let a = JsonRpcRequest::new("a", json!(null));
        let b = JsonRpcRequest::new("b", json!({"k": 1}));
        assert_eq!(a.id, REQUEST_ID);
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_parse_success() {
        let envelope = ResponseEnvelope::parse(r#"{"id":42,"jsonrpc":"2.0","result":7}"#).unwrap();
        assert_eq!(envelope, ResponseEnvelope::Success { result: json!(7) });
    }

    #[test]
    fn test_parse_success_without_result_is_null() {
        let envelope = ResponseEnvelope::parse(r#"{"id":42}"#).unwrap();
        assert_eq!(envelope, ResponseEnvelope::Success { result: Value::Null });
    }

    #[test]
    fn test_parse_null_error_is_success() {
        let envelope = ResponseEnvelope::parse(r#"{"error":null,"result":"ok"}"#).unwrap();
        assert_eq!(envelope, ResponseEnvelope::Success { result: json!("ok") });
    }

    #[test]
    fn test_parse_protocol_error() {
        let envelope = ResponseEnvelope::parse(
            r#"{"error":{"code":-32602,"message":"bad","data":"input"}}"#,
        )
        .unwrap();

        match envelope {
            ResponseEnvelope::ProtocolError(error) => {
                assert_eq!(error.code, Some(-32602));
                assert_eq!(error.normalized(), "bad: input");
            }
            other => panic!("Expected ProtocolError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_bodies() {
        assert!(matches!(
            ResponseEnvelope::parse("<html>"),
            Err(EnvelopeError::InvalidJson(_))
        ));
        assert_eq!(ResponseEnvelope::parse("[1,2]"), Err(EnvelopeError::NotAnObject));
        assert!(matches!(
            ResponseEnvelope::parse(r#"{"error":"boom"}"#),
            Err(EnvelopeError::MalformedError(_))
        ));
    }

    #[test]
    fn test_normalized_renders_non_string_data_as_json() {
        assert_eq!(ErrorShape::new("down", json!(503)).normalized(), "down: 503");
        assert_eq!(ErrorShape::new("gone", Value::Null).normalized(), "gone: null");
        assert_eq!(
            ErrorShape::new("invalid", json!({"field": "email"})).normalized(),
            r#"invalid: {"field":"email"}"#
        );
    }

    #[test]
    fn test_error_shape_from_failure_body() {
        let shape =
            ErrorShape::from_failure_body(&json!({"error": {"message": "down", "data": "503"}}));
        assert_eq!(shape, Some(ErrorShape::new("down", json!("503"))));

        assert_eq!(ErrorShape::from_failure_body(&json!("Bad Gateway")), None);
        assert_eq!(ErrorShape::from_failure_body(&json!({"detail": "nope"})), None);
        assert_eq!(ErrorShape::from_failure_body(&json!({"error": {"data": 1}})), None);
    }

    #[test]
    fn test_has_result() {
        assert!(ResponseEnvelope::has_result(&json!({"result": null})));
        assert!(!ResponseEnvelope::has_result(&json!({"id": 42})));
        assert!(!ResponseEnvelope::has_result(&json!([1])));
    }

    #[test]
    fn test_from_value_borrows_parsed_body() {
        let body = read_body(r#"{"id":42,"result":{"hashrate":7},"error":null}"#).unwrap();

        let envelope = ResponseEnvelope::from_value(&body).unwrap();
        assert_eq!(envelope, ResponseEnvelope::Success { result: json!({"hashrate": 7}) });
        assert!(ResponseEnvelope::has_result(&body));
        assert_eq!(ErrorShape::from_failure_body(&body), None);
        assert_eq!(body["result"], json!({"hashrate": 7}));
    }

    #[test]
    fn test_read_body_rejects_invalid_json() {
        assert!(matches!(read_body("<html>"), Err(EnvelopeError::InvalidJson(_))));
        assert_eq!(read_body("[]"), Ok(json!([])));
    }
}
