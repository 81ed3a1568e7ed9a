//! JSON-RPC client with continuation-style dispatch.
//!
//! Every call ends in exactly one outcome. [`RpcClient::request`] returns it
//! as a `Result`; [`RpcClient::call`] spawns the request and routes the
//! outcome to one of two `FnOnce` continuations, with errors flattened to
//! their normalized `"message: data"` string.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::rpc::envelope::{read_body, ErrorShape, JsonRpcRequest, ResponseEnvelope};
use crate::rpc::transport::{HttpReply, HttpTransport, Transport, TransportError};
use crate::template;

/// Outcome of a failed call.
///
/// `Display` yields the normalized error string. Protocol errors and
/// structured transport errors render identically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpcError {
    /// The server answered with an in-band `error` member.
    #[error("{}", .0.normalized())]
    Protocol(ErrorShape),

    /// HTTP failure whose body carried an `{error: {...}}` shape.
    #[error("{}", .error.normalized())]
    Transport { status: u16, error: ErrorShape },

    /// Network failure, or a failure body without a usable error shape.
    #[error("{}", labelled("Transport error", .reason))]
    Unstructured { status: Option<u16>, reason: String },

    /// The request never left the client.
    #[error("{}", labelled("Invalid request", .0))]
    InvalidRequest(String),
}

/// Reason given to `on_error` when `call` runs outside a tokio runtime.
const NO_RUNTIME: &str = "no tokio runtime";

/// Errors without an error shape still read as `"<label>: <detail>"`.
fn labelled(label: &str, detail: &str) -> String {
    template!("{0}: {1}", label, detail)
}

impl RpcError {
    /// HTTP status associated with the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RpcError::Transport { status, .. } => Some(*status),
            RpcError::Unstructured { status, .. } => *status,
            RpcError::Protocol(_) | RpcError::InvalidRequest(_) => None,
        }
    }
}

impl From<TransportError> for RpcError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::InvalidEndpoint { .. } => RpcError::InvalidRequest(err.to_string()),
            TransportError::Network(_) | TransportError::Timeout => RpcError::Unstructured {
                status: None,
                reason: err.to_string(),
            },
        }
    }
}

/// JSON-RPC client.
///
/// Cheap to clone; clones share the underlying transport.
///
/// # Example
///
/// ```ignore
/// use zilpool_rpc::rpc::RpcClient;
/// use serde_json::json;
///
/// let client = RpcClient::new(transport);
/// client.call(
///     "/api",
///     "stats_current",
///     json!([]),
///     |result| println!("{result}"),
///     |error| eprintln!("{error}"),
/// );
/// ```
pub struct RpcClient<T = HttpTransport> {
    transport: Arc<T>,
}

impl<T> Clone for RpcClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport + 'static> RpcClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one request and classify the reply.
    pub async fn request(
        &self,
        endpoint: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, RpcError> {
        let request = JsonRpcRequest::new(method, params);

        match self.transport.post_json(endpoint, &request).await {
            Ok(reply) => {
                debug!(status = reply.status, body = %reply.body, "JSON-RPC response");
                classify_reply(reply)
            }
            Err(err) => {
                warn!(%endpoint, method, error = %err, "JSON-RPC transport failure");
                Err(err.into())
            }
        }
    }

    /// Route the outcome of [`request`](Self::request) to one continuation.
    pub async fn dispatch<S, E>(
        &self,
        endpoint: &str,
        method: &str,
        params: Value,
        on_success: S,
        on_error: E,
    ) where
        S: FnOnce(Value),
        E: FnOnce(String),
    {
        match self.request(endpoint, method, params).await {
            Ok(result) => on_success(result),
            Err(err) => on_error(err.to_string()),
        }
    }

    /// Fire-and-forget call on the current tokio runtime.
    ///
    /// Outside a runtime nothing is sent and `on_error` fires immediately
    /// with an `"Invalid request: ..."` message.
    pub fn call<S, E>(
        &self,
        endpoint: impl Into<String>,
        method: impl Into<String>,
        params: Value,
        on_success: S,
        on_error: E,
    ) where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(String) + Send + 'static,
    {
        let endpoint = endpoint.into();
        let method = method.into();

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                warn!(%endpoint, %method, error = %err, "JSON-RPC call outside a runtime");
                on_error(RpcError::InvalidRequest(NO_RUNTIME.to_string()).to_string());
                return;
            }
        };

        let client = self.clone();
        runtime.spawn(async move {
            client
                .dispatch(&endpoint, &method, params, on_success, on_error)
                .await;
        });
    }
}

/// Classify an HTTP reply.
///
/// The in-band `error` member decides the outcome whenever the body is an
/// envelope. A non-2xx reply only succeeds if it explicitly carries
/// `result`; otherwise it is a transport failure whose body may or may not
/// hold an error shape.
///
/// The body is parsed once; every later check borrows that value.
fn classify_reply(reply: HttpReply) -> Result<Value, RpcError> {
    let body = match read_body(&reply.body) {
        Ok(body) => body,
        Err(parse_err) => return Err(transport_failure(&reply, None, Some(parse_err.to_string()))),
    };

    match ResponseEnvelope::from_value(&body) {
        Ok(ResponseEnvelope::ProtocolError(error)) if reply.is_success() => {
            Err(RpcError::Protocol(error))
        }
        Ok(ResponseEnvelope::ProtocolError(error)) => Err(RpcError::Transport {
            status: reply.status,
            error,
        }),
        Ok(ResponseEnvelope::Success { result })
            if reply.is_success() || ResponseEnvelope::has_result(&body) =>
        {
            Ok(result)
        }
        Ok(ResponseEnvelope::Success { .. }) => Err(transport_failure(&reply, Some(&body), None)),
        Err(parse_err) => Err(transport_failure(
            &reply,
            Some(&body),
            Some(parse_err.to_string()),
        )),
    }
}

fn transport_failure(
    reply: &HttpReply,
    body: Option<&Value>,
    parse_error: Option<String>,
) -> RpcError {
    if let Some(error) = body.and_then(ErrorShape::from_failure_body) {
        return RpcError::Transport {
            status: reply.status,
            error,
        };
    }

    let reason = match parse_error {
        Some(detail) if reply.is_success() => detail,
        _ => format!("HTTP {}", reply.status),
    };

    RpcError::Unstructured {
        status: Some(reply.status),
        reason,
    }
}
