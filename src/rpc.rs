//! JSON-RPC 2.0 client over HTTP POST.
//!
//! One call is one request and one response. The outcome is routed to
//! exactly one of two continuations; every failure, in-band or from the
//! transport, reaches the error continuation as a single normalized string:
//!
//! ```text
//! {"error": {"message": "bad", "data": "input"}}   ->  "bad: input"
//! HTTP 503 {"error": {"message": "down", "data": "503"}}  ->  "down: 503"
//! HTTP 502 <html>...</html>                       ->  "Transport error: HTTP 502"
//! ```
//!
//! # Wire format
//!
//! ```text
//! POST /api HTTP/1.1
//! Content-Type: application/json
//!
//! {"id":42,"jsonrpc":"2.0","method":"stats_current","params":[]}
//! ```

mod client;
mod envelope;
mod transport;

pub use client::{RpcClient, RpcError};
pub use envelope::{
    display_value, EnvelopeError, ErrorShape, JsonRpcRequest, ResponseEnvelope, JSONRPC_VERSION,
    REQUEST_ID,
};
pub use transport::{HttpReply, HttpTransport, Transport, TransportError};
