//! zilpool JSON-RPC client library.
//!
//! - `format` - positional template formatting used for error text
//! - `rpc` - JSON-RPC 2.0 client over HTTP POST with continuation dispatch
//! - `status` - status sinks that continuations report into
//! - `config` - client configuration (file + environment)
//!
//! ```ignore
//! use std::sync::{Arc, Mutex};
//! use zilpool_rpc::config::ClientConfig;
//! use zilpool_rpc::rpc::{HttpTransport, RpcClient};
//! use zilpool_rpc::status::{report_error, report_success, MessageBoard};
//!
//! let config = ClientConfig::load()?;
//! let client = RpcClient::new(HttpTransport::new(&config)?);
//! let board = Arc::new(Mutex::new(MessageBoard::new()));
//!
//! client.call(
//!     "/api",
//!     "stats_current",
//!     serde_json::json!([]),
//!     report_success(Arc::clone(&board), "stats", |v| v.to_string()),
//!     report_error(Arc::clone(&board), "stats"),
//! );
//! ```

pub mod config;
pub mod format;
pub mod rpc;
pub mod status;
