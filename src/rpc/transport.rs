//! HTTP transport for JSON-RPC requests.
//!
//! The [`Transport`] trait is the seam between the client and the network:
//! it posts one JSON body and reports either the HTTP reply (any status) or
//! a network-level failure that produced no reply at all.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::rpc::envelope::JsonRpcRequest;

/// Raw HTTP reply: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures that carry no HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint could not be turned into an absolute URL.
    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Connection refused, DNS failure, TLS failure, reset...
    #[error("{0}")]
    Network(String),

    /// The transport's own timeout elapsed.
    #[error("request timed out")]
    Timeout,
}

/// Something that can POST a JSON-RPC request and hand back the reply.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        endpoint: &str,
        request: &JsonRpcRequest,
    ) -> Result<HttpReply, TransportError>;
}

/// [`Transport`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Option<Url>,
}

impl HttpTransport {
    /// Build a transport from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config.base_url.clone()))
    }

    /// Use an existing client.
    pub fn with_client(client: Client, base_url: Option<Url>) -> Self {
        Self { client, base_url }
    }

    /// Resolve `endpoint` to an absolute URL.
    ///
    /// Absolute endpoints are used as given; relative ones are joined onto
    /// the base URL.
    pub fn resolve(&self, endpoint: &str) -> Result<Url, TransportError> {
        let invalid = |reason: String| TransportError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        match Url::parse(endpoint) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base.join(endpoint).map_err(|e| invalid(e.to_string())),
                None => Err(invalid("relative endpoint and no base URL configured".to_string())),
            },
            Err(e) => Err(invalid(e.to_string())),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        endpoint: &str,
        request: &JsonRpcRequest,
    ) -> Result<HttpReply, TransportError> {
        let url = self.resolve(endpoint)?;
        debug!(%url, method = %request.method, "POST");

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;

        Ok(HttpReply { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(error_chain(&err))
    }
}

/// Render an error followed by its `source()` chain, joined by `": "`.
///
/// reqwest's own message stops at "error sending request"; the cause
/// (refused connection, DNS failure, TLS handshake) lives further down.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !rendered.ends_with(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        source = cause.source();
    }
    rendered
}
