//! Outbound HTTP: one GET per request, JSON or a raised failure.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use steamgate_core::GatewayConfig;

/// Which upstream host a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Authenticated Web API
    Api,
    /// Public storefront
    Store,
}

/// One parameter-mapped GET request
///
/// The credential is never part of `query`; it is attached at send time
/// when `authenticated` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Target host
    pub endpoint: Endpoint,
    /// Path below the host's base URL
    pub path: &'static str,
    /// Query parameters, in transmission order
    pub query: Vec<(String, String)>,
    /// Whether to attach the process-wide credential
    pub authenticated: bool,
    /// Identifier the request is about, e.g. `appid 570`
    pub subject: Option<String>,
}

impl UpstreamRequest {
    /// Authenticated Web API request
    #[must_use]
    pub fn api(path: &'static str) -> Self {
        Self {
            endpoint: Endpoint::Api,
            path,
            query: Vec::new(),
            authenticated: true,
            subject: None,
        }
    }

    /// Unauthenticated storefront request
    #[must_use]
    pub fn store(path: &'static str) -> Self {
        Self {
            endpoint: Endpoint::Store,
            path,
            query: Vec::new(),
            authenticated: false,
            subject: None,
        }
    }

    /// Append a parameter
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Append a parameter only when a value is present
    #[must_use]
    pub fn param_opt<T: Display>(self, name: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    /// Serialize a list as `name[0]=…`, `name[1]=…`
    #[must_use]
    pub fn indexed<T: Display>(mut self, name: &str, values: &[T]) -> Self {
        for (i, value) in values.iter().enumerate() {
            self.query.push((format!("{name}[{i}]"), value.to_string()));
        }
        self
    }

    /// Set the identifier this request is about
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Value of a query parameter
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Failure raised while talking to upstream
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UpstreamError {
    /// No response received
    #[error("no response from {target}: {reason}")]
    Transport {
        /// Request path, without query string
        target: String,
        /// Transport error chain
        reason: String,
        /// Identifier the request was about
        subject: Option<String>,
    },

    /// Non-success HTTP status
    #[error("HTTP {status} from {target}")]
    Status {
        /// Request path, without query string
        target: String,
        /// HTTP status code
        status: u16,
        /// Response body, JSON when it parses, otherwise text
        body: Option<Value>,
        /// Identifier the request was about
        subject: Option<String>,
    },

    /// Success status but not the expected structure
    #[error("unexpected response from {target}: {reason}")]
    Shape {
        /// Request path, without query string
        target: String,
        /// What was wrong with the body
        reason: String,
        /// Body as received, when there was one
        payload: Option<Value>,
        /// Identifier the request was about
        subject: Option<String>,
    },
}

impl UpstreamError {
    /// Shape failure for a request
    #[must_use]
    pub fn shape(request: &UpstreamRequest, reason: impl Into<String>, payload: Option<Value>) -> Self {
        Self::Shape {
            target: request.path.to_string(),
            reason: reason.into(),
            payload,
            subject: request.subject.clone(),
        }
    }

    /// Identifier the failed request was about
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Transport { subject, .. }
            | Self::Status { subject, .. }
            | Self::Shape { subject, .. } => subject.as_deref(),
        }
    }

    /// Path of the failed request
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Transport { target, .. }
            | Self::Status { target, .. }
            | Self::Shape { target, .. } => target,
        }
    }
}

/// Issues GET requests and returns parsed JSON bodies
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Perform one request
    async fn get_json(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError>;
}

/// `reqwest`-backed upstream
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
    config: Arc<GatewayConfig>,
}

impl HttpUpstream {
    /// Create a client honoring the configured timeout and User-Agent
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialized
    pub fn new(config: Arc<GatewayConfig>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()?;
        Ok(Self { client, config })
    }

    fn base_url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Api => self.config.api_base_url(),
            Endpoint::Store => self.config.store_base_url(),
        }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get_json(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url(request.endpoint), request.path);
        tracing::debug!(
            target_path = request.path,
            endpoint = ?request.endpoint,
            params = request.query.len(),
            "upstream request"
        );

        let mut builder = self.client.get(&url).query(&request.query);
        if request.authenticated {
            builder = builder.query(&[("key", self.config.api_key())]);
        }

        let transport = |err: reqwest::Error| UpstreamError::Transport {
            target: request.path.to_string(),
            reason: describe_transport_error(err),
            subject: request.subject.clone(),
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await;

        if !status.is_success() {
            tracing::debug!(target_path = request.path, status = status.as_u16(), "upstream rejected request");
            // a status arrived; an unreadable body only means there is no body to report
            return Err(UpstreamError::Status {
                target: request.path.to_string(),
                status: status.as_u16(),
                body: body.ok().and_then(|bytes| body_value(&bytes)),
                subject: request.subject.clone(),
            });
        }
        let bytes = body.map_err(transport)?;

        serde_json::from_slice(&bytes).map_err(|err| {
            UpstreamError::shape(
                request,
                format!("response body is not JSON: {err}"),
                body_value(&bytes),
            )
        })
    }
}

/// Error text without the request URL, which carries the credential
fn describe_transport_error(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut reason = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}

/// Body as JSON when it parses, otherwise as text; `None` when empty
fn body_value(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes)
        .ok()
        .or_else(|| Some(Value::String(String::from_utf8_lossy(bytes).into_owned())))
}
