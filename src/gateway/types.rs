//! Gateway wire types and errors.

use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub use reqwest::Method;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by a gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Base URL and path did not form a valid URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// Query parameters or body could not be encoded.
    #[error("request encode failed: {0}")]
    Encode(String),

    /// The connection failed or timed out.
    #[error("transport failed: {0}")]
    Transport(String),

    /// Non-success HTTP status without an envelope body.
    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    /// The body was not JSON, or not an envelope.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Envelope code 401. The stored session has already been cleared.
    #[error("{message}")]
    Unauthorized { message: String },

    /// Any other non-zero envelope code.
    #[error("{message}")]
    Business { code: i64, message: String },

    /// `data` did not match the type the caller asked for.
    #[error("response data decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl GatewayError {
    /// Stable machine-readable code for logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "E_INVALID_URL",
            Self::Encode(_) => "E_ENCODE",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Status { .. } => "E_HTTP_STATUS",
            Self::Malformed(_) => "E_MALFORMED",
            Self::Unauthorized { .. } => "E_UNAUTHORIZED",
            Self::Business { .. } => "E_BUSINESS",
            Self::Decode(_) => "E_DECODE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// `{code, message, data}` wrapper every backend response carries.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub(crate) fn message_or(self, default: &str) -> String {
        self.message.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| default.to_owned())
    }
}

// =============================================================================
// TRANSPORT TYPES
// =============================================================================

/// A fully-resolved HTTP request handed to a [`super::Transport`].
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn json_body(&self) -> Option<Value> {
        self.body.as_deref().and_then(|raw| serde_json::from_str(raw).ok())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// One gateway call before URL resolution and header injection.
#[derive(Clone, Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub path: String,
    pub query: Option<Value>,
    pub body: Option<Value>,
    /// Applied last; replaces defaults with the same name.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: None, body: None, headers: Vec::new() }
    }

    #[must_use]
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
