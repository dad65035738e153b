//! Request gateway: the single path every backend call takes.
//!
//! DESIGN
//! ======
//! One `send` resolves the URL, injects `Content-Type` and the bearer token,
//! hands the request to a [`Transport`], and unwraps the `{code, message,
//! data}` envelope. Callers always receive `data`, never the envelope.
//!
//! ERROR HANDLING
//! ==============
//! Envelope code 401 (or a bare HTTP 401) expires the stored session and
//! returns [`GatewayError::Unauthorized`]; reacting to that (sending the user
//! to login) is the caller's job. Every other failure leaves the session
//! alone. Nothing is retried.

mod transport;
mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::session::Session;
pub use transport::{ReqwestTransport, Transport};
pub use types::{GatewayError, HttpRequest, HttpResponse, Method, RequestOptions};
use types::Envelope;

const DEFAULT_FAILURE_MESSAGE: &str = "request failed";
const DEFAULT_UNAUTHORIZED_MESSAGE: &str = "unauthorized";
const CONTENT_TYPE: &str = "Content-Type";
const AUTHORIZATION: &str = "Authorization";

// =============================================================================
// GATEWAY
// =============================================================================

#[derive(Clone)]
pub struct Gateway {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
}

impl Gateway {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, transport, session }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request and return the envelope's `data` as `T`.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`]. On [`GatewayError::Unauthorized`] the session has
    /// already been expired.
    pub async fn send<T: DeserializeOwned>(&self, options: RequestOptions) -> Result<T, GatewayError> {
        let request = self.build_request(options)?;
        let method = request.method.clone();
        let url = request.url.clone();
        tracing::debug!(%method, %url, "gateway request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(%method, %url, error = %e, "request error");
                return Err(e);
            }
        };

        let data = match parse_envelope(&response) {
            Ok(data) => data,
            Err(GatewayError::Unauthorized { message }) => {
                self.session.expire(&message);
                return Err(GatewayError::Unauthorized { message });
            }
            Err(e) => {
                match &e {
                    GatewayError::Business { code, message } => {
                        tracing::warn!(%method, %url, code = *code, message = %message, "request rejected");
                    }
                    other => tracing::error!(%method, %url, status = response.status, error = %other, "request error"),
                }
                return Err(e);
            }
        };

        serde_json::from_value(data).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.send(RequestOptions::new(Method::GET, path)).await
    }

    /// GET with query parameters serialized from `query`.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let options = RequestOptions::new(Method::GET, path).with_query(to_json(query)?);
        self.send(options).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(RequestOptions::new(Method::POST, path).with_body(to_json(body)?)).await
    }

    /// POST without a body.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.send(RequestOptions::new(Method::POST, path)).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(RequestOptions::new(Method::PUT, path).with_body(to_json(body)?)).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(RequestOptions::new(Method::PATCH, path).with_body(to_json(body)?)).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.send(RequestOptions::new(Method::DELETE, path)).await
    }

    fn build_request(&self, options: RequestOptions) -> Result<HttpRequest, GatewayError> {
        let url = build_url(&self.base_url, &options.path, options.query.as_ref())?;

        let mut headers = vec![(CONTENT_TYPE.to_owned(), "application/json".to_owned())];
        if let Some(token) = self.session.token() {
            headers.push((AUTHORIZATION.to_owned(), format!("Bearer {token}")));
        }
        for (name, value) in options.headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
            headers.push((name, value));
        }

        let body = options.body.map(|body| body.to_string());
        Ok(HttpRequest { method: options.method, url, headers, body })
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

// =============================================================================
// URL + QUERY
// =============================================================================

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, GatewayError> {
    serde_json::to_value(value).map_err(|e| GatewayError::Encode(e.to_string()))
}

/// Join `base` and `path`, then append `query` as a query string.
///
/// `query` must be a JSON object. Null fields are skipped, arrays repeat the
/// key, nested objects are sent as JSON text.
pub(crate) fn build_url(base: &str, path: &str, query: Option<&Value>) -> Result<Url, GatewayError> {
    let joined = if path.starts_with('/') { format!("{base}{path}") } else { format!("{base}/{path}") };
    let mut url = Url::parse(&joined).map_err(|e| GatewayError::InvalidUrl(format!("{joined}: {e}")))?;

    let pairs = match query {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(map)) => {
            let mut pairs = Vec::with_capacity(map.len());
            for (key, value) in map {
                push_query_pair(&mut pairs, key, value);
            }
            pairs
        }
        Some(_) => return Err(GatewayError::Encode("query parameters must be an object".to_owned())),
    };
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url)
}

fn push_query_pair(pairs: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => pairs.push((key.to_owned(), s.clone())),
        Value::Array(items) => {
            for item in items {
                push_query_pair(pairs, key, item);
            }
        }
        other => pairs.push((key.to_owned(), other.to_string())),
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Unwrap an envelope into its `data`, with no side effects.
pub(crate) fn parse_envelope(response: &HttpResponse) -> Result<Value, GatewayError> {
    let envelope = match serde_json::from_str::<Envelope>(&response.body) {
        Ok(envelope) => envelope,
        Err(e) => {
            if response.status == 401 {
                return Err(GatewayError::Unauthorized { message: DEFAULT_UNAUTHORIZED_MESSAGE.to_owned() });
            }
            if !(200..300).contains(&response.status) {
                return Err(GatewayError::Status { status: response.status, body: response.body.clone() });
            }
            return Err(GatewayError::Malformed(e.to_string()));
        }
    };

    match envelope.code {
        0 if (200..300).contains(&response.status) => Ok(envelope.data),
        // A success code cannot override a failed HTTP status.
        0 if response.status == 401 => {
            Err(GatewayError::Unauthorized { message: envelope.message_or(DEFAULT_UNAUTHORIZED_MESSAGE) })
        }
        0 => Err(GatewayError::Status { status: response.status, body: response.body.clone() }),
        401 => Err(GatewayError::Unauthorized { message: envelope.message_or(DEFAULT_UNAUTHORIZED_MESSAGE) }),
        code => Err(GatewayError::Business { code, message: envelope.message_or(DEFAULT_FAILURE_MESSAGE) }),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
