//! HTTP transport seam under the gateway.

use std::time::Duration;

use super::types::{GatewayError, HttpRequest, HttpResponse};
use crate::config::RequestTimeouts;

/// Sends one resolved request. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] when no HTTP response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GatewayError>;
}

pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns [`GatewayError::HttpClientBuild`] if the client cannot be constructed.
    pub fn new(timeouts: RequestTimeouts) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| GatewayError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GatewayError> {
        let mut builder = self.http.request(request.method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
