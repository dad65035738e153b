//! Recording transport for gateway, service and screen tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use super::{Gateway, GatewayError, HttpRequest, HttpResponse, Transport};
use crate::config::ConsoleConfig;
use crate::session::Session;
use crate::state::AppContext;
use crate::storage::Storage;

pub(crate) const TEST_BASE_URL: &str = "http://backend.test/api";

/// Replays scripted responses in order and records every request it sees.
/// With nothing scripted it answers `{code: 0, data: null}`.
#[derive(Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, GatewayError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn push_envelope(&self, code: i64, message: &str, data: Value) {
        let body = json!({ "code": code, "message": message, "data": data }).to_string();
        self.push_raw(200, &body);
    }

    pub(crate) fn push_ok(&self, data: Value) {
        self.push_envelope(0, "ok", data);
    }

    pub(crate) fn push_raw(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse { status, body: body.to_owned() }));
    }

    pub(crate) fn push_error(&self, error: GatewayError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request was sent")
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GatewayError> {
        self.requests.lock().unwrap().push(request);
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(HttpResponse { status: 200, body: json!({ "code": 0, "message": "ok", "data": null }).to_string() })
        })
    }
}

/// Gateway over a fresh in-memory session and a [`MockTransport`].
pub(crate) fn test_gateway() -> (Gateway, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::default());
    let session = Arc::new(Session::new(Storage::in_memory("admin_")));
    let gateway = Gateway::new(TEST_BASE_URL, transport.clone(), session);
    (gateway, transport)
}

/// App context over in-memory storage and a [`MockTransport`].
pub(crate) fn test_context() -> (Arc<AppContext>, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::default());
    let config = ConsoleConfig::default().with_base_url(TEST_BASE_URL).unwrap();
    let context = AppContext::with_parts(config, Storage::in_memory("admin_"), transport.clone());
    (Arc::new(context), transport)
}

/// Path plus query of a recorded request, relative to [`TEST_BASE_URL`].
pub(crate) fn relative_target(request: &HttpRequest) -> String {
    let full = request.url.as_str();
    full.strip_prefix(TEST_BASE_URL).unwrap_or(full).to_owned()
}

/// Path of a recorded request relative to [`TEST_BASE_URL`], without the query.
pub(crate) fn relative_path(request: &HttpRequest) -> String {
    request.url.path().strip_prefix("/api").unwrap_or(request.url.path()).to_owned()
}

/// Decoded query parameters of a recorded request, independent of order.
pub(crate) fn query_map(request: &HttpRequest) -> BTreeMap<String, String> {
    request.url.query_pairs().into_owned().collect()
}
