use super::test_helpers::{MockTransport, relative_target, test_gateway};
use super::*;
use crate::models::{AuthSession, SessionUser};
use crate::session::SessionEvent;
use serde_json::json;

fn login(gateway: &Gateway) {
    gateway.session().establish(AuthSession {
        token: "tok-123".to_owned(),
        user: Some(SessionUser { id: "u1".into(), email: "root@example.com".into(), role: "admin".into() }),
    });
}

// =============================================================================
// build_url
// =============================================================================

#[test]
fn build_url_joins_base_and_path() {
    let url = build_url("http://h.test/api", "/user/info", None).unwrap();
    assert_eq!(url.as_str(), "http://h.test/api/user/info");

    let url = build_url("http://h.test/api", "menu", None).unwrap();
    assert_eq!(url.as_str(), "http://h.test/api/menu");
}

#[test]
fn build_url_serializes_query_and_skips_nulls() {
    let query = json!({ "page": 2, "pageSize": 20, "email": "a b@c.d", "role": null });
    let url = build_url("http://h.test/api", "/user/query", Some(&query)).unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    assert!(pairs.contains(&("page".to_owned(), "2".to_owned())));
    assert!(pairs.contains(&("pageSize".to_owned(), "20".to_owned())));
    assert!(pairs.contains(&("email".to_owned(), "a b@c.d".to_owned())));
    assert!(!pairs.iter().any(|(k, _)| k == "role"));
}

#[test]
fn build_url_repeats_array_values() {
    let query = json!({ "ids": ["a", "b"] });
    let url = build_url("http://h.test/api", "/x", Some(&query)).unwrap();
    assert_eq!(url.query(), Some("ids=a&ids=b"));
}

#[test]
fn build_url_without_params_has_no_question_mark() {
    let url = build_url("http://h.test/api", "/market", Some(&json!({ "search": null }))).unwrap();
    assert_eq!(url.as_str(), "http://h.test/api/market");
}

#[test]
fn build_url_rejects_non_object_query() {
    let err = build_url("http://h.test/api", "/x", Some(&json!([1, 2]))).unwrap_err();
    assert!(matches!(err, GatewayError::Encode(_)));
}

// =============================================================================
// parse_envelope
// =============================================================================

fn response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse { status, body: body.to_string() }
}

#[test]
fn parse_envelope_returns_data_only() {
    let data = parse_envelope(&response(200, json!({ "code": 0, "message": "ok", "data": { "id": "7" } }))).unwrap();
    assert_eq!(data, json!({ "id": "7" }));
}

#[test]
fn parse_envelope_missing_data_is_null() {
    let data = parse_envelope(&response(200, json!({ "code": 0 }))).unwrap();
    assert_eq!(data, serde_json::Value::Null);
}

#[test]
fn parse_envelope_business_error_carries_message() {
    let err = parse_envelope(&response(200, json!({ "code": 40001, "message": "name taken", "data": null }))).unwrap_err();
    assert!(matches!(&err, GatewayError::Business { code: 40001, .. }));
    assert_eq!(err.to_string(), "name taken");
}

#[test]
fn parse_envelope_business_error_defaults_message() {
    let err = parse_envelope(&response(200, json!({ "code": 500 }))).unwrap_err();
    assert_eq!(err.to_string(), "request failed");

    let err = parse_envelope(&response(200, json!({ "code": 500, "message": "  " }))).unwrap_err();
    assert_eq!(err.to_string(), "request failed");
}

#[test]
fn parse_envelope_code_401_is_unauthorized() {
    let err = parse_envelope(&response(200, json!({ "code": 401, "message": "token expired" }))).unwrap_err();
    assert!(err.is_session_expired());
    assert_eq!(err.to_string(), "token expired");
}

#[test]
fn parse_envelope_bare_http_401_is_unauthorized() {
    let err = parse_envelope(&HttpResponse { status: 401, body: "Unauthorized".to_owned() }).unwrap_err();
    assert!(err.is_session_expired());
}

#[test]
fn parse_envelope_non_json_error_status() {
    let err = parse_envelope(&HttpResponse { status: 502, body: "<html>bad gateway</html>".to_owned() }).unwrap_err();
    assert!(matches!(err, GatewayError::Status { status: 502, .. }));
    assert_eq!(err.to_string(), "HTTP error! status: 502");
}

#[test]
fn parse_envelope_success_code_on_error_status_is_status_error() {
    let err = parse_envelope(&response(500, json!({ "code": 0, "message": "ok", "data": { "id": "7" } }))).unwrap_err();
    assert!(matches!(err, GatewayError::Status { status: 500, .. }));

    let err = parse_envelope(&response(401, json!({ "code": 0, "data": null }))).unwrap_err();
    assert!(err.is_session_expired());
}

#[test]
fn parse_envelope_business_code_on_error_status_keeps_message() {
    let err = parse_envelope(&response(400, json!({ "code": 40001, "message": "name taken" }))).unwrap_err();
    assert!(matches!(err, GatewayError::Business { code: 40001, .. }));
    assert_eq!(err.to_string(), "name taken");
}

#[test]
fn parse_envelope_raw_resource_is_malformed() {
    let err = parse_envelope(&response(200, json!({ "id": "1", "name": "raw" }))).unwrap_err();
    assert!(matches!(err, GatewayError::Malformed(_)));
    assert_eq!(err.error_code(), "E_MALFORMED");
}

// =============================================================================
// Gateway::send
// =============================================================================

#[tokio::test]
async fn send_returns_unwrapped_data() {
    let (gateway, transport) = test_gateway();
    transport.push_ok(json!({ "id": "u1", "email": "a@b.co", "role": "admin" }));

    let user: SessionUser = gateway.get("/user/info").await.unwrap();
    assert_eq!(user.email, "a@b.co");
}

#[tokio::test]
async fn send_always_sets_json_content_type() {
    let (gateway, transport) = test_gateway();
    let _: () = gateway.post_empty("/auth/logout").await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.body, None);
}

#[tokio::test]
async fn authorization_header_follows_session() {
    let (gateway, transport) = test_gateway();

    let _: () = gateway.get("/menu").await.unwrap();
    assert_eq!(transport.last_request().header("Authorization"), None);

    login(&gateway);
    let _: () = gateway.get("/menu").await.unwrap();
    assert_eq!(transport.last_request().header("Authorization"), Some("Bearer tok-123"));

    gateway.session().end();
    let _: () = gateway.get("/menu").await.unwrap();
    assert_eq!(transport.last_request().header("Authorization"), None);
}

#[tokio::test]
async fn header_overrides_replace_defaults() {
    let (gateway, transport) = test_gateway();
    let options = RequestOptions::new(Method::GET, "/x").with_header("content-type", "text/plain").with_header("X-Trace", "1");
    let _: () = gateway.send(options).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.header("Content-Type"), Some("text/plain"));
    assert_eq!(request.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("content-type")).count(), 1);
    assert_eq!(request.header("x-trace"), Some("1"));
}

#[tokio::test]
async fn body_and_query_are_serialized() {
    let (gateway, transport) = test_gateway();
    let _: () = gateway.patch("/menu/c1", &json!({ "name": "Tools" })).await.unwrap();
    let _: () = gateway.get_with("/market", &json!({ "category": "games" })).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::PATCH);
    assert_eq!(requests[0].json_body(), Some(json!({ "name": "Tools" })));
    assert_eq!(relative_target(&requests[1]), "/market?category=games");
}

#[tokio::test]
async fn code_401_clears_session_and_signals_expiry_for_any_verb() {
    for method in [Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
        let (gateway, transport) = test_gateway();
        login(&gateway);
        let mut events = gateway.session().subscribe();
        transport.push_envelope(401, "login required", json!(null));

        let err = gateway.send::<serde_json::Value>(RequestOptions::new(method.clone(), "/anything")).await.unwrap_err();

        assert!(err.is_session_expired(), "{method} should expire the session");
        assert_eq!(err.to_string(), "login required");
        assert!(!gateway.session().is_authenticated());
        assert_eq!(gateway.session().user(), None);
        assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired { message: "login required".to_owned() });
    }
}

#[tokio::test]
async fn business_error_keeps_session() {
    let (gateway, transport) = test_gateway();
    login(&gateway);
    transport.push_envelope(1001, "duplicate code", json!(null));

    let err = gateway.post::<serde_json::Value, _>("/dictionary/type", &json!({})).await.unwrap_err();
    assert_eq!(err.to_string(), "duplicate code");
    assert!(gateway.session().is_authenticated());
}

#[tokio::test]
async fn transport_error_propagates_without_side_effects() {
    let (gateway, transport) = test_gateway();
    login(&gateway);
    transport.push_error(GatewayError::Transport("connection refused".to_owned()));

    let err = gateway.get::<serde_json::Value>("/user/info").await.unwrap_err();
    assert_eq!(err.error_code(), "E_TRANSPORT");
    assert!(gateway.session().is_authenticated());
}

#[tokio::test]
async fn mismatched_data_is_decode_error() {
    let (gateway, transport) = test_gateway();
    transport.push_ok(json!("not a user"));
    let err = gateway.get::<SessionUser>("/user/info").await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn each_call_is_sent_exactly_once() {
    let (gateway, transport) = test_gateway();
    transport.push_error(GatewayError::Transport("reset".to_owned()));
    let _ = gateway.get::<serde_json::Value>("/menu").await;
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn mock_transport_defaults_to_empty_success() {
    let transport = MockTransport::default();
    assert_eq!(transport.request_count(), 0);
}
