use serde_json::json;

use super::*;
use crate::gateway::Method;
use crate::gateway::test_helpers::{query_map, relative_path, relative_target, test_context};
use crate::screens::test_support::ScriptedConfirm;

fn page_json(total: u64, page: u32, ids: &[&str]) -> serde_json::Value {
    let data: Vec<_> = ids.iter().map(|id| json!({ "id": id, "email": format!("{id}@x.io"), "role": "user" })).collect();
    json!({ "total": total, "page": page, "pageSize": 10, "data": data })
}

#[tokio::test]
async fn load_stores_page() {
    let (context, transport) = test_context();
    let mut screen = UsersScreen::new(&context);
    transport.push_ok(page_json(2, 1, &["a", "b"]));

    let page = screen.load().await.unwrap();
    assert_eq!(page.data.len(), 2);
    assert!(!screen.is_loading());
    assert_eq!(relative_path(&transport.last_request()), "/user/query");
}

#[tokio::test]
async fn search_resets_to_first_page() {
    let (context, transport) = test_context();
    let mut screen = UsersScreen::new(&context);
    transport.push_ok(page_json(30, 3, &["c"]));
    screen.go_to_page(3, 10).await.unwrap();
    assert_eq!(screen.query().page, 3);

    transport.push_ok(page_json(1, 1, &["admin"]));
    screen.search(Some("admin".to_owned()), Some(Role::Admin)).await.unwrap();

    let query = query_map(&transport.last_request());
    assert_eq!(query["page"], "1");
    assert_eq!(query["email"], "admin");
    assert_eq!(query["role"], "admin");
}

#[tokio::test]
async fn failed_reload_keeps_previous_page() {
    let (context, transport) = test_context();
    let mut screen = UsersScreen::new(&context);
    transport.push_ok(page_json(1, 1, &["a"]));
    screen.load().await.unwrap();

    transport.push_envelope(500, "db down", json!(null));
    let err = screen.load().await.unwrap_err();
    assert_eq!(err.to_string(), "db down");
    assert_eq!(screen.page().data[0].id, "a");
    assert!(!screen.is_loading());
}

#[tokio::test]
async fn invalid_form_makes_no_call() {
    let (context, transport) = test_context();
    let mut screen = UsersScreen::new(&context);
    let form = UserForm { email: "not-an-email".to_owned(), password: "123".to_owned(), role: Role::User };

    let err = screen.submit(None, &form).await.unwrap_err();
    assert!(matches!(err, ScreenError::Validation(_)));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn submit_create_then_reload() {
    let (context, transport) = test_context();
    let mut screen = UsersScreen::new(&context);
    transport.push_ok(json!({ "id": "n1", "email": "new@x.io", "role": "user" }));
    transport.push_ok(page_json(1, 1, &["n1"]));

    let form = UserForm { email: "new@x.io".to_owned(), password: "secret".to_owned(), role: Role::User };
    let user = screen.submit(None, &form).await.unwrap();

    assert_eq!(user.id, "n1");
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(relative_path(&requests[1]), "/user/query");
    assert_eq!(screen.page().data[0].id, "n1");
}

#[tokio::test]
async fn submit_update_patches_role_only() {
    let (context, transport) = test_context();
    let mut screen = UsersScreen::new(&context);
    transport.push_ok(json!({ "id": "u1", "email": "u1@x.io", "role": "developer" }));
    transport.push_ok(page_json(1, 1, &["u1"]));

    let form = UserForm { email: "u1@x.io".to_owned(), password: String::new(), role: Role::Developer };
    screen.submit(Some("u1"), &form).await.unwrap();

    let requests = transport.requests();
    let request = &requests[0];
    assert_eq!(relative_target(request), "/user/u1");
    assert_eq!(request.json_body(), Some(json!({ "role": "developer" })));
}

#[tokio::test]
async fn declined_delete_makes_no_call() {
    let (context, transport) = test_context();
    let mut screen = UsersScreen::new(&context);
    let confirm = ScriptedConfirm::no();

    assert_eq!(screen.delete("u1", &confirm).await.unwrap(), DeleteOutcome::Cancelled);
    assert_eq!(transport.request_count(), 0);
    assert_eq!(confirm.prompts().len(), 1);
}

#[tokio::test]
async fn batch_delete_requires_selection() {
    let (context, transport) = test_context();
    let mut screen = UsersScreen::new(&context);

    let err = screen.batch_delete(&ScriptedConfirm::yes()).await.unwrap_err();
    assert!(matches!(err, ScreenError::NothingSelected));
    assert_eq!(transport.request_count(), 0);

    screen.select(["u1".to_owned(), "u2".to_owned()]);
    transport.push_ok(json!(null));
    transport.push_ok(page_json(0, 1, &[]));
    assert_eq!(screen.batch_delete(&ScriptedConfirm::yes()).await.unwrap(), DeleteOutcome::Deleted);

    assert!(screen.selected().is_empty());
    assert_eq!(transport.requests()[0].json_body(), Some(json!({ "ids": ["u1", "u2"] })));
}

#[tokio::test]
async fn expired_session_surfaces_through_screen_error() {
    let (context, transport) = test_context();
    let mut screen = UsersScreen::new(&context);
    transport.push_envelope(401, "login again", json!(null));

    let err = screen.load().await.unwrap_err();
    assert!(err.is_session_expired());
}

#[tokio::test]
async fn accepted_changes_survive_failed_reload() {
    let (context, transport) = test_context();
    let mut screen = UsersScreen::new(&context);
    transport.push_ok(page_json(1, 1, &["a"]));
    screen.load().await.unwrap();

    transport.push_ok(json!({ "id": "n1", "email": "new@x.io", "role": "user" }));
    transport.push_raw(503, "unavailable");
    let form = UserForm { email: "new@x.io".to_owned(), password: "secret".to_owned(), role: Role::User };
    assert_eq!(screen.submit(None, &form).await.unwrap().id, "n1");
    assert_eq!(screen.page().data[0].id, "a");

    transport.push_ok(json!(null));
    transport.push_raw(503, "unavailable");
    assert_eq!(screen.delete("a", &ScriptedConfirm::yes()).await.unwrap(), DeleteOutcome::Deleted);
    assert!(!screen.is_loading());
}

#[tokio::test]
async fn unsupported_page_size_is_replaced_by_default() {
    let (context, transport) = test_context();
    let mut screen = UsersScreen::new(&context);
    transport.push_ok(page_json(0, 2, &[]));

    screen.go_to_page(2, 0).await.unwrap();

    assert_eq!(screen.query().page_size, 10);
    assert_eq!(query_map(&transport.last_request())["pageSize"], "10");
}
