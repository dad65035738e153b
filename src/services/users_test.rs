use serde_json::json;

use super::*;
use crate::gateway::Method;
use crate::gateway::test_helpers::{query_map, relative_path, relative_target, test_gateway};
use crate::models::Role;

fn user_json(id: &str, email: &str, role: &str) -> serde_json::Value {
    json!({ "id": id, "email": email, "role": role, "createdAt": "2024-01-01", "updatedAt": "2024-01-02" })
}

#[tokio::test]
async fn list_sends_paging_and_filters() {
    let (gateway, transport) = test_gateway();
    transport.push_ok(json!({
        "total": 11, "page": 2, "pageSize": 10,
        "data": [user_json("u11", "k@x.io", "developer")]
    }));

    let query = UserQuery { page: 2, role: Some(Role::Developer), ..UserQuery::default() };
    let page = UserService::new(gateway).list(&query).await.unwrap();

    assert_eq!(page.total, 11);
    assert_eq!(page.data[0].role, Role::Developer);
    let request = transport.last_request();
    assert_eq!(relative_path(&request), "/user/query");
    let query = query_map(&request);
    assert_eq!(query.len(), 3);
    assert_eq!(query["page"], "2");
    assert_eq!(query["pageSize"], "10");
    assert_eq!(query["role"], "developer");
}

#[tokio::test]
async fn create_posts_full_form() {
    let (gateway, transport) = test_gateway();
    transport.push_ok(user_json("u2", "new@x.io", "user"));

    let params = CreateUserParams { email: "new@x.io".to_owned(), password: "hunter22".to_owned(), role: Role::User };
    let user = UserService::new(gateway).create(&params).await.unwrap();

    assert_eq!(user.id, "u2");
    let request = transport.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.json_body(), Some(json!({ "email": "new@x.io", "password": "hunter22", "role": "user" })));
}

#[tokio::test]
async fn update_omits_blank_password() {
    let (gateway, transport) = test_gateway();
    transport.push_ok(user_json("u2", "new@x.io", "admin"));

    let params = UpdateUserParams { role: Some(Role::Admin), password: None };
    UserService::new(gateway).update("u2", &params).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(relative_target(&request), "/user/u2");
    assert_eq!(request.json_body(), Some(json!({ "role": "admin" })));
}

#[tokio::test]
async fn delete_and_batch_delete_paths() {
    let (gateway, transport) = test_gateway();
    let service = UserService::new(gateway);

    service.delete("u3").await.unwrap();
    service.batch_delete(&["u4".to_owned(), "u5".to_owned()]).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::DELETE);
    assert_eq!(relative_target(&requests[0]), "/user/u3");
    assert_eq!(relative_target(&requests[1]), "/user/batch-delete");
    assert_eq!(requests[1].json_body(), Some(json!({ "ids": ["u4", "u5"] })));
}
