use serde_json::json;

use super::*;
use crate::gateway::Method;
use crate::gateway::test_helpers::{relative_target, test_gateway};
use crate::models::BatchCreateItem;

fn row(id: &str, label: &str, order: Option<i64>) -> DictData {
    DictData {
        id: id.to_owned(),
        type_id: "t1".to_owned(),
        label: label.to_owned(),
        value: label.to_lowercase(),
        order,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

#[test]
fn sort_options_treats_missing_order_as_zero() {
    let options = sort_options(vec![row("1", "C", Some(2)), row("2", "A", None), row("3", "B", Some(-1)), row("4", "D", Some(0))]);
    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, ["B", "A", "D", "C"]);
    assert_eq!(options[1].order, None);
}

#[tokio::test]
async fn options_with_empty_code_makes_no_call() {
    let (gateway, transport) = test_gateway();
    let options = DictionaryService::new(gateway).options("").await.unwrap();
    assert!(options.is_empty());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn options_fetch_by_code_and_sort() {
    let (gateway, transport) = test_gateway();
    transport.push_ok(json!([
        { "id": "1", "typeId": "t1", "label": "High", "value": "high", "order": 3 },
        { "id": "2", "typeId": "t1", "label": "Low", "value": "low", "order": 1 }
    ]));

    let options = DictionaryService::new(gateway).options("priority").await.unwrap();

    assert_eq!(relative_target(&transport.last_request()), "/dictionary/data/code/priority");
    assert_eq!(options[0], DictOption { label: "Low".to_owned(), value: "low".to_owned(), order: Some(1) });
}

#[tokio::test]
async fn type_endpoints() {
    let (gateway, transport) = test_gateway();
    let service = DictionaryService::new(gateway);
    let dict_type = json!({ "id": "t1", "code": "user_status", "name": "User status" });

    transport.push_ok(json!([dict_type.clone()]));
    assert_eq!(service.list_types().await.unwrap()[0].code, "user_status");

    transport.push_ok(dict_type.clone());
    service.type_by_code("user_status").await.unwrap();

    transport.push_ok(dict_type.clone());
    let create = CreateDictTypeParams { code: "user_status".to_owned(), name: "User status".to_owned(), description: None };
    service.create_type(&create).await.unwrap();

    transport.push_ok(dict_type);
    let update = UpdateDictTypeParams { name: Some("Status".to_owned()), ..UpdateDictTypeParams::default() };
    service.update_type("t1", &update).await.unwrap();

    service.delete_type("t1").await.unwrap();

    let requests = transport.requests();
    let targets: Vec<_> = requests.iter().map(|r| (r.method.clone(), relative_target(r))).collect();
    assert_eq!(
        targets,
        vec![
            (Method::GET, "/dictionary/type".to_owned()),
            (Method::GET, "/dictionary/type/code/user_status".to_owned()),
            (Method::POST, "/dictionary/type".to_owned()),
            (Method::PATCH, "/dictionary/type/t1".to_owned()),
            (Method::DELETE, "/dictionary/type/t1".to_owned()),
        ]
    );
    assert_eq!(requests[2].json_body(), Some(json!({ "code": "user_status", "name": "User status" })));
    assert_eq!(requests[3].json_body(), Some(json!({ "name": "Status" })));
}

#[tokio::test]
async fn data_endpoints_and_batch() {
    let (gateway, transport) = test_gateway();
    let service = DictionaryService::new(gateway);
    let data = json!({ "id": "d1", "typeId": "t1", "label": "Active", "value": "1", "order": 1 });

    transport.push_ok(data.clone());
    let create = CreateDictDataParams { type_id: "t1".to_owned(), label: "Active".to_owned(), value: "1".to_owned(), order: Some(1) };
    service.create_data(&create).await.unwrap();

    transport.push_ok(data);
    service.update_data("d1", &UpdateDictDataParams { order: Some(5), ..UpdateDictDataParams::default() }).await.unwrap();
    service.delete_data("d1").await.unwrap();

    let batch = BatchCreateParams {
        code: "color".to_owned(),
        name: "Color".to_owned(),
        items: vec![BatchCreateItem { label: "Red".to_owned(), value: "red".to_owned() }],
    };
    service.batch_create(&batch).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].json_body(), Some(json!({ "typeId": "t1", "label": "Active", "value": "1", "order": 1 })));
    assert_eq!(relative_target(&requests[1]), "/dictionary/data/d1");
    assert_eq!(requests[1].json_body(), Some(json!({ "order": 5 })));
    assert_eq!(requests[2].method, Method::DELETE);
    assert_eq!(relative_target(&requests[3]), "/dictionary/batch");
    assert_eq!(
        requests[3].json_body(),
        Some(json!({ "code": "color", "name": "Color", "items": [{ "label": "Red", "value": "red" }] }))
    );
}
