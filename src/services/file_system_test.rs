use serde_json::json;

use super::*;
use crate::gateway::Method;
use crate::gateway::test_helpers::{relative_target, test_gateway};
use crate::models::{DesktopLayout, ItemType, LayoutSlot, Position};

#[tokio::test]
async fn list_decodes_mixed_items() {
    let (gateway, transport) = test_gateway();
    transport.push_ok(json!([
        { "id": "f1", "parentId": "root", "name": "Docs", "type": "folder", "position": { "x": 0, "y": 0 } },
        { "id": "w1", "parentId": "f1", "name": "Search", "type": "web", "url": "https://example.com" }
    ]));

    let items = FileSystemService::new(gateway).list().await.unwrap();

    assert_eq!(relative_target(&transport.last_request()), "/desktop/items");
    assert_eq!(items.len(), 2);
    assert!(items[0].is_on_desktop());
    assert_eq!(items[1].item_type, ItemType::Web);
    assert_eq!(items[1].position, None);
}

#[tokio::test]
async fn create_sends_defaults_for_new_item() {
    let (gateway, transport) = test_gateway();
    transport.push_ok(json!({ "id": "f2", "parentId": "root", "name": "Untitled", "type": "folder" }));

    let created = FileSystemService::new(gateway).create(&NewFileSystemItem::default()).await.unwrap();

    assert_eq!(created.id, "f2");
    let request = transport.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(
        request.json_body(),
        Some(json!({ "parentId": "root", "name": "Untitled", "type": "folder", "position": { "x": 0.0, "y": 0.0 } }))
    );
}

#[tokio::test]
async fn update_sends_only_changed_fields() {
    let (gateway, transport) = test_gateway();
    transport.push_ok(json!({ "id": "f1", "parentId": "root", "name": "Docs", "type": "folder", "position": { "x": 2, "y": 3 } }));

    let patch = UpdateFileSystemItem { position: Some(Position { x: 2.0, y: 3.0 }), ..UpdateFileSystemItem::default() };
    FileSystemService::new(gateway).update("f1", &patch).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(relative_target(&request), "/desktop/items/f1");
    assert_eq!(request.json_body(), Some(json!({ "position": { "x": 2.0, "y": 3.0 } })));
}

#[tokio::test]
async fn get_and_delete_by_id() {
    let (gateway, transport) = test_gateway();
    let service = FileSystemService::new(gateway);
    transport.push_ok(json!({ "id": "a1", "parentId": "root", "name": "Calc", "type": "app" }));

    assert_eq!(service.get("a1").await.unwrap().name, "Calc");
    service.delete("a1").await.unwrap();

    let requests = transport.requests();
    assert_eq!((requests[0].method.clone(), relative_target(&requests[0])), (Method::GET, "/desktop/items/a1".to_owned()));
    assert_eq!((requests[1].method.clone(), relative_target(&requests[1])), (Method::DELETE, "/desktop/items/a1".to_owned()));
}

#[tokio::test]
async fn get_layout_reads_slots_and_keeps_unknown_fields() {
    let (gateway, transport) = test_gateway();
    transport.push_ok(json!({
        "items": [{ "id": "w1", "position": { "x": 2, "y": 1 }, "size": "2x2" }],
        "wallpaper": "dunes.png"
    }));

    let layout = FileSystemService::new(gateway).get_layout().await.unwrap();

    assert_eq!(relative_target(&transport.last_request()), "/desktop/layout");
    assert_eq!(transport.last_request().method, Method::GET);
    assert_eq!(layout.slot("w1").map(|s| s.position), Some(Position { x: 2.0, y: 1.0 }));
    assert_eq!(layout.extra["wallpaper"], "dunes.png");
}

#[tokio::test]
async fn missing_layout_reads_as_empty() {
    let (gateway, transport) = test_gateway();
    transport.push_ok(json!(null));

    let layout = FileSystemService::new(gateway).get_layout().await.unwrap();

    assert_eq!(layout, DesktopLayout::default());
}

#[tokio::test]
async fn save_layout_posts_whole_layout() {
    let (gateway, transport) = test_gateway();
    let mut layout = DesktopLayout::default();
    layout.items.push(LayoutSlot { id: "f1".to_owned(), position: Position { x: 0.0, y: 3.0 }, size: None });
    layout.extra.insert("wallpaper".to_owned(), json!("dunes.png"));
    transport.push_ok(serde_json::to_value(&layout).unwrap());

    let saved = FileSystemService::new(gateway).save_layout(&layout).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(relative_target(&request), "/desktop/layout");
    assert_eq!(
        request.json_body(),
        Some(json!({ "items": [{ "id": "f1", "position": { "x": 0.0, "y": 3.0 } }], "wallpaper": "dunes.png" }))
    );
    assert_eq!(saved, layout);
}
