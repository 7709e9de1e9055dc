/// Route tests for moves, boxes and items
mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../migrations")]
async fn test_create_move(pool: PgPool) {
    let ctx = TestContext::new(pool).await;

    let (status, body) = ctx
        .post(
            "/moves",
            json!({ "location": "New York", "date": "2024-06-01", "username": "testuser" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["move"]["id"].as_i64().unwrap();
    assert_eq!(
        body,
        json!({
            "move": {
                "id": id,
                "location": "New York",
                "date": "2024-06-01",
                "username": "testuser",
                "boxes": []
            }
        })
    );
}

#[sqlx::test(migrations = "../migrations")]
async fn test_create_move_rejects_duplicate_date(pool: PgPool) {
    let ctx = TestContext::new(pool).await;
    ctx.create_move("2024-06-01").await;

    let (status, body) = ctx
        .post(
            "/moves",
            json!({ "location": "New York", "date": "2024-06-01", "username": "testuser" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": { "message": "Duplicate move: 2024-06-01", "status": 400 } })
    );
}

#[sqlx::test(migrations = "../migrations")]
async fn test_create_move_validation(pool: PgPool) {
    let ctx = TestContext::new(pool).await;

    let (status, body) = ctx
        .post("/moves", json!({ "location": "", "date": "2024-06-01", "username": "testuser" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], json!(["location must not be empty"]));

    let (status, _) = ctx
        .post("/moves", json!({ "location": "Boston", "date": "tomorrow", "username": "testuser" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../migrations")]
async fn test_get_move_embeds_boxes(pool: PgPool) {
    let ctx = TestContext::new(pool).await;
    let move_id = ctx.create_move("2024-06-01").await;
    let first = ctx.create_box(move_id, "Kitchen").await;
    let second = ctx.create_box(move_id, "Office").await;

    let (status, body) = ctx.get(&format!("/moves/{}", move_id)).await;
    assert_eq!(status, StatusCode::OK);

    let boxes = body["move"]["boxes"].as_array().unwrap();
    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes[0]["id"], first);
    assert_eq!(boxes[0]["room"], "Kitchen");
    assert_eq!(boxes[1]["id"], second);
    assert_eq!(boxes[1]["move"], move_id);

    let (status, body) = ctx.get(&format!("/moves/{}/boxes", move_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["boxes"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../migrations")]
async fn test_list_moves_with_filter(pool: PgPool) {
    let ctx = TestContext::new(pool).await;
    ctx.create_move("2024-06-01").await;
    let (status, _) = ctx
        .post(
            "/moves",
            json!({ "location": "Boston", "date": "2024-07-01", "username": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = ctx.get("/moves").await;
    assert_eq!(body["moves"].as_array().unwrap().len(), 2);

    let (status, body) = ctx.get("/moves?location=Boston").await;
    assert_eq!(status, StatusCode::OK);
    let moves = body["moves"].as_array().unwrap();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0]["username"], "admin");

    let (_, body) = ctx.get("/moves?username=testuser&date=2024-06-01").await;
    assert_eq!(body["moves"][0]["location"], "New York");
}

#[sqlx::test(migrations = "../migrations")]
async fn test_update_move(pool: PgPool) {
    let ctx = TestContext::new(pool).await;
    let move_id = ctx.create_move("2024-06-01").await;

    let (status, body) = ctx
        .patch(&format!("/moves/{}", move_id), json!({ "location": "Chicago" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["move"]["location"], "Chicago");
    assert_eq!(body["move"]["date"], "2024-06-01");
    assert_eq!(body["move"]["username"], "testuser");

    let (status, body) = ctx.patch(&format!("/moves/{}", move_id), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No data");

    let (status, _) = ctx.patch("/moves/99999", json!({ "location": "Chicago" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../migrations")]
async fn test_delete_move_cascades(pool: PgPool) {
    let ctx = TestContext::new(pool).await;
    let move_id = ctx.create_move("2024-06-01").await;
    let box_id = ctx.create_box(move_id, "Kitchen").await;
    ctx.create_item(box_id, "Lamp").await;

    let (status, body) = ctx.delete(&format!("/moves/{}", move_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "deleted": move_id }));

    let (status, _) = ctx.get(&format!("/moves/{}", move_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = ctx.get("/boxes").await;
    assert_eq!(body["boxes"], json!([]));
    let (_, body) = ctx.get("/items").await;
    assert_eq!(body["items"], json!([]));
}

#[sqlx::test(migrations = "../migrations")]
async fn test_box_crud(pool: PgPool) {
    let ctx = TestContext::new(pool).await;
    let move_id = ctx.create_move("2024-06-01").await;

    let (status, body) = ctx
        .post(
            "/boxes",
            json!({ "name": "Books", "room": "Office", "location": "Garage", "move": move_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let box_id = body["box"]["id"].as_i64().unwrap();
    assert_eq!(body["box"]["description"], serde_json::Value::Null);

    let (status, body) = ctx.get(&format!("/boxes/{}", box_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["box"]["name"], "Books");
    assert_eq!(body["box"]["move"], move_id);

    let (status, body) = ctx
        .patch(&format!("/boxes/{}", box_id), json!({ "room": "Den" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["box"]["room"], "Den");
    assert_eq!(body["box"]["name"], "Books");

    let (_, body) = ctx.get("/boxes?room=Den").await;
    assert_eq!(body["boxes"].as_array().unwrap().len(), 1);
    let (_, body) = ctx.get("/boxes?room=Kitchen").await;
    assert_eq!(body["boxes"], json!([]));
}

#[sqlx::test(migrations = "../migrations")]
async fn test_create_box_validation(pool: PgPool) {
    let ctx = TestContext::new(pool).await;

    let (status, body) = ctx.post("/boxes", json!({ "room": "Kitchen" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"][0]
        .as_str()
        .unwrap()
        .contains("move"));

    let (status, _) = ctx.post("/boxes", json!({ "room": "Kitchen", "move": "one" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../migrations")]
async fn test_delete_unknown_box(pool: PgPool) {
    let ctx = TestContext::new(pool).await;

    let (status, body) = ctx.delete("/boxes/99999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "error": { "message": "No box: 99999", "status": 404 } })
    );
}

#[sqlx::test(migrations = "../migrations")]
async fn test_delete_box_removes_items(pool: PgPool) {
    let ctx = TestContext::new(pool).await;
    let move_id = ctx.create_move("2024-06-01").await;
    let box_id = ctx.create_box(move_id, "Kitchen").await;
    let other_box = ctx.create_box(move_id, "Office").await;
    ctx.create_item(box_id, "Lamp").await;
    let kept = ctx.create_item(other_box, "Stapler").await;

    let (status, body) = ctx.delete(&format!("/boxes/{}", box_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], box_id);

    let (_, body) = ctx.get("/items").await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], kept);
}

#[sqlx::test(migrations = "../migrations")]
async fn test_item_crud(pool: PgPool) {
    let ctx = TestContext::new(pool).await;
    let move_id = ctx.create_move("2024-06-01").await;
    let box_id = ctx.create_box(move_id, "Kitchen").await;

    let (status, body) = ctx
        .post(
            "/items",
            json!({ "description": "Lamp", "image": "lamp.jpg", "box": box_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = body["item"]["id"].as_i64().unwrap();
    assert_eq!(body["item"]["box"], box_id);

    let (status, body) = ctx
        .patch(&format!("/items/{}", item_id), json!({ "description": "Floor lamp" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["description"], "Floor lamp");
    assert_eq!(body["item"]["image"], "lamp.jpg");

    let (_, body) = ctx.get(&format!("/boxes/{}/items", box_id)).await;
    assert_eq!(body["items"][0]["id"], item_id);

    let (_, body) = ctx.get("/items?description=Floor%20lamp").await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, body) = ctx.delete(&format!("/items/{}", item_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "deleted": item_id }));

    let (status, body) = ctx.get(&format!("/items/{}", item_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], format!("No item: {}", item_id));
}

#[sqlx::test(migrations = "../migrations")]
async fn test_patch_null_clears_optional_fields(pool: PgPool) {
    let ctx = TestContext::new(pool).await;
    let move_id = ctx.create_move("2024-06-01").await;
    let box_id = ctx.create_box(move_id, "Kitchen").await;

    let (status, body) = ctx
        .post(
            "/items",
            json!({ "description": "Lamp", "image": "lamp.jpg", "box": box_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = body["item"]["id"].as_i64().unwrap();

    let (status, body) = ctx
        .patch(&format!("/items/{}", item_id), json!({ "image": null }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["image"], serde_json::Value::Null);
    assert_eq!(body["item"]["description"], "Lamp");

    let (status, body) = ctx
        .patch(&format!("/boxes/{}", box_id), json!({ "name": "Pots", "location": "Garage" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["box"]["name"], "Pots");

    let (status, body) = ctx
        .patch(&format!("/boxes/{}", box_id), json!({ "name": null }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["box"]["name"], serde_json::Value::Null);
    assert_eq!(body["box"]["location"], "Garage");
    assert_eq!(body["box"]["room"], "Kitchen");
}

#[sqlx::test(migrations = "../migrations")]
async fn test_non_numeric_id_is_bad_request(pool: PgPool) {
    let ctx = TestContext::new(pool).await;

    let (status, body) = ctx.get("/items/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], 400);
}

#[sqlx::test(migrations = "../migrations")]
async fn test_health(pool: PgPool) {
    let ctx = TestContext::new(pool).await;

    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
