/// Item endpoints
///
/// # Endpoints
///
/// - `POST /items` - Create an item in a box
/// - `GET /items` - List items, filtered by `description` or `box`
/// - `GET /items/:id` - One item
/// - `PATCH /items/:id` - Partial update
/// - `DELETE /items/:id` - Delete an item
use crate::{
    app::AppState,
    error::ApiResult,
    extract::{Path, Query, ValidatedJson},
    routes::Deleted,
};
use axum::{extract::State, http::StatusCode, Json};
use qrboxer_shared::db::sql::deserialize_nullable;
use qrboxer_shared::models::item::{CreateItem, Item, ItemFilter, UpdateItem};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct NewItemRequest {
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,

    pub image: Option<String>,

    #[serde(rename = "box")]
    pub box_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub image: Option<Option<String>>,

    #[serde(rename = "box")]
    pub box_id: Option<i32>,
}

impl From<NewItemRequest> for CreateItem {
    fn from(req: NewItemRequest) -> Self {
        Self {
            description: req.description,
            image: req.image,
            box_id: req.box_id,
        }
    }
}

impl From<UpdateItemRequest> for UpdateItem {
    fn from(req: UpdateItemRequest) -> Self {
        Self {
            description: req.description,
            image: req.image,
            box_id: req.box_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub item: Item,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
}

pub async fn create_item(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<NewItemRequest>,
) -> ApiResult<(StatusCode, Json<ItemResponse>)> {
    let item = Item::create(&state.db, req.into()).await?;

    info!(item_id = item.id, box_id = item.box_id, "Item created");

    Ok((StatusCode::CREATED, Json(ItemResponse { item })))
}

pub async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> ApiResult<Json<ItemsResponse>> {
    let items = Item::find_all(&state.db, filter).await?;
    Ok(Json(ItemsResponse { items }))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ItemResponse>> {
    let item = Item::get(&state.db, id).await?;
    Ok(Json(ItemResponse { item }))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateItemRequest>,
) -> ApiResult<Json<ItemResponse>> {
    let item = Item::update(&state.db, id, req.into()).await?;

    info!(item_id = id, "Item updated");

    Ok(Json(ItemResponse { item }))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Deleted<i32>>> {
    Item::remove(&state.db, id).await?;

    info!(item_id = id, "Item deleted");

    Ok(Json(Deleted { deleted: id }))
}
