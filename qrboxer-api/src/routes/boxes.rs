/// Box endpoints
///
/// # Endpoints
///
/// - `POST /boxes` - Create a box for a move
/// - `GET /boxes` - List boxes, filtered by `location`, `room` or `move`
/// - `GET /boxes/:id` - One box
/// - `PATCH /boxes/:id` - Partial update
/// - `DELETE /boxes/:id` - Delete a box and its items
/// - `GET /boxes/:id/items` - Items packed in a box
use crate::{
    app::AppState,
    error::ApiResult,
    extract::{Path, Query, ValidatedJson},
    routes::Deleted,
};
use axum::{extract::State, http::StatusCode, Json};
use qrboxer_shared::db::sql::deserialize_nullable;
use qrboxer_shared::models::{
    item::Item,
    move_box::{BoxFilter, CreateBox, MoveBox, UpdateBox},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct NewBoxRequest {
    pub name: Option<String>,

    pub description: Option<String>,

    pub location: Option<String>,

    #[validate(length(min = 1, message = "room must not be empty"))]
    pub room: String,

    #[serde(rename = "move")]
    pub move_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBoxRequest {
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub name: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub location: Option<Option<String>>,

    #[validate(length(min = 1, message = "room must not be empty"))]
    pub room: Option<String>,

    #[serde(rename = "move")]
    pub move_id: Option<i32>,
}

impl From<NewBoxRequest> for CreateBox {
    fn from(req: NewBoxRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            location: req.location,
            room: req.room,
            move_id: req.move_id,
        }
    }
}

impl From<UpdateBoxRequest> for UpdateBox {
    fn from(req: UpdateBoxRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            location: req.location,
            room: req.room,
            move_id: req.move_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BoxResponse {
    pub r#box: MoveBox,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BoxesResponse {
    pub boxes: Vec<MoveBox>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BoxItemsResponse {
    pub items: Vec<Item>,
}

/// Creates a box
///
/// # Endpoint
///
/// ```text
/// POST /boxes
/// Content-Type: application/json
///
/// { "name": "Books", "room": "Office", "move": 1 }
/// ```
pub async fn create_box(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<NewBoxRequest>,
) -> ApiResult<(StatusCode, Json<BoxResponse>)> {
    let created = MoveBox::create(&state.db, req.into()).await?;

    info!(box_id = created.id, move_id = created.move_id, "Box created");

    Ok((StatusCode::CREATED, Json(BoxResponse { r#box: created })))
}

pub async fn list_boxes(
    State(state): State<AppState>,
    Query(filter): Query<BoxFilter>,
) -> ApiResult<Json<BoxesResponse>> {
    let boxes = MoveBox::find_all(&state.db, filter).await?;
    Ok(Json(BoxesResponse { boxes }))
}

pub async fn get_box(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<BoxResponse>> {
    let found = MoveBox::get(&state.db, id).await?;
    Ok(Json(BoxResponse { r#box: found }))
}

pub async fn update_box(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateBoxRequest>,
) -> ApiResult<Json<BoxResponse>> {
    let updated = MoveBox::update(&state.db, id, req.into()).await?;

    info!(box_id = id, "Box updated");

    Ok(Json(BoxResponse { r#box: updated }))
}

pub async fn delete_box(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Deleted<i32>>> {
    MoveBox::remove(&state.db, id).await?;

    info!(box_id = id, "Box deleted");

    Ok(Json(Deleted { deleted: id }))
}

/// Lists the items of one box; an unknown box yields an empty list
pub async fn list_box_items(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<BoxItemsResponse>> {
    let items = Item::find_by_box(&state.db, id).await?;
    Ok(Json(BoxItemsResponse { items }))
}
