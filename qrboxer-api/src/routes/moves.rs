/// Move endpoints
///
/// # Endpoints
///
/// - `POST /moves` - Create a move
/// - `GET /moves` - List moves, filtered by `username`, `location` or `date`
/// - `GET /moves/:id` - Move with its boxes
/// - `PATCH /moves/:id` - Partial update
/// - `DELETE /moves/:id` - Delete a move with its boxes and items
/// - `GET /moves/:id/boxes` - Boxes packed for a move
use crate::{
    app::AppState,
    error::ApiResult,
    extract::{Path, Query, ValidatedJson},
    routes::Deleted,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use qrboxer_shared::models::{
    move_box::MoveBox,
    moves::{CreateMove, Move, MoveFilter, UpdateMove},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct NewMoveRequest {
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: String,

    /// `YYYY-MM-DD`
    pub date: NaiveDate,

    #[validate(length(min = 1, max = 25, message = "username must be 1 to 25 characters"))]
    pub username: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMoveRequest {
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: Option<String>,

    pub date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 25, message = "username must be 1 to 25 characters"))]
    pub username: Option<String>,
}

impl From<NewMoveRequest> for CreateMove {
    fn from(req: NewMoveRequest) -> Self {
        Self {
            location: req.location,
            date: req.date,
            username: req.username,
        }
    }
}

impl From<UpdateMoveRequest> for UpdateMove {
    fn from(req: UpdateMoveRequest) -> Self {
        Self {
            location: req.location,
            date: req.date,
            username: req.username,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveResponse {
    pub r#move: Move,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MovesResponse {
    pub moves: Vec<Move>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveBoxesResponse {
    pub boxes: Vec<MoveBox>,
}

/// Creates a move
///
/// # Endpoint
///
/// ```text
/// POST /moves
/// Content-Type: application/json
///
/// { "location": "New York", "date": "2024-06-01", "username": "testuser" }
/// ```
///
/// # Response (201)
///
/// ```json
/// { "move": { "id": 1, "location": "New York", "date": "2024-06-01", "username": "testuser", "boxes": [] } }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or `"Duplicate move: <date>"`
pub async fn create_move(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<NewMoveRequest>,
) -> ApiResult<(StatusCode, Json<MoveResponse>)> {
    let created = Move::create(&state.db, req.into()).await?;

    info!(move_id = created.id, username = %created.username, "Move created");

    Ok((StatusCode::CREATED, Json(MoveResponse { r#move: created })))
}

pub async fn list_moves(
    State(state): State<AppState>,
    Query(filter): Query<MoveFilter>,
) -> ApiResult<Json<MovesResponse>> {
    let moves = Move::find_all(&state.db, filter).await?;
    Ok(Json(MovesResponse { moves }))
}

pub async fn get_move(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MoveResponse>> {
    let found = Move::get(&state.db, id).await?;
    Ok(Json(MoveResponse { r#move: found }))
}

pub async fn update_move(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateMoveRequest>,
) -> ApiResult<Json<MoveResponse>> {
    let updated = Move::update(&state.db, id, req.into()).await?;

    info!(move_id = id, "Move updated");

    Ok(Json(MoveResponse { r#move: updated }))
}

pub async fn delete_move(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Deleted<i32>>> {
    Move::remove(&state.db, id).await?;

    info!(move_id = id, "Move deleted");

    Ok(Json(Deleted { deleted: id }))
}

/// Lists the boxes of one move; an unknown move yields an empty list
pub async fn list_move_boxes(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MoveBoxesResponse>> {
    let boxes = MoveBox::find_by_move(&state.db, id).await?;
    Ok(Json(MoveBoxesResponse { boxes }))
}
