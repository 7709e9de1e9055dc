/// User management endpoints
///
/// # Endpoints
///
/// - `POST /users` - Create a user, optionally an admin (admin only)
/// - `GET /users` - List users (admin only)
/// - `GET /users/:username` - User with their moves (same user or admin)
/// - `PATCH /users/:username` - Change password or email (same user or admin)
/// - `DELETE /users/:username` - Delete a user and their moves (same user or admin)
use crate::{
    app::AppState,
    error::ApiResult,
    extract::{check_user_patch, validate_payload, JsonBody, Path, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use qrboxer_shared::{
    auth::token::create_token,
    models::user::{RegisterUser, UpdateUser, User, UserDetail},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;
use validator::Validate;

/// Admin-issued user creation request
#[derive(Debug, Deserialize, Validate)]
pub struct NewUserRequest {
    #[validate(length(min = 1, max = 25, message = "username must be 1 to 25 characters"))]
    pub username: String,

    #[validate(length(min = 5, max = 20, message = "password must be 5 to 20 characters"))]
    pub password: String,

    #[validate(
        length(min = 6, max = 60, message = "email must be 6 to 60 characters"),
        email(message = "Invalid email format")
    )]
    pub email: String,

    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 5, max = 20, message = "password must be 5 to 20 characters"))]
    pub password: Option<String>,

    #[validate(length(min = 6, max = 60, message = "email must be 6 to 60 characters"))]
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            password: req.password,
            email: req.email,
        }
    }
}

/// Public part of a newly created user
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedUser {
    pub username: String,

    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user: CreatedUser,

    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDetailResponse {
    pub user: UserDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<NewUserRequest>,
) -> ApiResult<(StatusCode, Json<CreateUserResponse>)> {
    let user = User::register(
        &state.db,
        RegisterUser {
            username: req.username,
            password: req.password,
            email: req.email,
            admin: req.admin,
        },
    )
    .await?;

    let token = create_token(&user, state.jwt_secret())?;

    info!(username = %user.username, admin = user.admin, "User created");

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            user: CreatedUser {
                username: user.username,
                email: user.email,
            },
            token,
        }),
    ))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let users = User::find_all(&state.db).await?;
    Ok(Json(UsersResponse { users }))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<UserDetailResponse>> {
    let user = User::get(&state.db, &username).await?;
    Ok(Json(UserDetailResponse { user }))
}

/// Updates a user
///
/// An empty body answers 400 "No update data provided" and a malformed email
/// answers 400 "Invalid email format", both before schema validation.
pub async fn update_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    JsonBody(body): JsonBody<Map<String, Value>>,
) -> ApiResult<Json<UserResponse>> {
    check_user_patch(&body)?;
    let req: UpdateUserRequest = validate_payload(Value::Object(body))?;

    let user = User::update(&state.db, &username, req.into()).await?;

    info!(username = %user.username, "User updated");

    Ok(Json(UserResponse { user }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<Value>> {
    User::remove(&state.db, &username).await?;

    info!(username = %username, "User deleted");

    Ok(Json(json!({ "deleted": username })))
}
