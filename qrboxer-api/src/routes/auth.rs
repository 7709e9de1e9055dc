/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/token` - Exchange username/password for a token
/// - `POST /auth/register` - Create an account and receive a token
use crate::{app::AppState, error::ApiResult, extract::ValidatedJson};
use axum::{extract::State, http::StatusCode, Json};
use qrboxer_shared::{
    auth::token::create_token,
    models::user::{RegisterUser, User},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, max = 25, message = "username must be 1 to 25 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 20, message = "password must be 1 to 20 characters"))]
    pub password: String,
}

/// Registration request
///
/// Unknown fields are ignored, including `admin`: self-registered accounts
/// are never admins.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 25, message = "username must be 1 to 25 characters"))]
    pub username: String,

    #[validate(length(min = 5, max = 20, message = "password must be 5 to 20 characters"))]
    pub password: String,

    #[validate(
        length(min = 6, max = 60, message = "email must be 6 to 60 characters"),
        email(message = "Invalid email format")
    )]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Logs a user in
///
/// # Endpoint
///
/// ```text
/// POST /auth/token
/// Content-Type: application/json
///
/// { "username": "testuser", "password": "password123" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing or malformed fields
/// - `401 Unauthorized`: unknown user or wrong password
pub async fn token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = User::authenticate(&state.db, &req.username, &req.password).await?;
    let token = create_token(&user, state.jwt_secret())?;

    info!(username = %user.username, "User logged in");

    Ok(Json(TokenResponse { token }))
}

/// Registers a new non-admin user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// { "username": "newuser", "password": "password123", "email": "new@test.com" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed or the username is taken
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let user = User::register(
        &state.db,
        RegisterUser {
            username: req.username,
            password: req.password,
            email: req.email,
            admin: false,
        },
    )
    .await?;

    let token = create_token(&user, state.jwt_secret())?;

    info!(username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}
