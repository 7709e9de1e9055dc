/// Bearer-token authentication and authorization guards
///
/// [`authenticate`] runs on every request. When the `Authorization` header
/// carries a valid `Bearer` token, its [`Claims`] are stored in the request
/// extensions; a missing or invalid token is not an error at this point.
///
/// The guards read those claims and reject with 401:
///
/// - [`ensure_admin`]: token with `admin: true`
/// - [`ensure_correct_user_or_admin`]: token for the `:username` in the path,
///   or an admin
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use qrboxer_shared::auth::token::{validate_token, Claims};
use tracing::warn;

use crate::{app::AppState, error::ApiError, extract::Path};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Unauthorized".to_string())
}

/// Stores the caller's claims when a valid token is presented
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(req.headers()) {
        match validate_token(token, state.jwt_secret()) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(e) => warn!(error = %e, "Ignoring invalid bearer token"),
        }
    }

    next.run(req).await
}

fn claims(req: &Request) -> Result<&Claims, ApiError> {
    req.extensions().get::<Claims>().ok_or_else(unauthorized)
}

pub async fn ensure_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let claims = claims(&req)?;
    if !claims.admin {
        warn!(username = %claims.username, "Non-admin rejected from admin route");
        return Err(unauthorized());
    }

    Ok(next.run(req).await)
}

pub async fn ensure_correct_user_or_admin(
    Path(username): Path<String>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = claims(&req)?;
    if !claims.admin && claims.username != username {
        warn!(
            caller = %claims.username,
            target = %username,
            "Rejected access to another user"
        );
        return Err(unauthorized());
    }

    Ok(next.run(req).await)
}
