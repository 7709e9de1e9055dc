/// Request extractors that answer with [`ApiError`] bodies
///
/// Axum's own `Json`, `Path` and `Query` reject with plain-text bodies. The
/// wrappers here keep the same behavior but reject through `ApiError`, and
/// [`ValidatedJson`] additionally runs the payload's `validator` rules.
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use std::sync::LazyLock;

use crate::error::ApiError;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// `axum::extract::Path` with an `ApiError` rejection
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// `axum::Json` with an `ApiError` rejection, for bodies without rules
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Query` with an `ApiError` rejection
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

/// JSON body that has been deserialized and validated
///
/// Deserialization errors (wrong types, missing required fields) and rule
/// violations both answer 400 with a message list.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<Value>::from_request(req, state).await?;
        validate_payload(value).map(ValidatedJson)
    }
}

/// Deserializes `value` into `T` and runs its validation rules
pub fn validate_payload<T>(value: Value) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let payload: T =
        serde_json::from_value(value).map_err(|e| ApiError::ValidationError(vec![e.to_string()]))?;
    payload.validate()?;
    Ok(payload)
}

/// Checks applied to a user patch before its schema
///
/// An empty object is rejected with "No update data provided" and a present
/// `email` must be shaped like `x@y.z`.
pub fn check_user_patch(body: &Map<String, Value>) -> Result<(), ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("No update data provided".to_string()));
    }

    if let Some(email) = body.get("email").and_then(Value::as_str) {
        if !is_email_shaped(email) {
            return Err(ApiError::BadRequest("Invalid email format".to_string()));
        }
    }

    Ok(())
}

fn is_email_shaped(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "room must not be empty"))]
        room: String,

        #[serde(rename = "move")]
        move_id: i32,
    }

    fn messages(err: ApiError) -> Vec<String> {
        match err {
            ApiError::ValidationError(messages) => messages,
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_validate_payload_accepts_valid_body() {
        let sample: Sample = validate_payload(json!({ "room": "Kitchen", "move": 1 })).unwrap();
        assert_eq!(sample.room, "Kitchen");
        assert_eq!(sample.move_id, 1);
    }

    #[test]
    fn test_validate_payload_reports_rule_violation() {
        let err = validate_payload::<Sample>(json!({ "room": "", "move": 1 })).unwrap_err();
        assert_eq!(messages(err), vec!["room must not be empty".to_string()]);
    }

    #[test]
    fn test_validate_payload_reports_wrong_type() {
        let err = validate_payload::<Sample>(json!({ "room": "Kitchen", "move": "one" }))
            .unwrap_err();
        let messages = messages(err);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("invalid type"));
    }

    #[test]
    fn test_validate_payload_reports_missing_field() {
        let err = validate_payload::<Sample>(json!({ "room": "Kitchen" })).unwrap_err();
        assert!(messages(err)[0].contains("missing field `move`"));
    }

    #[test]
    fn test_check_user_patch() {
        let empty = Map::new();
        assert!(matches!(
            check_user_patch(&empty),
            Err(ApiError::BadRequest(msg)) if msg == "No update data provided"
        ));

        let bad = json!({ "email": "not-an-email" });
        assert!(matches!(
            check_user_patch(bad.as_object().unwrap()),
            Err(ApiError::BadRequest(msg)) if msg == "Invalid email format"
        ));

        let good = json!({ "email": "new@test.com" });
        assert!(check_user_patch(good.as_object().unwrap()).is_ok());

        let password_only = json!({ "password": "secret1" });
        assert!(check_user_patch(password_only.as_object().unwrap()).is_ok());
    }

    #[test]
    fn test_email_shape() {
        assert!(is_email_shaped("test@test.com"));
        assert!(!is_email_shaped("test@localhost"));
        assert!(!is_email_shaped("@test.com"));
        assert!(!is_email_shaped("test.com"));
        assert!(is_email_shaped("a@.b.c"));
        assert!(!is_email_shaped("a b@test.com"));
        assert!(!is_email_shaped("a@b@test.com"));
    }
}
