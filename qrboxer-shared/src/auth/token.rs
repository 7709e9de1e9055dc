/// Signed user tokens
///
/// Tokens are HS256 JWTs carrying the username and admin flag. They have no
/// expiry and there is no refresh or revocation; rotating `JWT_SECRET`
/// invalidates every issued token.
///
/// # Example
///
/// ```
/// use qrboxer_shared::auth::token::{create_token, validate_token};
/// use qrboxer_shared::models::user::User;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user = User {
///     username: "testuser".to_string(),
///     email: "test@test.com".to_string(),
///     admin: false,
/// };
///
/// let token = create_token(&user, "a-secret-of-at-least-thirty-two-bytes")?;
/// let claims = validate_token(&token, "a-secret-of-at-least-thirty-two-bytes")?;
/// assert_eq!(claims.username, "testuser");
/// assert!(!claims.admin);
/// # Ok(())
/// # }
/// ```
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::user::User;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,

    pub admin: bool,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, admin: bool) -> Self {
        Self {
            username: username.into(),
            admin,
            iat: Utc::now().timestamp(),
        }
    }
}

/// Signs a token for `user`
pub fn create_token(user: &User, secret: &str) -> Result<String, TokenError> {
    encode_claims(&Claims::new(user.username.clone(), user.admin), secret)
}

/// Signs arbitrary claims
pub fn encode_claims(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies the signature of `token` and returns its claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims = HashSet::new();
    validation.validate_exp = false;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| TokenError::Invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn user(admin: bool) -> User {
        User {
            username: "testuser".to_string(),
            email: "test@test.com".to_string(),
            admin,
        }
    }

    #[test]
    fn test_create_and_validate_token() {
        let token = create_token(&user(false), SECRET).expect("Should create token");
        let claims = validate_token(&token, SECRET).expect("Should validate token");

        assert_eq!(claims.username, "testuser");
        assert!(!claims.admin);
        assert!(claims.iat > 0);
    }

    #[test]
    fn test_admin_flag_is_carried() {
        let token = create_token(&user(true), SECRET).unwrap();
        assert!(validate_token(&token, SECRET).unwrap().admin);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = create_token(&user(false), SECRET).unwrap();
        let result = validate_token(&token, "another-secret-key-at-least-32-bytes");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_old_tokens_stay_valid() {
        let claims = Claims {
            username: "testuser".to_string(),
            admin: false,
            iat: 946_684_800,
        };
        let token = encode_claims(&claims, SECRET).unwrap();

        assert_eq!(validate_token(&token, SECRET).unwrap(), claims);
    }

    #[test]
    fn test_validate_garbage() {
        assert!(validate_token("not.a.token", SECRET).is_err());
    }
}
