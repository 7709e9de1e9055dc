/// Errors raised by the model layer
///
/// Route handlers translate these into HTTP responses; anything that is not a
/// recognized client error ends up as a 500.
use crate::auth::password::PasswordError;

/// Model result type alias
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// No row matched the requested key
    #[error("{0}")]
    NotFound(String),

    /// The request is well-formed but cannot be applied (duplicates, empty patches)
    #[error("{0}")]
    BadRequest(String),

    /// Credentials did not match
    #[error("{0}")]
    Unauthorized(String),

    /// Password hashing or verification failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Any other store failure, including native constraint violations
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ModelError {
    /// Returns true for the not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, ModelError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_message() {
        let err = ModelError::NotFound("No box: 7".to_string());
        assert_eq!(err.to_string(), "No box: 7");
        assert!(err.is_not_found());

        let err = ModelError::BadRequest("Duplicate move: 2024-06-01".to_string());
        assert_eq!(err.to_string(), "Duplicate move: 2024-06-01");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: ModelError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ModelError::Database(_)));
    }
}
