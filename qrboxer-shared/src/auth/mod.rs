/// Authentication utilities
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: signed user tokens (HS256 JWT) carrying `{username, admin}`
///
/// # Example
///
/// ```no_run
/// use qrboxer_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod token;
