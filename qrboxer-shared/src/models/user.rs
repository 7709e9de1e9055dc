/// User model and database operations
///
/// Users are keyed by `username`. Passwords are stored as Argon2id hashes and
/// never leave this module: every public type omits the hash.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     username VARCHAR(25) PRIMARY KEY,
///     password TEXT NOT NULL,
///     email TEXT NOT NULL,
///     admin BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use qrboxer_shared::models::user::{RegisterUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = User::register(
///     &pool,
///     RegisterUser {
///         username: "testuser".to_string(),
///         password: "password123".to_string(),
///         email: "test@test.com".to_string(),
///         admin: false,
///     },
/// )
/// .await?;
///
/// let same = User::authenticate(&pool, "testuser", "password123").await?;
/// assert_eq!(user, same);
/// # Ok(())
/// # }
/// ```
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};
use tracing::debug;

use crate::auth::password;
use crate::db::sql::{push_field, sql_for_partial_update, IntoSqlFields, SqlFields};
use crate::error::{ModelError, ModelResult};
use crate::models::moves::MoveSummary;

/// Public view of a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub username: String,

    pub email: String,

    pub admin: bool,
}

/// A user together with the moves they own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,

    pub moves: Vec<MoveSummary>,
}

#[derive(sqlx::FromRow)]
struct UserDetailRow {
    username: String,
    email: String,
    admin: bool,
    moves: Json<Vec<MoveSummary>>,
}

impl From<UserDetailRow> for UserDetail {
    fn from(row: UserDetailRow) -> Self {
        Self {
            user: User {
                username: row.username,
                email: row.email,
                admin: row.admin,
            },
            moves: row.moves.0,
        }
    }
}

#[derive(sqlx::FromRow)]
struct Credentials {
    username: String,
    password: String,
    email: String,
    admin: bool,
}

/// Input for registering a user; `password` is plaintext and hashed on insert
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    pub username: String,

    pub password: String,

    pub email: String,

    pub admin: bool,
}

/// Sparse user update; a present `password` is plaintext and re-hashed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub password: Option<String>,

    pub email: Option<String>,
}

impl IntoSqlFields for UpdateUser {
    fn into_sql_fields(self) -> SqlFields {
        let mut fields = SqlFields::new();
        push_field(&mut fields, "password", self.password);
        push_field(&mut fields, "email", self.email);
        fields
    }
}

impl User {
    /// Creates a user with a hashed password
    ///
    /// # Errors
    ///
    /// `BadRequest("Duplicate username: ..")` when the username is taken.
    pub async fn register(pool: &PgPool, data: RegisterUser) -> ModelResult<Self> {
        let duplicate: Option<String> =
            sqlx::query_scalar("SELECT username FROM users WHERE username = $1")
                .bind(&data.username)
                .fetch_optional(pool)
                .await?;

        if duplicate.is_some() {
            return Err(ModelError::BadRequest(format!(
                "Duplicate username: {}",
                data.username
            )));
        }

        let hashed = password::hash_password(&data.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, email, admin)
            VALUES ($1, $2, $3, $4)
            RETURNING username, email, admin
            "#,
        )
        .bind(data.username)
        .bind(hashed)
        .bind(data.email)
        .bind(data.admin)
        .fetch_one(pool)
        .await?;

        debug!(username = %user.username, "Registered user");
        Ok(user)
    }

    /// Checks a username/password pair
    ///
    /// Unknown users and wrong passwords fail the same way.
    pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> ModelResult<Self> {
        let row = sqlx::query_as::<_, Credentials>(
            "SELECT username, password, email, admin FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        if let Some(row) = row {
            if password::verify_password(password, &row.password)? {
                return Ok(User {
                    username: row.username,
                    email: row.email,
                    admin: row.admin,
                });
            }
        }

        Err(ModelError::Unauthorized(
            "Invalid username/password".to_string(),
        ))
    }

    /// Lists every user ordered by username
    pub async fn find_all(pool: &PgPool) -> ModelResult<Vec<Self>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT username, email, admin FROM users ORDER BY username",
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Fetches a user with their moves (oldest first)
    pub async fn get(pool: &PgPool, username: &str) -> ModelResult<UserDetail> {
        let row = sqlx::query_as::<_, UserDetailRow>(
            r#"
            SELECT u.username,
                   u.email,
                   u.admin,
                   COALESCE(
                       json_agg(
                           json_build_object(
                               'id', m.id,
                               'location', m.location,
                               'date', m.date,
                               'username', m.username
                           ) ORDER BY m.id
                       ) FILTER (WHERE m.id IS NOT NULL),
                       '[]'
                   ) AS moves
            FROM users u
            LEFT JOIN moves m ON m.username = u.username
            WHERE u.username = $1
            GROUP BY u.username
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        row.map(UserDetail::from)
            .ok_or_else(|| ModelError::NotFound(format!("No user: {}", username)))
    }

    /// Applies a sparse update
    ///
    /// # Errors
    ///
    /// `BadRequest` for an empty patch, `NotFound` for an unknown username.
    pub async fn update(pool: &PgPool, username: &str, mut data: UpdateUser) -> ModelResult<Self> {
        if let Some(plain) = data.password.take() {
            data.password = Some(password::hash_password(&plain)?);
        }

        let update = sql_for_partial_update(data.into_sql_fields(), &[])?;
        let query = format!(
            "UPDATE users SET {} WHERE username = {} RETURNING username, email, admin",
            update.set_cols,
            update.next_placeholder()
        );

        let mut q = sqlx::query_as::<_, User>(&query);
        for value in update.values {
            q = value.bind_to(q);
        }

        q.bind(username)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No user: {}", username)))
    }

    /// Deletes a user; their moves go with them
    pub async fn remove(pool: &PgPool, username: &str) -> ModelResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ModelError::NotFound(format!("No user: {}", username)));
        }

        Ok(())
    }
}
