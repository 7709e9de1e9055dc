/// Move model and database operations
///
/// A move is a relocation event owned by a user. Reads embed the move's boxes
/// through a `LEFT JOIN` aggregated with `json_agg`, so a move without boxes
/// carries `boxes: []`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE moves (
///     id SERIAL PRIMARY KEY,
///     location TEXT NOT NULL,
///     date DATE NOT NULL,
///     username VARCHAR(25) NOT NULL REFERENCES users (username) ON DELETE CASCADE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use qrboxer_shared::models::moves::{CreateMove, Move, MoveFilter};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let created = Move::create(
///     &pool,
///     CreateMove {
///         location: "New York".to_string(),
///         date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///         username: "testuser".to_string(),
///     },
/// )
/// .await?;
/// assert!(created.boxes.is_empty());
///
/// let mine = Move::find_all(
///     &pool,
///     MoveFilter {
///         username: Some("testuser".to_string()),
///         ..Default::default()
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};
use tracing::debug;

use crate::db::sql::{
    push_field, sql_for_filters, sql_for_partial_update, IntoSqlFields, SqlFields,
};
use crate::error::{ModelError, ModelResult};
use crate::models::move_box::MoveBox;

/// Box list aggregated per move; expects `boxes` joined as `b`
const BOXES_AGG: &str = r#"
    COALESCE(
        json_agg(
            json_build_object(
                'id', b.id,
                'name', b.name,
                'description', b.description,
                'location', b.location,
                'room', b.room,
                'move', b.move
            ) ORDER BY b.id
        ) FILTER (WHERE b.id IS NOT NULL),
        '[]'
    ) AS boxes"#;

/// A move with its boxes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub id: i32,

    pub location: String,

    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,

    /// Owner
    pub username: String,

    pub boxes: Vec<MoveBox>,
}

/// A move without its boxes, as embedded in a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MoveSummary {
    pub id: i32,

    pub location: String,

    pub date: NaiveDate,

    pub username: String,
}

#[derive(sqlx::FromRow)]
struct MoveRow {
    id: i32,
    location: String,
    date: NaiveDate,
    username: String,
    boxes: Json<Vec<MoveBox>>,
}

impl From<MoveRow> for Move {
    fn from(row: MoveRow) -> Self {
        Self {
            id: row.id,
            location: row.location,
            date: row.date,
            username: row.username,
            boxes: row.boxes.0,
        }
    }
}

/// Input for creating a move
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMove {
    pub location: String,

    pub date: NaiveDate,

    pub username: String,
}

/// Sparse move update; only present fields are written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMove {
    pub location: Option<String>,

    pub date: Option<NaiveDate>,

    /// Reassigns the move to another user
    pub username: Option<String>,
}

impl IntoSqlFields for UpdateMove {
    fn into_sql_fields(self) -> SqlFields {
        let mut fields = SqlFields::new();
        push_field(&mut fields, "location", self.location);
        push_field(&mut fields, "date", self.date);
        push_field(&mut fields, "username", self.username);
        fields
    }
}

/// Equality filters for [`Move::find_all`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveFilter {
    pub username: Option<String>,

    pub location: Option<String>,

    pub date: Option<NaiveDate>,
}

impl IntoSqlFields for MoveFilter {
    fn into_sql_fields(self) -> SqlFields {
        let mut fields = SqlFields::new();
        push_field(&mut fields, "username", self.username);
        push_field(&mut fields, "location", self.location);
        push_field(&mut fields, "date", self.date);
        fields
    }
}

impl Move {
    /// Inserts a move
    ///
    /// The date must not already be used by another move. The check is a
    /// separate lookup, so two concurrent inserts can still both succeed.
    ///
    /// # Errors
    ///
    /// `BadRequest("Duplicate move: <date>")` when the date is taken.
    pub async fn create(pool: &PgPool, data: CreateMove) -> ModelResult<Self> {
        let duplicate: Option<i32> = sqlx::query_scalar("SELECT id FROM moves WHERE date = $1")
            .bind(data.date)
            .fetch_optional(pool)
            .await?;

        if duplicate.is_some() {
            return Err(ModelError::BadRequest(format!(
                "Duplicate move: {}",
                data.date
            )));
        }

        let summary = sqlx::query_as::<_, MoveSummary>(
            r#"
            INSERT INTO moves (location, date, username)
            VALUES ($1, $2, $3)
            RETURNING id, location, date, username
            "#,
        )
        .bind(data.location)
        .bind(data.date)
        .bind(data.username)
        .fetch_one(pool)
        .await?;

        debug!(move_id = summary.id, "Created move");
        Ok(Move {
            id: summary.id,
            location: summary.location,
            date: summary.date,
            username: summary.username,
            boxes: Vec::new(),
        })
    }

    /// Lists moves matching `filter`, in insertion order
    pub async fn find_all(pool: &PgPool, filter: MoveFilter) -> ModelResult<Vec<Self>> {
        let filters = sql_for_filters(filter.into_sql_fields(), &[], Some("m"));
        let query = format!(
            r#"
            SELECT m.id, m.location, m.date, m.username, {}
            FROM moves m
            LEFT JOIN boxes b ON b.move = m.id{}
            GROUP BY m.id
            ORDER BY m.id
            "#,
            BOXES_AGG, filters.clause
        );

        let rows = filters
            .bind_all(sqlx::query_as::<_, MoveRow>(&query))
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Move::from).collect())
    }

    /// Fetches one move with its boxes
    pub async fn get(pool: &PgPool, id: i32) -> ModelResult<Self> {
        let query = format!(
            r#"
            SELECT m.id, m.location, m.date, m.username, {}
            FROM moves m
            LEFT JOIN boxes b ON b.move = m.id
            WHERE m.id = $1
            GROUP BY m.id
            "#,
            BOXES_AGG
        );

        sqlx::query_as::<_, MoveRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(Move::from)
            .ok_or_else(|| ModelError::NotFound(format!("No move: {}", id)))
    }

    /// Applies a sparse update and returns the move with its boxes
    ///
    /// # Errors
    ///
    /// `BadRequest` for an empty patch, `NotFound` for an unknown id.
    pub async fn update(pool: &PgPool, id: i32, data: UpdateMove) -> ModelResult<Self> {
        let update = sql_for_partial_update(data.into_sql_fields(), &[])?;
        let query = format!(
            r#"
            WITH updated_move AS (
                UPDATE moves
                SET {}
                WHERE id = {}
                RETURNING id, location, date, username
            )
            SELECT m.id, m.location, m.date, m.username, {}
            FROM updated_move m
            LEFT JOIN boxes b ON b.move = m.id
            GROUP BY m.id, m.location, m.date, m.username
            "#,
            update.set_cols,
            update.next_placeholder(),
            BOXES_AGG
        );

        let mut q = sqlx::query_as::<_, MoveRow>(&query);
        for value in update.values {
            q = value.bind_to(q);
        }

        q.bind(id)
            .fetch_optional(pool)
            .await?
            .map(Move::from)
            .ok_or_else(|| ModelError::NotFound(format!("No move: {}", id)))
    }

    /// Deletes a move together with its boxes and their items
    pub async fn remove(pool: &PgPool, id: i32) -> ModelResult<()> {
        let mut tx = pool.begin().await?;

        let items = sqlx::query(
            "DELETE FROM items WHERE box IN (SELECT id FROM boxes WHERE move = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let boxes = sqlx::query("DELETE FROM boxes WHERE move = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let moves = sqlx::query("DELETE FROM moves WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if moves.rows_affected() == 0 {
            return Err(ModelError::NotFound(format!("No move: {}", id)));
        }

        tx.commit().await?;

        debug!(
            move_id = id,
            boxes = boxes.rows_affected(),
            items = items.rows_affected(),
            "Removed move"
        );
        Ok(())
    }
}
