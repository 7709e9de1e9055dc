/// Box model and database operations
///
/// A box is a physical container packed for one move. The owning move is the
/// `move` column, exposed as `move_id` in Rust and `"move"` in JSON.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boxes (
///     id SERIAL PRIMARY KEY,
///     name TEXT,
///     description TEXT,
///     location TEXT,
///     room TEXT NOT NULL,
///     move INTEGER NOT NULL REFERENCES moves (id) ON DELETE CASCADE
/// );
/// ```
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;

use crate::db::sql::{
    push_field, sql_for_filters, sql_for_partial_update, IntoSqlFields, SqlFields,
};
use crate::error::{ModelError, ModelResult};
use crate::models::item::Item;

const COLUMNS: &str = "id, name, description, location, room, move";

/// Rust field names that differ from their column
const JS_TO_SQL: &[(&str, &str)] = &[("move_id", "move")];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MoveBox {
    pub id: i32,

    pub name: Option<String>,

    pub description: Option<String>,

    pub location: Option<String>,

    pub room: String,

    /// Owning move
    #[serde(rename = "move")]
    #[sqlx(rename = "move")]
    pub move_id: i32,
}

/// Input for creating a box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBox {
    pub name: Option<String>,

    pub description: Option<String>,

    pub location: Option<String>,

    pub room: String,

    #[serde(rename = "move")]
    pub move_id: i32,
}

/// Sparse box update; `move_id` moves the box to another move
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBox {
    #[serde(default, deserialize_with = "crate::db::sql::deserialize_nullable")]
    pub name: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::db::sql::deserialize_nullable")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::db::sql::deserialize_nullable")]
    pub location: Option<Option<String>>,

    pub room: Option<String>,

    #[serde(rename = "move")]
    pub move_id: Option<i32>,
}

impl IntoSqlFields for UpdateBox {
    fn into_sql_fields(self) -> SqlFields {
        let mut fields = SqlFields::new();
        push_field(&mut fields, "name", self.name);
        push_field(&mut fields, "description", self.description);
        push_field(&mut fields, "location", self.location);
        push_field(&mut fields, "room", self.room);
        push_field(&mut fields, "move_id", self.move_id);
        fields
    }
}

/// Equality filters for [`MoveBox::find_all`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxFilter {
    pub location: Option<String>,

    pub room: Option<String>,

    #[serde(rename = "move")]
    pub move_id: Option<i32>,
}

impl IntoSqlFields for BoxFilter {
    fn into_sql_fields(self) -> SqlFields {
        let mut fields = SqlFields::new();
        push_field(&mut fields, "location", self.location);
        push_field(&mut fields, "room", self.room);
        push_field(&mut fields, "move_id", self.move_id);
        fields
    }
}

impl MoveBox {
    /// Inserts a box and returns the full row
    ///
    /// An unknown `move_id` surfaces as a database error.
    pub async fn create(pool: &PgPool, data: CreateBox) -> ModelResult<Self> {
        let query = format!(
            "INSERT INTO boxes (name, description, location, room, move)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );

        let created = sqlx::query_as::<_, MoveBox>(&query)
            .bind(data.name)
            .bind(data.description)
            .bind(data.location)
            .bind(data.room)
            .bind(data.move_id)
            .fetch_one(pool)
            .await?;

        debug!(box_id = created.id, move_id = created.move_id, "Created box");
        Ok(created)
    }

    /// Lists boxes matching `filter`, in insertion order
    pub async fn find_all(pool: &PgPool, filter: BoxFilter) -> ModelResult<Vec<Self>> {
        let filters = sql_for_filters(filter.into_sql_fields(), JS_TO_SQL, None);
        let query = format!("SELECT {COLUMNS} FROM boxes{} ORDER BY id", filters.clause);

        let boxes = filters
            .bind_all(sqlx::query_as::<_, MoveBox>(&query))
            .fetch_all(pool)
            .await?;

        Ok(boxes)
    }

    /// Boxes packed for one move
    pub async fn find_by_move(pool: &PgPool, move_id: i32) -> ModelResult<Vec<Self>> {
        Self::find_all(
            pool,
            BoxFilter {
                move_id: Some(move_id),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn get(pool: &PgPool, id: i32) -> ModelResult<Self> {
        let query = format!("SELECT {COLUMNS} FROM boxes WHERE id = $1");

        sqlx::query_as::<_, MoveBox>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No box: {}", id)))
    }

    /// Applies a sparse update
    ///
    /// # Errors
    ///
    /// `BadRequest` for an empty patch, `NotFound` for an unknown id.
    pub async fn update(pool: &PgPool, id: i32, data: UpdateBox) -> ModelResult<Self> {
        let update = sql_for_partial_update(data.into_sql_fields(), JS_TO_SQL)?;
        let query = format!(
            "UPDATE boxes SET {} WHERE id = {} RETURNING {COLUMNS}",
            update.set_cols,
            update.next_placeholder()
        );

        let mut q = sqlx::query_as::<_, MoveBox>(&query);
        for value in update.values {
            q = value.bind_to(q);
        }

        q.bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No box: {}", id)))
    }

    /// Deletes a box and the items packed in it
    pub async fn remove(pool: &PgPool, id: i32) -> ModelResult<()> {
        let mut tx = pool.begin().await?;

        let items = Item::remove_by_box(&mut *tx, id).await?;

        let result = sqlx::query("DELETE FROM boxes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ModelError::NotFound(format!("No box: {}", id)));
        }

        tx.commit().await?;

        debug!(box_id = id, items, "Removed box");
        Ok(())
    }
}
