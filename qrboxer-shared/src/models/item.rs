/// Item model and database operations
///
/// An item is a tracked object packed in one box (`box` column, `box_id` in
/// Rust, `"box"` in JSON).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE items (
///     id SERIAL PRIMARY KEY,
///     description TEXT NOT NULL,
///     image TEXT,
///     box INTEGER NOT NULL REFERENCES boxes (id) ON DELETE CASCADE
/// );
/// ```
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use tracing::debug;

use crate::db::sql::{
    push_field, sql_for_filters, sql_for_partial_update, IntoSqlFields, SqlFields,
};
use crate::error::{ModelError, ModelResult};

const COLUMNS: &str = "id, description, image, box";

const JS_TO_SQL: &[(&str, &str)] = &[("box_id", "box")];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i32,

    pub description: String,

    /// Image URL or file name
    pub image: Option<String>,

    #[serde(rename = "box")]
    #[sqlx(rename = "box")]
    pub box_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    pub description: String,

    pub image: Option<String>,

    #[serde(rename = "box")]
    pub box_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItem {
    pub description: Option<String>,

    #[serde(default, deserialize_with = "crate::db::sql::deserialize_nullable")]
    pub image: Option<Option<String>>,

    #[serde(rename = "box")]
    pub box_id: Option<i32>,
}

impl IntoSqlFields for UpdateItem {
    fn into_sql_fields(self) -> SqlFields {
        let mut fields = SqlFields::new();
        push_field(&mut fields, "description", self.description);
        push_field(&mut fields, "image", self.image);
        push_field(&mut fields, "box_id", self.box_id);
        fields
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemFilter {
    pub description: Option<String>,

    #[serde(rename = "box")]
    pub box_id: Option<i32>,
}

impl IntoSqlFields for ItemFilter {
    fn into_sql_fields(self) -> SqlFields {
        let mut fields = SqlFields::new();
        push_field(&mut fields, "description", self.description);
        push_field(&mut fields, "box_id", self.box_id);
        fields
    }
}

impl Item {
    pub async fn create(pool: &PgPool, data: CreateItem) -> ModelResult<Self> {
        let query = format!(
            "INSERT INTO items (description, image, box)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );

        let item = sqlx::query_as::<_, Item>(&query)
            .bind(data.description)
            .bind(data.image)
            .bind(data.box_id)
            .fetch_one(pool)
            .await?;

        debug!(item_id = item.id, box_id = item.box_id, "Created item");
        Ok(item)
    }

    /// Lists items matching `filter`, in insertion order
    pub async fn find_all(pool: &PgPool, filter: ItemFilter) -> ModelResult<Vec<Self>> {
        let filters = sql_for_filters(filter.into_sql_fields(), JS_TO_SQL, None);
        let query = format!("SELECT {COLUMNS} FROM items{} ORDER BY id", filters.clause);

        let items = filters
            .bind_all(sqlx::query_as::<_, Item>(&query))
            .fetch_all(pool)
            .await?;

        Ok(items)
    }

    /// Items packed in one box
    pub async fn find_by_box(pool: &PgPool, box_id: i32) -> ModelResult<Vec<Self>> {
        Self::find_all(
            pool,
            ItemFilter {
                box_id: Some(box_id),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn get(pool: &PgPool, id: i32) -> ModelResult<Self> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");

        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No item: {}", id)))
    }

    pub async fn update(pool: &PgPool, id: i32, data: UpdateItem) -> ModelResult<Self> {
        let update = sql_for_partial_update(data.into_sql_fields(), JS_TO_SQL)?;
        let query = format!(
            "UPDATE items SET {} WHERE id = {} RETURNING {COLUMNS}",
            update.set_cols,
            update.next_placeholder()
        );

        let mut q = sqlx::query_as::<_, Item>(&query);
        for value in update.values {
            q = value.bind_to(q);
        }

        q.bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No item: {}", id)))
    }

    pub async fn remove(pool: &PgPool, id: i32) -> ModelResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ModelError::NotFound(format!("No item: {}", id)));
        }

        Ok(())
    }

    /// Deletes every item in a box, returning how many were removed
    ///
    /// Takes any executor so box deletion can run it inside its transaction.
    pub async fn remove_by_box<'e, E>(executor: E, box_id: i32) -> ModelResult<u64>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM items WHERE box = $1")
            .bind(box_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
