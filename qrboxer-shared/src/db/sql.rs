/// SQL fragment builders for sparse updates and list filters
///
/// Models describe a patch (or a filter) as an ordered list of
/// `(field, value)` pairs. The helpers here turn that list into a SQL fragment
/// with positional placeholders plus the values to bind, in the same order.
///
/// # Example
///
/// ```
/// use qrboxer_shared::db::sql::{sql_for_partial_update, SqlValue};
///
/// let update = sql_for_partial_update(
///     vec![
///         ("room", SqlValue::from("Kitchen")),
///         ("moveId", SqlValue::from(3)),
///     ],
///     &[("moveId", "move")],
/// )
/// .unwrap();
///
/// assert_eq!(update.set_cols, r#""room"=$1, "move"=$2"#);
/// assert_eq!(update.next_placeholder(), "$3");
/// ```
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

use crate::error::{ModelError, ModelResult};

/// A value that can be bound to a generated placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i32),
    Bool(bool),
    Date(NaiveDate),
    /// Bound as a text NULL; only valid for nullable text columns
    Null,
}

impl SqlValue {
    /// Binds this value as the next positional argument of `query`
    pub fn bind_to<'q, O>(
        self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        match self {
            SqlValue::Text(v) => query.bind(v),
            SqlValue::Int(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        }
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Ordered `(field, value)` pairs produced by patch and filter structs
pub type SqlFields = Vec<(&'static str, SqlValue)>;

/// Conversion of a sparse struct into the fields it actually sets
///
/// Implementations must skip `None` fields and keep declaration order.
pub trait IntoSqlFields {
    fn into_sql_fields(self) -> SqlFields;
}

/// Pushes `(name, value)` onto `fields` when `value` is present
pub fn push_field<T: Into<SqlValue>>(fields: &mut SqlFields, name: &'static str, value: Option<T>) {
    if let Some(value) = value {
        fields.push((name, value.into()));
    }
}

/// Deserializes a patch field that may be explicitly cleared
///
/// Use with `#[serde(default, deserialize_with = "...")]` on an
/// `Option<Option<T>>`: a missing key stays `None`, `null` becomes
/// `Some(None)` and is written as SQL `NULL`.
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Generated `SET` fragment with its bound values
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    /// `"col1"=$1, "col2"=$2, ...`
    pub set_cols: String,

    /// Values in placeholder order
    pub values: Vec<SqlValue>,
}

impl PartialUpdate {
    /// Placeholder for the first parameter after the update values (the row key)
    pub fn next_placeholder(&self) -> String {
        format!("${}", self.values.len() + 1)
    }
}

/// Generated `WHERE` fragment with its bound values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    /// Empty, or ` WHERE "a"=$1 AND "b"=$2`
    pub clause: String,

    /// Values in placeholder order
    pub values: Vec<SqlValue>,
}

impl WhereClause {
    /// Binds every filter value onto `query`
    pub fn bind_all<'q, O>(
        self,
        mut query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for value in self.values {
            query = value.bind_to(query);
        }
        query
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn column_name<'a>(field: &'a str, js_to_sql: &[(&str, &'a str)]) -> &'a str {
    js_to_sql
        .iter()
        .find(|(js, _)| *js == field)
        .map(|(_, sql)| *sql)
        .unwrap_or(field)
}

/// Builds the `SET` clause for a sparse update
///
/// `js_to_sql` renames API field names to column names; unlisted fields are
/// used as-is.
///
/// # Errors
///
/// Returns `ModelError::BadRequest("No data")` when `data` is empty.
pub fn sql_for_partial_update(
    data: SqlFields,
    js_to_sql: &[(&str, &str)],
) -> ModelResult<PartialUpdate> {
    if data.is_empty() {
        return Err(ModelError::BadRequest("No data".to_string()));
    }

    let mut cols = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());

    for (idx, (field, value)) in data.into_iter().enumerate() {
        let column = column_name(field, js_to_sql);
        cols.push(format!("{}=${}", quote_ident(column), idx + 1));
        values.push(value);
    }

    Ok(PartialUpdate {
        set_cols: cols.join(", "),
        values,
    })
}

/// Builds an equality `WHERE` clause for a list filter
///
/// When `alias` is given every column is qualified with it (`m."location"`).
/// An empty filter list yields an empty clause.
pub fn sql_for_filters(
    filters: SqlFields,
    js_to_sql: &[(&str, &str)],
    alias: Option<&str>,
) -> WhereClause {
    if filters.is_empty() {
        return WhereClause::default();
    }

    let mut conditions = Vec::with_capacity(filters.len());
    let mut values = Vec::with_capacity(filters.len());

    for (idx, (field, value)) in filters.into_iter().enumerate() {
        let column = quote_ident(column_name(field, js_to_sql));
        let qualified = match alias {
            Some(alias) => format!("{}.{}", alias, column),
            None => column,
        };
        conditions.push(format!("{}=${}", qualified, idx + 1));
        values.push(value);
    }

    WhereClause {
        clause: format!(" WHERE {}", conditions.join(" AND ")),
        values,
    }
}
