use crate::config::DatabaseConfig;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use sqlx::mysql::{MySqlColumn, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Row, TypeInfo};
use tracing::debug;

/// One result row: column name -> value, in the database's native column
/// order (serde_json is built with preserve_order).
pub type ResultRow = serde_json::Map<String, Value>;

/// Runs one SQL statement and materializes every row. The statement is
/// whatever the LLM produced; nothing here validates it. An error from
/// `run` is a statement failure, eligible for the workflow's single
/// correction attempt; failures opening the connection happen before an
/// executor exists and are not.
#[async_trait]
pub trait QueryExecutor: Send {
    async fn run(&mut self, sql: &str) -> Result<Vec<ResultRow>, sqlx::Error>;
}

/// Executor over one short-lived connection, opened for the execution step
/// of a single request and independent of the introspection connection.
pub struct MySqlExecutor {
    conn: MySqlConnection,
}

impl MySqlExecutor {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        Ok(Self {
            conn: super::connect(config).await?,
        })
    }

    pub async fn close(self) {
        self.conn.close().await.ok();
    }
}

#[async_trait]
impl QueryExecutor for MySqlExecutor {
    async fn run(&mut self, sql: &str) -> Result<Vec<ResultRow>, sqlx::Error> {
        let rows = sqlx::query(sql).fetch_all(&mut self.conn).await?;
        debug!("Query returned {} rows", rows.len());
        Ok(rows.iter().map(row_to_map).collect())
    }
}

/// Converts a row into an ordered name -> JSON value map, passing values
/// through with the driver's native typing.
pub fn row_to_map(row: &MySqlRow) -> ResultRow {
    let mut map = ResultRow::new();
    for column in row.columns() {
        map.insert(column.name().to_string(), column_value(row, column));
    }
    map
}

fn column_value(row: &MySqlRow, column: &MySqlColumn) -> Value {
    let i = column.ordinal();
    match column.type_info().name() {
        "BOOLEAN" => json_or_null(row.try_get::<Option<bool>, _>(i)),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            json_or_null(row.try_get::<Option<i64>, _>(i))
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => json_or_null(row.try_get::<Option<u64>, _>(i)),
        "FLOAT" => json_or_null(row.try_get::<Option<f32>, _>(i)),
        "DOUBLE" => json_or_null(row.try_get::<Option<f64>, _>(i)),
        "DATE" => text_or_null(row.try_get::<Option<NaiveDate>, _>(i)),
        "TIME" => text_or_null(row.try_get::<Option<NaiveTime>, _>(i)),
        "DATETIME" => text_or_null(row.try_get::<Option<NaiveDateTime>, _>(i)),
        "TIMESTAMP" => text_or_null(row.try_get::<Option<DateTime<Utc>>, _>(i)),
        "CHAR" | "VARCHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
        | "SET" => json_or_null(row.try_get::<Option<String>, _>(i)),
        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            match row.try_get::<Option<Vec<u8>>, _>(i) {
                Ok(Some(bytes)) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
                _ => Value::Null,
            }
        }
        "JSON" => match row.try_get_unchecked::<Option<String>, _>(i) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
            _ => Value::Null,
        },
        // DECIMAL arrives as text on the wire; everything else falls back to
        // its textual form rather than being dropped
        _ => match row.try_get_unchecked::<Option<String>, _>(i) {
            Ok(Some(text)) => Value::String(text),
            _ => Value::Null,
        },
    }
}

fn json_or_null<T: Into<Value>>(value: Result<Option<T>, sqlx::Error>) -> Value {
    match value {
        Ok(Some(v)) => v.into(),
        _ => Value::Null,
    }
}

fn text_or_null<T: ToString>(value: Result<Option<T>, sqlx::Error>) -> Value {
    match value {
        Ok(Some(v)) => Value::String(v.to_string()),
        _ => Value::Null,
    }
}
