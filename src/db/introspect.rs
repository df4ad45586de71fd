use crate::config::DatabaseConfig;
use crate::db::execute::row_to_map;
use sqlx::mysql::MySqlConnection;
use sqlx::{Connection, Row};
use tracing::{debug, error};

const FOREIGN_KEY_QUERY: &str = "\
SELECT COLUMN_NAME, REFERENCED_TABLE_NAME, REFERENCED_COLUMN_NAME \
FROM information_schema.KEY_COLUMN_USAGE \
WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND REFERENCED_TABLE_NAME IS NOT NULL \
ORDER BY ORDINAL_POSITION";

/// Describes the database's current tables and columns as text fragments,
/// one `table(col, col)` line per table. With `include_sample_data` set,
/// each table also gets up to 3 sample rows and its foreign-key edges.
///
/// Any failure degrades to a single error fragment instead of propagating;
/// the caller proceeds with the degraded description. The schema is fetched
/// fresh on every call, never cached.
pub async fn describe_schema(config: &DatabaseConfig) -> Vec<String> {
    match fetch_schema(config).await {
        Ok(fragments) => fragments,
        Err(e) => {
            error!("Schema introspection failed: {}", e);
            vec![format!("Error: {}", e)]
        }
    }
}

async fn fetch_schema(config: &DatabaseConfig) -> Result<Vec<String>, sqlx::Error> {
    let mut conn = super::connect(config).await?;

    let table_rows = sqlx::query("SHOW TABLES").fetch_all(&mut conn).await?;
    let mut tables = Vec::with_capacity(table_rows.len());
    for row in &table_rows {
        tables.push(row.try_get::<String, _>(0)?);
    }
    debug!("Found {} tables", tables.len());

    let mut fragments = Vec::new();
    for table in &tables {
        let show_columns = format!("SHOW COLUMNS FROM `{}`", table);
        let column_rows = sqlx::query(&show_columns).fetch_all(&mut conn).await?;

        let mut columns = Vec::with_capacity(column_rows.len());
        for row in &column_rows {
            columns.push(row.try_get::<String, _>(0)?);
        }
        fragments.push(format!("{}({})", table, columns.join(", ")));

        if config.include_sample_data {
            append_samples(&mut conn, table, &mut fragments).await?;
            append_foreign_keys(&mut conn, config, table, &mut fragments).await?;
        }
    }

    conn.close().await.ok();
    Ok(fragments)
}

async fn append_samples(
    conn: &mut MySqlConnection,
    table: &str,
    fragments: &mut Vec<String>,
) -> Result<(), sqlx::Error> {
    let select = format!("SELECT * FROM `{}` LIMIT 3", table);
    let rows = sqlx::query(&select).fetch_all(conn).await?;

    for row in &rows {
        let sample = row_to_map(row);
        fragments.push(format!(
            "  sample: {}",
            serde_json::to_string(&sample).unwrap_or_default()
        ));
    }
    Ok(())
}

async fn append_foreign_keys(
    conn: &mut MySqlConnection,
    config: &DatabaseConfig,
    table: &str,
    fragments: &mut Vec<String>,
) -> Result<(), sqlx::Error> {
    let rows = sqlx::query(FOREIGN_KEY_QUERY)
        .bind(&config.database)
        .bind(table)
        .fetch_all(conn)
        .await?;

    for row in &rows {
        let column: String = row.try_get(0)?;
        let referenced_table: String = row.try_get(1)?;
        let referenced_column: String = row.try_get(2)?;
        fragments.push(format!(
            "  {} -> {}({})",
            column, referenced_table, referenced_column
        ));
    }
    Ok(())
}
