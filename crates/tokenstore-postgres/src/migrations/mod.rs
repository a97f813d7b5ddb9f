//! Database migration management for the PostgreSQL token store.
//!
//! Migrations are built in code rather than read from disk: the `tokens`
//! table DDL is rendered from [`TOKENS_TABLE`], so the schema and the
//! validation limits share one definition.

use std::borrow::Cow;

use sqlx_core::migrate::{Migration, MigrationType, Migrator};
use sqlx_postgres::PgPool;
use tokenstore_core::schema::COLUMN_TYPE;
use tokenstore_core::{ColumnType, TOKENS_TABLE, TableDef};
use tracing::{info, instrument};

use crate::error::{PostgresError, Result};
use crate::query::{QueryBuildError, escape_identifier};

/// Renders `CREATE TABLE IF NOT EXISTS` for a table description.
///
/// # Errors
///
/// Fails if the table or a column name is not a plain identifier.
pub fn create_table_sql(table: &TableDef) -> std::result::Result<String, QueryBuildError> {
    let mut columns = Vec::with_capacity(table.columns.len());
    for column in table.columns {
        let sql_type = match column.column_type {
            ColumnType::Varchar(len) => format!("VARCHAR({len})"),
            ColumnType::BigInt => "BIGINT".to_string(),
        };
        let mut line = format!("    {} {sql_type}", escape_identifier(column.name)?);
        if column.primary_key {
            line.push_str(" PRIMARY KEY");
        } else if !column.nullable {
            line.push_str(" NOT NULL");
        }
        columns.push(line);
    }

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        escape_identifier(table.name)?,
        columns.join(",\n")
    ))
}

/// Renders `CREATE INDEX IF NOT EXISTS idx_<table>_<column>`.
pub fn create_index_sql(
    table: &TableDef,
    column: &str,
) -> std::result::Result<String, QueryBuildError> {
    if table.column(column).is_none() {
        return Err(QueryBuildError::UnknownColumn {
            table: table.name.to_string(),
            column: column.to_string(),
        });
    }
    Ok(format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
        escape_identifier(&format!("idx_{}_{}", table.name, column))?,
        escape_identifier(table.name)?,
        escape_identifier(column)?
    ))
}

fn migration(version: i64, description: &'static str, sql: String) -> Migration {
    Migration {
        version,
        description: Cow::Borrowed(description),
        migration_type: MigrationType::Simple,
        sql: Cow::Owned(sql),
        checksum: Cow::Borrowed(&[]), // Empty checksum for generated migrations
        no_tx: false,
    }
}

/// Builds the ordered list of migrations.
///
/// Add new migrations at the end with a higher version.
fn build_migrations() -> std::result::Result<Vec<Migration>, QueryBuildError> {
    Ok(vec![
        migration(
            20240601000001,
            "create_tokens",
            create_table_sql(&TOKENS_TABLE)?,
        ),
        migration(
            20240601000002,
            "index_tokens_type",
            create_index_sql(&TOKENS_TABLE, COLUMN_TYPE)?,
        ),
    ])
}

/// Runs all pending database migrations.
///
/// Applied versions are tracked in `_sqlx_migrations`; each migration runs
/// in its own transaction.
///
/// # Errors
///
/// Returns an error if a migration fails to execute.
#[instrument(skip(pool))]
pub async fn run(pool: &PgPool) -> Result<()> {
    info!("Running database migrations (embedded)");

    let migrations = build_migrations().map_err(|e| PostgresError::Migration(e.to_string()))?;
    info!("Found {} migration(s) to apply", migrations.len());

    let migrator = Migrator {
        migrations: Cow::Owned(migrations),
        ignore_missing: false,
        locking: true,
        no_tx: false,
    };

    migrator
        .run(pool)
        .await
        .map_err(|e| PostgresError::Migration(format!("Migration failed: {e}")))?;

    info!("Database migrations completed successfully");

    Ok(())
}
