//! `SQLite` connection pool bootstrap.

use std::fs;
use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::{AppError, Result};

use super::schema;

/// Alias for the shared `SQLite` connection pool.
pub type Database = SqlitePool;

/// Connect to the `SQLite` database file and apply the schema.
///
/// Creates the file (and any missing parent directories) on first run.
///
/// # Errors
///
/// Returns `AppError::Db` if the connection or schema application fails.
pub async fn connect(db_path: &Path) -> Result<Database> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| AppError::Db(format!("failed to create db dir: {err}")))?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    schema::bootstrap_schema(&pool).await?;
    Ok(pool)
}

/// Connect to an in-memory database (tests) and apply the schema.
///
/// The pool is capped at a single connection, since each `SQLite` in-memory
/// connection is its own database.
///
/// # Errors
///
/// Returns `AppError::Db` if the connection or schema application fails.
pub async fn connect_memory() -> Result<Database> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    schema::bootstrap_schema(&pool).await?;
    Ok(pool)
}
