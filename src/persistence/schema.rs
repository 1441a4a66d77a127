//! `SQLite` schema bootstrap logic.
//!
//! All table definitions use `CREATE TABLE IF NOT EXISTS` — safe to
//! re-run on every server startup. Produces a convergent result.

use sqlx::SqlitePool;

use crate::Result;

/// Apply all table definitions to the connected `SQLite` database.
///
/// Creates all three tables idempotently. Safe to call on every startup.
///
/// The `user_id` primary key on `assignment` backs the at-most-one-active-
/// task invariant: inserts use `ON CONFLICT DO NOTHING`, so a user who
/// already holds a task cannot acquire a second one even under concurrent
/// requests.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS task (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    text            TEXT NOT NULL CHECK(length(text) > 0),
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS assignment (
    user_id         TEXT PRIMARY KEY NOT NULL,
    task_id         INTEGER NOT NULL,
    assigned_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_stat (
    user_id         TEXT PRIMARY KEY NOT NULL,
    completed_tasks INTEGER NOT NULL DEFAULT 0 CHECK(completed_tasks >= 0)
);

CREATE INDEX IF NOT EXISTS idx_assignment_task ON assignment(task_id);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
