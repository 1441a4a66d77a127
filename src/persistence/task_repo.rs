//! Task catalog repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::Utc;

use crate::models::task::Task;
use crate::{AppError, Result};

use super::db::Database;

/// Repository wrapper around `SQLite` for task catalog records.
#[derive(Clone)]
pub struct TaskRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    text: String,
    created_at: String,
}

impl TaskRow {
    /// Convert a database row into the domain model.
    fn into_task(self) -> Result<Task> {
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| AppError::Db(format!("invalid created_at: {e}")))?
            .with_timezone(&Utc);

        Ok(Task {
            id: self.id,
            text: self.text,
            created_at,
        })
    }
}

impl TaskRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append a new task to the catalog and return it with its assigned id.
    ///
    /// Leading and trailing whitespace is trimmed before storage.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the trimmed text is empty and
    /// `AppError::Db` if the insert fails.
    pub async fn add(&self, text: &str) -> Result<Task> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("task text must not be empty".into()));
        }

        let created_at = Utc::now();
        let result = sqlx::query("INSERT INTO task (text, created_at) VALUES (?1, ?2)")
            .bind(trimmed)
            .bind(created_at.to_rfc3339())
            .execute(self.db.as_ref())
            .await?;

        Ok(Task {
            id: result.last_insert_rowid(),
            text: trimmed.to_owned(),
            created_at,
        })
    }

    /// Delete a task by id.
    ///
    /// Returns `false` when no task had that id (a no-op, not an error).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM task WHERE id = ?1")
            .bind(id)
            .execute(self.db.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Retrieve a task by id.
    ///
    /// Returns `Ok(None)` if the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM task WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.db.as_ref())
            .await?;

        row.map(TaskRow::into_task).transpose()
    }

    /// List all tasks in creation order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as("SELECT * FROM task ORDER BY id ASC")
            .fetch_all(self.db.as_ref())
            .await?;

        rows.into_iter().map(TaskRow::into_task).collect()
    }

    /// Number of tasks currently in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM task")
            .fetch_one(self.db.as_ref())
            .await?;

        Ok(count)
    }

    /// Draw one task uniformly at random.
    ///
    /// Each call is an independent draw; no fairness across calls. Returns
    /// `Ok(None)` when the catalog is empty.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn random(&self) -> Result<Option<Task>> {
        let row: Option<TaskRow> =
            sqlx::query_as("SELECT * FROM task ORDER BY RANDOM() LIMIT 1")
                .fetch_optional(self.db.as_ref())
                .await?;

        row.map(TaskRow::into_task).transpose()
    }
}
