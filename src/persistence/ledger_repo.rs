//! Assignment ledger repository for `SQLite` persistence.
//!
//! Owns both the assignment table (user → current task) and the per-user
//! completion counters. The insert-if-absent write in [`LedgerRepo::assign`]
//! is the sole enforcement point of the at-most-one-active-task invariant.

use std::sync::Arc;

use chrono::Utc;

use crate::models::assignment::Assignment;
use crate::models::stat::UserStat;
use crate::{AppError, Result};

use super::db::Database;

/// Repository wrapper around `SQLite` for assignments and user stats.
#[derive(Clone)]
pub struct LedgerRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct AssignmentRow {
    user_id: String,
    task_id: i64,
    assigned_at: String,
}

impl AssignmentRow {
    /// Convert a database row into the domain model.
    fn into_assignment(self) -> Result<Assignment> {
        let assigned_at = chrono::DateTime::parse_from_rfc3339(&self.assigned_at)
            .map_err(|e| AppError::Db(format!("invalid assigned_at: {e}")))?
            .with_timezone(&Utc);

        Ok(Assignment {
            user_id: self.user_id,
            task_id: self.task_id,
            assigned_at,
        })
    }
}

impl LedgerRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Whether the user currently holds an assignment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn has_active(&self, user_id: &str) -> Result<bool> {
        Ok(self.active(user_id).await?.is_some())
    }

    /// Retrieve the user's current assignment, if any.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn active(&self, user_id: &str) -> Result<Option<Assignment>> {
        let row: Option<AssignmentRow> =
            sqlx::query_as("SELECT * FROM assignment WHERE user_id = ?1")
                .bind(user_id)
                .fetch_optional(self.db.as_ref())
                .await?;

        row.map(AssignmentRow::into_assignment).transpose()
    }

    /// Record an assignment iff the user has none.
    ///
    /// Returns `true` when the row was inserted and `false` when the user
    /// already held an assignment (the write is a no-op, not a replace).
    /// The conflict-ignore insert is atomic, so the invariant holds under
    /// concurrent requests for the same user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn assign(&self, user_id: &str, task_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO assignment (user_id, task_id, assigned_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(task_id)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete the user's current assignment, if any. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn resolve(&self, user_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM assignment WHERE user_id = ?1")
            .bind(user_id)
            .execute(self.db.as_ref())
            .await?;

        Ok(())
    }

    /// Delete every assignment referencing a task.
    ///
    /// Cascade support for task deletion: running this before the task row
    /// delete means no dangling task reference can survive.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn resolve_all_for_task(&self, task_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM assignment WHERE task_id = ?1")
            .bind(task_id)
            .execute(self.db.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    /// Create the user's stat row with a zero count if absent. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn ensure_stat_row(&self, user_id: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO user_stat (user_id, completed_tasks) VALUES (?1, 0)")
            .bind(user_id)
            .execute(self.db.as_ref())
            .await?;

        Ok(())
    }

    /// Apply a ±1 grading delta to the user's completion count.
    ///
    /// The count is clamped at zero, and the stat row is created first when
    /// the user is unknown.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if either write fails.
    pub async fn adjust_stat(&self, user_id: &str, delta: i64) -> Result<()> {
        self.ensure_stat_row(user_id).await?;

        sqlx::query(
            "UPDATE user_stat SET completed_tasks = MAX(0, completed_tasks + ?1)
             WHERE user_id = ?2",
        )
        .bind(delta)
        .bind(user_id)
        .execute(self.db.as_ref())
        .await?;

        Ok(())
    }

    /// The user's completion count, 0 for unknown users.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get_stat(&self, user_id: &str) -> Result<i64> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT completed_tasks FROM user_stat WHERE user_id = ?1")
                .bind(user_id)
                .fetch_optional(self.db.as_ref())
                .await?;

        Ok(count.unwrap_or(0))
    }

    /// Top users by completion count, descending.
    ///
    /// Ties break on ascending user id so the ordering is deterministic.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn top_stats(&self, limit: u32) -> Result<Vec<UserStat>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT user_id, completed_tasks FROM user_stat
             ORDER BY completed_tasks DESC, user_id ASC LIMIT ?1",
        )
        .bind(i64::from(limit))
        .fetch_all(self.db.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, completed_tasks)| UserStat {
                user_id,
                completed_tasks,
            })
            .collect())
    }
}
