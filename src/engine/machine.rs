//! Assignment state machine over the task catalog and the ledger.

use std::sync::Arc;

use tracing::{debug, info};

use crate::models::stat::UserStat;
use crate::models::task::Task;
use crate::persistence::db::Database;
use crate::persistence::ledger_repo::LedgerRepo;
use crate::persistence::task_repo::TaskRepo;
use crate::Result;

use super::outcome::{
    AcceptOutcome, DeclineOutcome, GradeOutcome, RequestOutcome, TaskPage, Verdict,
};

/// The per-user task lifecycle: idle → offered/active → idle.
///
/// The only persisted state is "assignment exists". The assignment row is
/// written at offer time; accepting is a transport acknowledgment that
/// changes nothing here, while declining and grading free the slot. Every
/// operation re-reads the store, so no state is cached across calls.
#[derive(Clone)]
pub struct AssignmentEngine {
    tasks: TaskRepo,
    ledger: LedgerRepo,
    page_size: usize,
}

impl AssignmentEngine {
    /// Build an engine over a shared pool.
    #[must_use]
    pub fn new(db: Arc<Database>, page_size: u32) -> Self {
        Self {
            tasks: TaskRepo::new(Arc::clone(&db)),
            ledger: LedgerRepo::new(db),
            page_size: usize::try_from(page_size.max(1)).unwrap_or(10),
        }
    }

    /// Register a user with the bot. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the write fails.
    pub async fn register_user(&self, user_id: &str) -> Result<()> {
        self.ledger.ensure_stat_row(user_id).await
    }

    /// Draw a random task and assign it to the user.
    ///
    /// The assignment is written before the offer is rendered, so an
    /// unanswered offer still occupies the user's single slot. When two
    /// requests race for the same user, the loser of the conflict-ignore
    /// insert reports [`RequestOutcome::AlreadyAssigned`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if any store operation fails.
    pub async fn request_task(&self, user_id: &str) -> Result<RequestOutcome> {
        self.ledger.ensure_stat_row(user_id).await?;

        if self.ledger.has_active(user_id).await? {
            return Ok(RequestOutcome::AlreadyAssigned);
        }

        let Some(task) = self.tasks.random().await? else {
            return Ok(RequestOutcome::NoTasksAvailable);
        };

        if !self.ledger.assign(user_id, task.id).await? {
            return Ok(RequestOutcome::AlreadyAssigned);
        }

        info!(user_id, task_id = task.id, "task offered");
        Ok(RequestOutcome::Offered(task))
    }

    /// Confirm the user's offered task.
    ///
    /// No ledger mutation: the assignment was already recorded at offer
    /// time. Reports [`AcceptOutcome::NotCurrent`] when the control is
    /// stale: the assignment is gone, references a different task, or the
    /// task has since been deleted.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if any store operation fails.
    pub async fn accept_task(&self, user_id: &str, task_id: i64) -> Result<AcceptOutcome> {
        let Some(assignment) = self.ledger.active(user_id).await? else {
            return Ok(AcceptOutcome::NotCurrent);
        };
        if assignment.task_id != task_id {
            return Ok(AcceptOutcome::NotCurrent);
        }

        let Some(task) = self.tasks.get_by_id(task_id).await? else {
            return Ok(AcceptOutcome::NotCurrent);
        };

        debug!(user_id, task_id, "task accepted");
        Ok(AcceptOutcome::Confirmed(task))
    }

    /// Turn down the user's offered task, freeing the slot.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if any store operation fails.
    pub async fn decline_task(&self, user_id: &str, task_id: i64) -> Result<DeclineOutcome> {
        let Some(assignment) = self.ledger.active(user_id).await? else {
            return Ok(DeclineOutcome::NotCurrent);
        };
        if assignment.task_id != task_id {
            return Ok(DeclineOutcome::NotCurrent);
        }

        self.ledger.resolve(user_id).await?;
        info!(user_id, task_id, "task declined");
        Ok(DeclineOutcome::Declined)
    }

    /// Grade the user's active assignment and resolve it.
    ///
    /// Applies the verdict's ±1 delta (clamped at zero), deletes the
    /// assignment, and reports the new completion count.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if any store operation fails.
    pub async fn grade(&self, user_id: &str, verdict: Verdict) -> Result<GradeOutcome> {
        if !self.ledger.has_active(user_id).await? {
            return Ok(GradeOutcome::NothingToGrade);
        }

        self.ledger.adjust_stat(user_id, verdict.delta()).await?;
        self.ledger.resolve(user_id).await?;
        let completed = self.ledger.get_stat(user_id).await?;

        info!(user_id, ?verdict, completed, "task graded");
        Ok(GradeOutcome::Graded { verdict, completed })
    }

    /// Append a task to the catalog.
    ///
    /// Admin gating happens at the transport layer; the engine treats the
    /// caller's admin identity as a capability it was handed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for empty text and `AppError::Db` if
    /// the insert fails.
    pub async fn add_task(&self, text: &str) -> Result<Task> {
        let task = self.tasks.add(text).await?;
        info!(task_id = task.id, "task added");
        Ok(task)
    }

    /// Delete a task, cascade-resolving any assignments that reference it.
    ///
    /// Returns `false` when the id was absent (a no-op, not an error).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if any store operation fails.
    pub async fn delete_task(&self, id: i64) -> Result<bool> {
        let freed = self.ledger.resolve_all_for_task(id).await?;
        let existed = self.tasks.delete(id).await?;
        if existed {
            info!(task_id = id, freed, "task deleted");
        }
        Ok(existed)
    }

    /// One page of the catalog, page index clamped to the last page.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_page(&self, page: usize) -> Result<TaskPage> {
        let all = self.tasks.list_all().await?;
        let total = all.len();
        let total_pages = total.div_ceil(self.page_size);
        let page = if total_pages == 0 {
            0
        } else {
            page.min(total_pages - 1)
        };

        let tasks = all
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .collect();

        Ok(TaskPage {
            tasks,
            page,
            total_pages,
            total,
        })
    }

    /// The user's completion count.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn stat_for(&self, user_id: &str) -> Result<i64> {
        self.ledger.get_stat(user_id).await
    }

    /// Top users by completion count, ties broken by ascending user id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<UserStat>> {
        self.ledger.top_stats(limit).await
    }

    /// Whether the catalog has at least one task to offer.
    ///
    /// The broadcast loop's entry point.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn tasks_available(&self) -> Result<bool> {
        Ok(self.tasks.count().await? > 0)
    }
}
