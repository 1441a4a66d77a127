//! Typed outcomes returned by the assignment engine.
//!
//! Expected results of user actions are data, not errors: the transport
//! layer matches on these to pick the message it renders. Only
//! infrastructure failures travel as [`crate::AppError`].

use serde::{Deserialize, Serialize};

use crate::models::task::Task;

/// Admin grading decision for a submitted task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Submission accepted; the user's count goes up by one.
    Pass,
    /// Submission rejected; the user's count goes down by one (clamped at zero).
    Fail,
}

impl Verdict {
    /// The stat delta this verdict applies.
    #[must_use]
    pub fn delta(self) -> i64 {
        match self {
            Self::Pass => 1,
            Self::Fail => -1,
        }
    }
}

/// Result of a user asking for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A task was drawn and the assignment recorded.
    Offered(Task),
    /// The user already holds an assignment.
    AlreadyAssigned,
    /// The catalog is empty.
    NoTasksAvailable,
}

/// Result of a user confirming an offered task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// The offer matches the live assignment; nothing changes in the ledger.
    Confirmed(Task),
    /// The control referenced an assignment that is no longer current.
    NotCurrent,
}

/// Result of a user turning down an offered task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclineOutcome {
    /// The assignment was deleted; the user may request again.
    Declined,
    /// The control referenced an assignment that is no longer current.
    NotCurrent,
}

/// Result of an admin grading a user's submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeOutcome {
    /// The assignment was resolved and the stat adjusted.
    Graded {
        /// Verdict that was applied.
        verdict: Verdict,
        /// The user's completion count after the adjustment.
        completed: i64,
    },
    /// The target user holds no assignment to grade.
    NothingToGrade,
}

/// One page of the task catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    /// Tasks on this page, in creation order.
    pub tasks: Vec<Task>,
    /// Zero-based page index, clamped to the last page.
    pub page: usize,
    /// Total number of pages; zero when the catalog is empty.
    pub total_pages: usize,
    /// Total number of tasks in the catalog.
    pub total: usize,
}
