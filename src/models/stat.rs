//! Per-user completion counter model.

use serde::{Deserialize, Serialize};

/// Lifetime completed-task count for a single user.
///
/// Created on first interaction with the bot and never deleted. The count
/// moves by ±1 on grading events and is clamped so it never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct UserStat {
    /// Slack user id.
    pub user_id: String,
    /// Number of tasks graded as passed, net of failures. Never negative.
    pub completed_tasks: i64,
}
