//! Active assignment model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The task currently held by a user.
///
/// At most one assignment exists per user at any time; the ledger's
/// insert-if-absent write is the sole enforcement point of that invariant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Assignment {
    /// Slack user id of the assignee.
    pub user_id: String,
    /// Catalog id of the held task.
    pub task_id: i64,
    /// When the task was offered to the user.
    pub assigned_at: DateTime<Utc>,
}
