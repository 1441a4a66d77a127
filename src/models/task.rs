//! Task catalog entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short textual task stored in the catalog.
///
/// Immutable once created except for deletion. The id is assigned by the
/// store on insert and stays stable for the task's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    /// Unique catalog identifier.
    pub id: i64,
    /// Task body shown to the assignee. Never empty.
    pub text: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
