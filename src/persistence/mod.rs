//! Persistence layer modules.

pub mod db;
pub mod ledger_repo;
pub mod schema;
pub mod task_repo;

/// Re-export the database pool type for convenience.
pub use sqlx::SqlitePool;
