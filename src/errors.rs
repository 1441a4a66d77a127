//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all infrastructure failure modes.
///
/// Expected domain outcomes (a user who already holds a task, an empty
/// catalog, nothing to grade) are not errors; they are returned as typed
/// outcome enums from the engine.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Persistence failure when interacting with `SQLite`.
    Db(String),
    /// Slack API or Socket Mode failure.
    Slack(String),
    /// Malformed input, e.g. empty task text or a non-numeric task id.
    Validation(String),
    /// Requested entity does not exist.
    NotFound(String),
    /// Caller is not authorized to perform the requested action.
    Unauthorized(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Db(msg) => write!(f, "db: {msg}"),
            Self::Slack(msg) => write!(f, "slack: {msg}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(err.to_string())
    }
}
