//! Slack bridge layer modules.

use std::sync::Arc;

use crate::config::GlobalConfig;
use crate::engine::AssignmentEngine;

pub mod blocks;
pub mod client;
pub mod commands;
pub mod events;
pub mod handlers;

/// Shared application state injected into the Socket Mode listener.
///
/// Command and interaction handlers retrieve this through the listener's
/// user-state storage.
pub struct AppState {
    /// Global configuration.
    pub config: Arc<GlobalConfig>,
    /// Assignment engine over the shared pool.
    pub engine: AssignmentEngine,
    /// Slack client service with the buffered outbound queue.
    pub slack: Arc<client::SlackService>,
}
