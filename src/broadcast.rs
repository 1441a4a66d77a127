//! Periodic task-availability announcements.
//!
//! Runs as a background task on a fixed interval. Each round asks the
//! engine whether the catalog has anything to offer and, if so, enqueues
//! the announcement to every registered channel. A failure for one
//! channel never aborts delivery to the remaining channels, and a failed
//! round is skipped, not retried.

use std::sync::Arc;
use std::time::Duration;

use slack_morphism::prelude::SlackChannelId;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::GlobalConfig;
use crate::engine::AssignmentEngine;
use crate::slack::client::{SlackMessage, SlackService};

/// Spawn the announcement background task.
///
/// The first round fires immediately, then every
/// `broadcast.interval_seconds`. Returns a handle that completes when the
/// token is cancelled (or immediately when broadcasting is disabled).
#[must_use]
pub fn spawn_broadcast_task(
    engine: AssignmentEngine,
    slack: Arc<SlackService>,
    config: Arc<GlobalConfig>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if !config.broadcast.enabled {
            info!("broadcast loop disabled by config");
            return;
        }

        let mut interval =
            tokio::time::interval(Duration::from_secs(config.broadcast.interval_seconds));
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("broadcast loop shutting down");
                    break;
                }
                _ = interval.tick() => {
                    announce(&engine, &slack, &config).await;
                }
            }
        }
    })
}

/// Run one announcement round across all registered channels.
async fn announce(engine: &AssignmentEngine, slack: &SlackService, config: &GlobalConfig) {
    match engine.tasks_available().await {
        Ok(true) => {}
        Ok(false) => {
            debug!("catalog empty; skipping announcement round");
            return;
        }
        Err(err) => {
            error!(?err, "availability check failed; skipping announcement round");
            return;
        }
    }

    for channel in &config.slack.channel_ids {
        let message = SlackMessage::plain(
            SlackChannelId(channel.clone()),
            config.broadcast.announcement.clone(),
        );
        if let Err(err) = slack.enqueue(message).await {
            // Per-channel isolation: log and move on to the next channel.
            warn!(%err, channel, "failed to enqueue announcement");
        }
    }

    info!(
        channels = config.slack.channel_ids.len(),
        "announcement round enqueued"
    );
}
