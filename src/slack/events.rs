//! Slack interaction dispatch handler.
//!
//! Receives interactive payloads (button presses) via Socket Mode, applies
//! the authorization guards, and dispatches to the appropriate handler by
//! `action_id` prefix.
//!
//! ## Authorization
//!
//! Offer controls may only be pressed by the offer's owner: the value
//! payload carries the owner's user id. Catalog controls (pagination,
//! delete) are admin-only. Failed guards drop the interaction silently
//! from the Slack user's perspective but log a security event.
//!
//! ## Double-Submission Prevention
//!
//! Once at least one action passes its guard, the original buttons are
//! replaced with a "Processing…" indicator via `chat.update` *before* the
//! handler executes, so concurrent taps on the same message are no-ops.

use std::sync::Arc;

use slack_morphism::prelude::{
    SlackBasicChannelInfo, SlackClient, SlackClientEventsUserState, SlackClientHyperHttpsConnector,
    SlackHistoryMessage, SlackInteractionActionInfo, SlackInteractionEvent,
};
use tracing::{info, warn};

use crate::slack::{blocks, handlers, AppState};

/// Whether the acting user may trigger this action.
///
/// Failed guards are logged here so the dispatch loop can drop the action
/// without further ceremony.
fn is_permitted(action: &SlackInteractionActionInfo, user_id: &str, state: &AppState) -> bool {
    let action_id = action.action_id.to_string();

    if action_id.starts_with("offer_") {
        let owner = action
            .value
            .as_deref()
            .and_then(|value| value.split(':').next())
            .unwrap_or_default();
        if owner == user_id {
            return true;
        }
        warn!(
            user_id,
            owner, "user pressed another user's offer control (silently ignored)"
        );
        return false;
    }

    if action_id.starts_with("tasks_") || action_id == "task_delete" {
        if state.config.is_admin(user_id) {
            return true;
        }
        warn!(
            user_id,
            action_id, "non-admin attempted catalog interaction (silently ignored)"
        );
        return false;
    }

    warn!(action_id, "unknown action_id prefix");
    false
}

/// Replace interactive buttons with a transient "Processing…" indicator.
///
/// This runs *before* the handler so that any concurrent taps on the same
/// message are no-ops from the user's perspective.
async fn replace_buttons_with_processing(
    channel: Option<&SlackBasicChannelInfo>,
    message: Option<&SlackHistoryMessage>,
    state: &AppState,
) {
    let msg_ts = message.map(|m| m.origin.ts.clone());
    let chan_id = channel.map(|c| c.id.clone());

    if let (Some(ts), Some(ch)) = (msg_ts, chan_id) {
        let processing_blocks = vec![blocks::text_section("\u{23f3} Processing\u{2026}")];
        if let Err(err) = state.slack.update_message(ch, ts, processing_blocks).await {
            // Non-fatal — the handler will still attempt its own update.
            warn!(%err, "failed to apply double-submission guard");
        }
    }
}

/// Handle interactive payloads (buttons) delivered via Socket Mode.
///
/// Applies the per-action authorization guard and double-submission
/// prevention before dispatching to the correct handler by `action_id`
/// prefix.
///
/// # Errors
///
/// Returns an error if the interaction cannot be processed.
pub async fn handle_interaction(
    event: SlackInteractionEvent,
    _client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    state: SlackClientEventsUserState,
) -> slack_morphism::UserCallbackResult<()> {
    // Extract shared AppState from the user state storage.
    let app_state: Option<Arc<AppState>> = {
        let guard = state.read().await;
        guard.get_user_state::<Arc<AppState>>().cloned()
    };

    match &event {
        SlackInteractionEvent::BlockActions(block_event) => {
            let user_id = block_event
                .user
                .as_ref()
                .map(|u| u.id.to_string())
                .unwrap_or_default();

            if user_id.is_empty() {
                warn!("block action with empty user ID; ignoring");
                return Ok(());
            }

            let Some(ref app) = app_state else {
                warn!("app state not available; cannot process interaction");
                return Ok(());
            };

            if let Some(actions) = &block_event.actions {
                let permitted: Vec<&SlackInteractionActionInfo> = actions
                    .iter()
                    .filter(|action| is_permitted(action, &user_id, app))
                    .collect();

                if permitted.is_empty() {
                    return Ok(());
                }

                // Replace buttons once before dispatching any actions so
                // concurrent taps cannot trigger a handler a second time.
                replace_buttons_with_processing(
                    block_event.channel.as_ref(),
                    block_event.message.as_ref(),
                    app,
                )
                .await;

                for action in permitted {
                    let action_id = action.action_id.to_string();
                    info!(action_id, user_id, "dispatching block action");

                    if action_id.starts_with("offer_") {
                        if let Err(err) = handlers::offer::handle_offer_action(
                            action,
                            &user_id,
                            block_event.channel.as_ref(),
                            block_event.message.as_ref(),
                            app,
                        )
                        .await
                        {
                            warn!(%err, action_id, "offer action failed");
                        }
                    } else if let Err(err) = handlers::catalog::handle_catalog_action(
                        action,
                        &user_id,
                        block_event.channel.as_ref(),
                        block_event.message.as_ref(),
                        app,
                    )
                    .await
                    {
                        warn!(%err, action_id, "catalog action failed");
                    }
                }
            }
        }
        _ => {
            info!(?event, "unhandled interaction event type");
        }
    }
    Ok(())
}
