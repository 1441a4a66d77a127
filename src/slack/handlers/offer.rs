//! Offer interaction handler.
//!
//! Handles Accept and Decline button presses on a task offer. The
//! dispatcher has already verified that the presser owns the offer; this
//! handler resolves the decision through the engine and replaces the
//! buttons with a static status line.

use std::sync::Arc;

use slack_morphism::prelude::{
    SlackBasicChannelInfo, SlackHistoryMessage, SlackInteractionActionInfo,
};
use tracing::info;

use crate::engine::{AcceptOutcome, DeclineOutcome};
use crate::slack::handlers::replace_message;
use crate::slack::{blocks, AppState};

/// Stale-control status line shown when the referenced assignment is gone.
const NOT_CURRENT: &str = "\u{26a0}\u{fe0f} This offer is no longer active.";

/// Process a single offer button action from Slack.
///
/// # Errors
///
/// Returns an error string if the action payload is malformed, the engine
/// fails, or the message cannot be updated.
pub async fn handle_offer_action(
    action: &SlackInteractionActionInfo,
    user_id: &str,
    channel: Option<&SlackBasicChannelInfo>,
    message: Option<&SlackHistoryMessage>,
    state: &Arc<AppState>,
) -> Result<(), String> {
    let action_id = action.action_id.to_string();
    let value = action
        .value
        .as_deref()
        .ok_or_else(|| "offer action missing value".to_owned())?;
    let (_, task_id) =
        parse_offer_value(value).ok_or_else(|| format!("malformed offer value: {value}"))?;

    let outcome = if action_id == "offer_accept" {
        state
            .engine
            .accept_task(user_id, task_id)
            .await
            .map(|outcome| match outcome {
                AcceptOutcome::Confirmed(task) => format!(
                    "\u{2705} <@{user_id}> accepted task #{}: {}\n\
                     Report your result in this channel; an admin grades it with `/grade`.",
                    task.id, task.text
                ),
                AcceptOutcome::NotCurrent => NOT_CURRENT.to_owned(),
            })
    } else if action_id == "offer_decline" {
        state
            .engine
            .decline_task(user_id, task_id)
            .await
            .map(|outcome| match outcome {
                DeclineOutcome::Declined => format!(
                    "\u{274c} <@{user_id}> declined the task. Run /task to draw another."
                ),
                DeclineOutcome::NotCurrent => NOT_CURRENT.to_owned(),
            })
    } else {
        return Err(format!("unknown offer action_id: {action_id}"));
    };

    let (status_text, failure) = match outcome {
        Ok(text) => (text, None),
        Err(err) => (
            format!("\u{274c} {}", crate::slack::commands::GENERIC_ERROR),
            Some(err.to_string()),
        ),
    };

    info!(action_id, user_id, task_id, "offer action resolved");

    replace_message(channel, message, state, vec![blocks::text_section(&status_text)]).await?;

    failure.map_or(Ok(()), Err)
}

/// Split an offer control value into `(owner_user_id, task_id)`.
#[must_use]
pub fn parse_offer_value(value: &str) -> Option<(String, i64)> {
    let (owner, task_id) = value.split_once(':')?;
    if owner.is_empty() {
        return None;
    }
    Some((owner.to_owned(), task_id.parse().ok()?))
}
