//! Catalog interaction handler.
//!
//! Handles pagination and per-task delete controls on admin catalog
//! views. The dispatcher has already verified that the presser is an
//! admin. After every action the message is re-rendered in place with the
//! refreshed page.

use std::sync::Arc;

use slack_morphism::prelude::{
    SlackBasicChannelInfo, SlackHistoryMessage, SlackInteractionActionInfo,
};
use tracing::info;

use crate::slack::handlers::replace_message;
use crate::slack::{blocks, AppState};

/// Process a catalog pagination or delete action from Slack.
///
/// # Errors
///
/// Returns an error string if the action payload is malformed, the engine
/// fails, or the message cannot be updated.
pub async fn handle_catalog_action(
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
        .ok_or_else(|| "catalog action missing value".to_owned())?;

    let (deletable, page) = if action_id == "task_delete" {
        let (task_id, page) = parse_delete_value(value)
            .ok_or_else(|| format!("malformed delete value: {value}"))?;
        match state.engine.delete_task(task_id).await {
            Ok(existed) => {
                info!(user_id, task_id, existed, "catalog delete action");
            }
            Err(err) => {
                let failure = format!("delete failed: {err}");
                let error_blocks = vec![blocks::severity_section(
                    "error",
                    crate::slack::commands::GENERIC_ERROR,
                )];
                replace_message(channel, message, state, error_blocks).await?;
                return Err(failure);
            }
        }
        (true, page)
    } else if action_id == "tasks_prev" || action_id == "tasks_next" {
        let (view, page) =
            parse_nav_value(value).ok_or_else(|| format!("malformed nav value: {value}"))?;
        info!(user_id, view = view.as_str(), page, "catalog nav action");
        (view == "delete", page)
    } else {
        return Err(format!("unknown catalog action_id: {action_id}"));
    };

    let page_data = state
        .engine
        .list_page(page)
        .await
        .map_err(|err| format!("failed to list catalog page: {err}"))?;

    replace_message(
        channel,
        message,
        state,
        blocks::catalog_blocks(&page_data, deletable),
    )
    .await
}

/// Split a delete control value into `(task_id, current_page)`.
#[must_use]
pub fn parse_delete_value(value: &str) -> Option<(i64, usize)> {
    let (task_id, page) = value.split_once(':')?;
    Some((task_id.parse().ok()?, page.parse().ok()?))
}

/// Split a navigation control value into `(view, target_page)`.
#[must_use]
pub fn parse_nav_value(value: &str) -> Option<(String, usize)> {
    let (view, page) = value.split_once(':')?;
    if view != "list" && view != "delete" {
        return None;
    }
    Some((view.to_owned(), page.parse().ok()?))
}
