//! Slack slash command router.
//!
//! Resolves each slash command to an engine operation and renders the
//! outcome. Replies are ephemeral; anything that carries interactive
//! controls (task offers, catalog views) is posted to the channel through
//! the buffered send queue instead, so the controls survive as ordinary
//! channel messages.

use std::sync::Arc;

use slack_morphism::prelude::{
    SlackChannelId, SlackClient, SlackClientEventsUserState, SlackClientHyperHttpsConnector,
    SlackCommandEvent, SlackCommandEventResponse, SlackMessageContent, SlackMessageResponseType,
};
use tracing::{error, info, warn};

use crate::engine::{GradeOutcome, RequestOutcome, Verdict};
use crate::slack::client::SlackMessage;
use crate::slack::{blocks, AppState};
use crate::{AppError, Result};

/// Generic user-visible failure text for unexpected store errors.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again later.";

/// Handle incoming slash commands routed via Socket Mode.
///
/// # Errors
///
/// Returns an error if the command response cannot be constructed.
pub async fn handle_command(
    event: SlackCommandEvent,
    _client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    state: SlackClientEventsUserState,
) -> slack_morphism::AnyStdResult<SlackCommandEventResponse> {
    let app_state: Option<Arc<AppState>> = {
        let guard = state.read().await;
        guard.get_user_state::<Arc<AppState>>().cloned()
    };
    let Some(app) = app_state else {
        warn!("app state not available; cannot process command");
        return Ok(ephemeral(GENERIC_ERROR.into()));
    };

    let command = event.command.to_string();
    let user_id = event.user_id.to_string();
    let channel_id = event.channel_id.to_string();
    let text = event.text.clone().unwrap_or_default();

    info!(command, user_id, channel_id, "received slash command");

    if !app.config.is_registered_channel(&channel_id) {
        warn!(channel_id, user_id, "command from unregistered channel");
        return Ok(ephemeral(
            "This bot is not enabled in this channel.".into(),
        ));
    }

    let reply = match command.as_str() {
        "/start" => start(&app, &user_id).await,
        "/task" => request_task(&app, &user_id, &channel_id).await,
        "/stats" => stats(&app, &user_id).await,
        "/addtask" => add_task(&app, &user_id, &text).await,
        "/deletetask" => delete_task(&app, &user_id, &channel_id, &text).await,
        "/listtasks" | "/viewtasks" => list_tasks(&app, &user_id, &channel_id).await,
        "/grade" => grade(&app, &user_id, &channel_id, &text).await,
        _ => {
            warn!(command, "unknown slash command");
            Ok("Unknown command.".to_owned())
        }
    };

    let reply_text = match reply {
        Ok(text) => text,
        Err(err) => {
            error!(%err, command, user_id, "command handling failed");
            GENERIC_ERROR.to_owned()
        }
    };

    Ok(ephemeral(reply_text))
}

/// Register the user and greet them.
async fn start(app: &AppState, user_id: &str) -> Result<String> {
    app.engine.register_user(user_id).await?;
    Ok("Hi! I hand out tasks. Use /task to get one and /stats to see your score.".to_owned())
}

/// Draw a task and post the offer with accept/decline controls.
async fn request_task(app: &AppState, user_id: &str, channel_id: &str) -> Result<String> {
    match app.engine.request_task(user_id).await? {
        RequestOutcome::AlreadyAssigned => Ok("You already have an active task.".to_owned()),
        RequestOutcome::NoTasksAvailable => {
            Ok("No tasks are available right now. Check back later.".to_owned())
        }
        RequestOutcome::Offered(task) => {
            let message = SlackMessage::with_blocks(
                SlackChannelId(channel_id.to_owned()),
                format!("<@{user_id}>, your task: {}", task.text),
                blocks::offer_blocks(user_id, &task),
            );
            app.slack.enqueue(message).await?;
            Ok("Your task offer is posted in the channel.".to_owned())
        }
    }
}

/// Render the personal count plus the leaderboard.
async fn stats(app: &AppState, user_id: &str) -> Result<String> {
    let completed = app.engine.stat_for(user_id).await?;
    let top = app
        .engine
        .leaderboard(app.config.leaderboard_limit)
        .await?;
    Ok(blocks::stats_message(completed, &top))
}

/// Admin: append a task to the catalog.
async fn add_task(app: &AppState, user_id: &str, text: &str) -> Result<String> {
    if !app.config.is_admin(user_id) {
        warn!(user_id, "non-admin attempted /addtask");
        return Ok("This command is admin-only.".to_owned());
    }

    if text.trim().is_empty() {
        return Ok("Usage: /addtask <task text>".to_owned());
    }

    match app.engine.add_task(text).await {
        Ok(task) => Ok(format!("Task #{} added.", task.id)),
        Err(AppError::Validation(msg)) => Ok(format!("Invalid task: {msg}")),
        Err(err) => Err(err),
    }
}

/// Admin: delete by id, or post the interactive deletion view.
async fn delete_task(
    app: &AppState,
    user_id: &str,
    channel_id: &str,
    text: &str,
) -> Result<String> {
    if !app.config.is_admin(user_id) {
        warn!(user_id, "non-admin attempted /deletetask");
        return Ok("This command is admin-only.".to_owned());
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        let page = app.engine.list_page(0).await?;
        if page.total == 0 {
            return Ok("The task catalog is empty.".to_owned());
        }
        let message = SlackMessage::with_blocks(
            SlackChannelId(channel_id.to_owned()),
            "Task deletion view",
            blocks::catalog_blocks(&page, true),
        );
        app.slack.enqueue(message).await?;
        return Ok("Deletion view posted in the channel.".to_owned());
    }

    let Some(task_id) = parse_task_id(trimmed) else {
        return Ok("Task id must be a number, e.g. /deletetask 12".to_owned());
    };

    if app.engine.delete_task(task_id).await? {
        Ok(format!("Task #{task_id} deleted."))
    } else {
        Ok(format!("Task #{task_id} not found."))
    }
}

/// Admin: post the paginated catalog listing.
async fn list_tasks(app: &AppState, user_id: &str, channel_id: &str) -> Result<String> {
    if !app.config.is_admin(user_id) {
        warn!(user_id, "non-admin attempted /listtasks");
        return Ok("This command is admin-only.".to_owned());
    }

    let page = app.engine.list_page(0).await?;
    if page.total == 0 {
        return Ok("The task catalog is empty.".to_owned());
    }

    let message = SlackMessage::with_blocks(
        SlackChannelId(channel_id.to_owned()),
        "Task catalog",
        blocks::catalog_blocks(&page, false),
    );
    app.slack.enqueue(message).await?;
    Ok("Task list posted in the channel.".to_owned())
}

/// Admin: grade the target user's active assignment.
async fn grade(app: &AppState, user_id: &str, channel_id: &str, text: &str) -> Result<String> {
    if !app.config.is_admin(user_id) {
        warn!(user_id, "non-admin attempted /grade");
        return Ok("This command is admin-only.".to_owned());
    }

    let Some((verdict, target)) = parse_grade_args(text) else {
        return Ok("Usage: /grade pass|fail @user".to_owned());
    };

    match app.engine.grade(&target, verdict).await? {
        GradeOutcome::NothingToGrade => {
            Ok(format!("<@{target}> has no active task to grade."))
        }
        GradeOutcome::Graded { verdict, completed } => {
            let label = match verdict {
                Verdict::Pass => "passed",
                Verdict::Fail => "failed",
            };
            let message = SlackMessage::plain(
                SlackChannelId(channel_id.to_owned()),
                format!(
                    "<@{target}>, your submission was graded: {label}. \
                     You now have {completed} completed task(s)."
                ),
            );
            app.slack.enqueue(message).await?;
            Ok(format!("Graded: <@{target}> now has {completed} completed task(s)."))
        }
    }
}

/// Parse a catalog id from command text.
#[must_use]
pub fn parse_task_id(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Parse a grading verdict keyword.
#[must_use]
pub fn parse_verdict(token: &str) -> Option<Verdict> {
    match token.to_ascii_lowercase().as_str() {
        "pass" => Some(Verdict::Pass),
        "fail" => Some(Verdict::Fail),
        _ => None,
    }
}

/// Extract the user id from a Slack mention token (`<@U123>` or `<@U123|name>`).
#[must_use]
pub fn parse_mention(token: &str) -> Option<String> {
    let inner = token.strip_prefix("<@")?.strip_suffix('>')?;
    let user_id = inner.split('|').next().unwrap_or_default();
    if user_id.is_empty() {
        None
    } else {
        Some(user_id.to_owned())
    }
}

/// Parse `/grade` arguments: a verdict keyword followed by a mention.
#[must_use]
pub fn parse_grade_args(text: &str) -> Option<(Verdict, String)> {
    let mut parts = text.split_whitespace();
    let verdict = parse_verdict(parts.next()?)?;
    let target = parse_mention(parts.next()?)?;
    Some((verdict, target))
}

/// Build an ephemeral command response.
fn ephemeral(text: String) -> SlackCommandEventResponse {
    SlackCommandEventResponse {
        content: SlackMessageContent {
            text: Some(text),
            blocks: None,
            attachments: None,
            upload: None,
            files: None,
            reactions: None,
            metadata: None,
        },
        response_type: Some(SlackMessageResponseType::Ephemeral),
    }
}
