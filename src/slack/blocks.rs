//! Slack Block Kit message builders.
//!
//! Provides helpers for constructing interactive Slack messages: task
//! offers with accept/decline buttons, paginated catalog views with
//! delete controls, and plain formatted text.

use slack_morphism::prelude::{
    SlackActionBlockElement, SlackActionsBlock, SlackBlock, SlackBlockButtonElement, SlackBlockId,
    SlackBlockPlainTextOnly, SlackBlockText, SlackSectionBlock,
};

use crate::engine::TaskPage;
use crate::models::stat::UserStat;
use crate::models::task::Task;

/// Build a severity-formatted section block.
#[must_use]
pub fn severity_section(level: &str, message: &str) -> SlackBlock {
    let prefix = match level {
        "success" => "\u{2705}",
        "warning" => "\u{26a0}\u{fe0f}",
        "error" => "\u{274c}",
        _ => "\u{2139}\u{fe0f}",
    };
    SlackBlock::Section(SlackSectionBlock::new().with_text(SlackBlockText::MarkDown(
        format!("{prefix} {message}").into(),
    )))
}

/// Build a plain text section block.
#[must_use]
pub fn text_section(text: &str) -> SlackBlock {
    SlackBlock::Section(SlackSectionBlock::new().with_text(SlackBlockText::MarkDown(text.into())))
}

/// Build an actions block with the given buttons.
#[must_use]
pub fn action_buttons(block_id: &str, buttons: &[(&str, &str, &str)]) -> SlackBlock {
    let elements: Vec<SlackActionBlockElement> = buttons
        .iter()
        .map(|(action_id, text, value)| {
            SlackActionBlockElement::Button(
                SlackBlockButtonElement::new(
                    (*action_id).into(),
                    SlackBlockPlainTextOnly::from(*text),
                )
                .with_value((*value).into()),
            )
        })
        .collect();
    SlackBlock::Actions(
        SlackActionsBlock::new(elements).with_block_id(SlackBlockId(block_id.into())),
    )
}

/// Build offer action buttons (Accept / Decline) scoped to one assignment.
///
/// The value carries `user_id:task_id` so the interaction handler can
/// verify that the presser owns the offer and that the control is still
/// current.
#[must_use]
pub fn offer_buttons(user_id: &str, task_id: i64) -> SlackBlock {
    let value = format!("{user_id}:{task_id}");
    action_buttons(
        &format!("offer_{user_id}"),
        &[
            ("offer_accept", "Accept", &value),
            ("offer_decline", "Decline", &value),
        ],
    )
}

/// Build the full task offer message.
#[must_use]
pub fn offer_blocks(user_id: &str, task: &Task) -> Vec<SlackBlock> {
    vec![
        text_section(&format!("<@{user_id}>, your task: {}", task.text)),
        offer_buttons(user_id, task.id),
    ]
}

/// Build a paginated catalog view.
///
/// With `deletable` set, each task row gets a Delete control (the admin
/// deletion view); otherwise the view is a plain listing. Navigation
/// buttons carry `view:page` values so the pagination handler can
/// re-render the same view kind on the target page.
#[must_use]
pub fn catalog_blocks(page: &TaskPage, deletable: bool) -> Vec<SlackBlock> {
    if page.total == 0 {
        return vec![text_section("The task catalog is empty.")];
    }

    let view = if deletable { "delete" } else { "list" };
    let mut out = vec![text_section(&format!(
        "*Task catalog* — {} task(s), page {} of {}",
        page.total,
        page.page + 1,
        page.total_pages,
    ))];

    for task in &page.tasks {
        out.push(text_section(&format!("`#{}` {}", task.id, task.text)));
        if deletable {
            let value = format!("{}:{}", task.id, page.page);
            out.push(action_buttons(
                &format!("catalog_task_{}", task.id),
                &[("task_delete", "Delete", &value)],
            ));
        }
    }

    let mut nav: Vec<(&str, &str, String)> = Vec::new();
    if page.page > 0 {
        nav.push(("tasks_prev", "Previous", format!("{view}:{}", page.page - 1)));
    }
    if page.page + 1 < page.total_pages {
        nav.push(("tasks_next", "Next", format!("{view}:{}", page.page + 1)));
    }
    if !nav.is_empty() {
        let nav_refs: Vec<(&str, &str, &str)> = nav
            .iter()
            .map(|(id, text, value)| (*id, *text, value.as_str()))
            .collect();
        out.push(action_buttons("catalog_nav", &nav_refs));
    }

    out
}

/// Format the personal stats reply with the leaderboard appended.
#[must_use]
pub fn stats_message(completed: i64, top: &[UserStat]) -> String {
    let mut out = format!("You have {completed} completed task(s).");
    if !top.is_empty() {
        out.push_str("\n\n*Leaderboard*");
        for (rank, stat) in top.iter().enumerate() {
            out.push_str(&format!(
                "\n{}. <@{}> — {}",
                rank + 1,
                stat.user_id,
                stat.completed_tasks
            ));
        }
    }
    out
}
