//! Slack interaction handler sub-modules.

pub mod catalog;
pub mod offer;

use slack_morphism::prelude::{SlackBasicChannelInfo, SlackHistoryMessage};

use crate::slack::AppState;

/// Replace an interactive message with a final status line.
///
/// Missing coordinates (no channel or message timestamp in the payload)
/// and failed updates are logged by the caller; this helper only reports
/// whether the update could be attempted.
pub(crate) async fn replace_message(
    channel: Option<&SlackBasicChannelInfo>,
    message: Option<&SlackHistoryMessage>,
    state: &AppState,
    blocks: Vec<slack_morphism::prelude::SlackBlock>,
) -> Result<(), String> {
    let msg_ts = message.map(|m| m.origin.ts.clone());
    let chan_id = channel.map(|c| c.id.clone());

    let (Some(ts), Some(ch)) = (msg_ts, chan_id) else {
        return Err("missing message ts or channel; cannot update message".into());
    };

    state
        .slack
        .update_message(ch, ts, blocks)
        .await
        .map_err(|err| format!("failed to update message: {err}"))
}
