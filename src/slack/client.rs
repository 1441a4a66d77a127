//! Slack Socket Mode client with a small buffered send queue.

use std::sync::Arc;
use std::time::Duration;

use slack_morphism::prelude::{
    SlackApiChatPostMessageRequest, SlackApiChatUpdateRequest, SlackApiToken, SlackApiTokenType,
    SlackApiTokenValue, SlackBlock, SlackChannelId, SlackClient,
    SlackClientEventsListenerEnvironment, SlackClientHyperHttpsConnector, SlackClientSession,
    SlackClientSocketModeConfig, SlackClientSocketModeListener, SlackMessageContent,
    SlackSocketModeListenerCallbacks, SlackTs,
};
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tracing::{error, info, warn};

use crate::slack::{commands, events, AppState};
use crate::{config::SlackConfig, AppError, Result};

const QUEUE_CAPACITY: usize = 256;
const RATE_LIMIT_FALLBACK_DELAY: Duration = Duration::from_secs(2);

/// Message to be delivered to Slack via chat.postMessage.
#[derive(Debug, Clone)]
pub struct SlackMessage {
    /// Destination channel.
    pub channel: SlackChannelId,
    /// Plain-text body, also the notification fallback when blocks are set.
    pub text: Option<String>,
    /// Optional Block Kit payload.
    pub blocks: Option<Vec<SlackBlock>>,
    /// Optional thread to reply into.
    pub thread_ts: Option<SlackTs>,
}

impl SlackMessage {
    /// Create a plain-text message for a channel.
    #[must_use]
    pub fn plain(channel: SlackChannelId, text: impl Into<String>) -> Self {
        Self {
            channel,
            text: Some(text.into()),
            blocks: None,
            thread_ts: None,
        }
    }

    /// Create a Block Kit message with a plain-text notification fallback.
    #[must_use]
    pub fn with_blocks(
        channel: SlackChannelId,
        text: impl Into<String>,
        blocks: Vec<SlackBlock>,
    ) -> Self {
        Self {
            channel,
            text: Some(text.into()),
            blocks: Some(blocks),
            thread_ts: None,
        }
    }

    fn into_request(self) -> SlackApiChatPostMessageRequest {
        let content = SlackMessageContent {
            text: self.text,
            blocks: self.blocks,
            attachments: None,
            upload: None,
            files: None,
            reactions: None,
            metadata: None,
        };

        SlackApiChatPostMessageRequest {
            channel: self.channel,
            content,
            as_user: None,
            icon_emoji: None,
            icon_url: None,
            link_names: Some(true),
            parse: None,
            thread_ts: self.thread_ts,
            username: None,
            reply_broadcast: None,
            unfurl_links: None,
            unfurl_media: None,
        }
    }
}

/// Slack Socket Mode wrapper that owns a buffered outgoing queue.
pub struct SlackService {
    client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    bot_token: SlackApiToken,
    app_token: SlackApiToken,
    queue_tx: mpsc::Sender<SlackMessage>,
}

impl SlackService {
    /// Create the Slack client and spawn the background sender task.
    ///
    /// Socket Mode is started separately via [`Self::start_socket_mode`]
    /// once the shared [`AppState`] (which holds this service) exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the HTTPS connector cannot be created.
    pub fn new(config: &SlackConfig) -> Result<(Self, JoinHandle<()>)> {
        let connector = SlackClientHyperHttpsConnector::new()
            .map_err(|err| AppError::Slack(format!("failed to init slack connector: {err}")))?;
        let client = Arc::new(SlackClient::new(connector));
        let bot_token = SlackApiToken {
            token_value: SlackApiTokenValue(config.bot_token.clone()),
            cookie: None,
            team_id: None,
            scope: None,
            token_type: Some(SlackApiTokenType::Bot),
        };
        let app_token = SlackApiToken {
            token_value: SlackApiTokenValue(config.app_token.clone()),
            cookie: None,
            team_id: None,
            scope: None,
            token_type: Some(SlackApiTokenType::App),
        };

        let (queue_tx, queue_rx) = mpsc::channel(QUEUE_CAPACITY);
        let queue_task = Self::spawn_worker(Arc::clone(&client), bot_token.clone(), queue_rx);

        info!("slack service created with buffered queue");

        Ok((
            Self {
                client,
                bot_token,
                app_token,
                queue_tx,
            },
            queue_task,
        ))
    }

    /// Enqueue a message for async delivery.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the message queue is full.
    pub async fn enqueue(&self, message: SlackMessage) -> Result<()> {
        self.queue_tx
            .send(message)
            .await
            .map_err(|err| AppError::Slack(format!("failed to enqueue slack message: {err}")))
    }

    /// Drain the queue: post each message once.
    ///
    /// A rate-limited post waits out Slack's `retry_after` and tries again;
    /// any other failure is logged and the message dropped, so one bad
    /// delivery never stalls the rest of the queue.
    fn spawn_worker(
        client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
        token: SlackApiToken,
        mut queue_rx: mpsc::Receiver<SlackMessage>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let session = client.open_session(&token);
            while let Some(message) = queue_rx.recv().await {
                let request = message.into_request();
                loop {
                    match session.chat_post_message(&request).await {
                        Ok(_) => break,
                        Err(slack_morphism::errors::SlackClientError::RateLimitError(rate)) => {
                            let delay = rate.retry_after.unwrap_or(RATE_LIMIT_FALLBACK_DELAY);
                            warn!(delay = ?delay, "slack rate limit; waiting before retry");
                            sleep(delay).await;
                        }
                        Err(error) => {
                            warn!(?error, "slack post failed; dropping message");
                            break;
                        }
                    }
                }
            }
            info!("slack sender task exiting");
        })
    }

    /// Start the Socket Mode listener with shared state injected.
    ///
    /// Inbound slash commands and interaction payloads are dispatched to
    /// [`commands::handle_command`] and [`events::handle_interaction`],
    /// which retrieve the [`AppState`] from the listener's user state.
    #[must_use]
    pub fn start_socket_mode(&self, state: Arc<AppState>) -> JoinHandle<()> {
        let listener_env = Arc::new(
            SlackClientEventsListenerEnvironment::new(Arc::clone(&self.client))
                .with_error_handler(|err, _client, _state| {
                    error!(?err, "socket mode error");
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR
                })
                .with_user_state(state),
        );
        let callbacks = SlackSocketModeListenerCallbacks::new()
            .with_hello_events(|event, _client, _state| async move {
                info!(?event, "socket hello");
            })
            .with_command_events(commands::handle_command)
            .with_interaction_events(events::handle_interaction)
            .with_push_events(|event, _client, _state| async move {
                info!(?event, "push event ignored");
                Ok(())
            });
        let config = SlackClientSocketModeConfig {
            max_connections_count: SlackClientSocketModeConfig::DEFAULT_CONNECTIONS_COUNT,
            debug_connections: SlackClientSocketModeConfig::DEFAULT_DEBUG_CONNECTIONS,
            initial_backoff_in_seconds:
                SlackClientSocketModeConfig::DEFAULT_INITIAL_BACKOFF_IN_SECONDS,
            reconnect_timeout_in_seconds:
                SlackClientSocketModeConfig::DEFAULT_RECONNECT_TIMEOUT_IN_SECONDS,
            ping_interval_in_seconds: SlackClientSocketModeConfig::DEFAULT_PING_INTERVAL_IN_SECONDS,
            ping_failure_threshold_times:
                SlackClientSocketModeConfig::DEFAULT_PING_FAILURE_THRESHOLD_TIMES,
        };

        let app_token = self.app_token.clone();
        let listener = SlackClientSocketModeListener::new(&config, listener_env, callbacks);
        tokio::spawn(async move {
            if let Err(error) = listener.listen_for(&app_token).await {
                error!(?error, "socket mode listen failed");
                return;
            }

            listener.serve().await;
            info!("socket mode listener exited");
        })
    }

    /// Create an HTTP session for direct API calls using the bot token.
    #[must_use]
    pub fn http_session(&self) -> SlackClientSession<'_, SlackClientHyperHttpsConnector> {
        self.client.open_session(&self.bot_token)
    }

    /// Update an existing Slack message (e.g., replace buttons with static text).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the Slack API call fails.
    pub async fn update_message(
        &self,
        channel: SlackChannelId,
        ts: SlackTs,
        blocks: Vec<SlackBlock>,
    ) -> Result<()> {
        let request = SlackApiChatUpdateRequest::new(
            channel,
            SlackMessageContent {
                text: None,
                blocks: Some(blocks),
                attachments: None,
                upload: None,
                files: None,
                reactions: None,
                metadata: None,
            },
            ts,
        );
        self.http_session()
            .chat_update(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to update message: {err}")))?;
        Ok(())
    }
}
