//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Nested Slack configuration for Socket Mode connectivity.
///
/// Tokens are loaded at runtime via OS keychain or environment variables,
/// never from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SlackConfig {
    /// Channels eligible to receive commands and broadcast announcements.
    pub channel_ids: Vec<String>,
    /// App-level token used for Socket Mode (populated at runtime).
    #[serde(skip)]
    pub app_token: String,
    /// Bot user token used for posting messages (populated at runtime).
    #[serde(skip)]
    pub bot_token: String,
}

/// Broadcast loop settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BroadcastConfig {
    /// Whether the periodic announcement loop runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between announcement rounds.
    #[serde(default = "default_broadcast_interval")]
    pub interval_seconds: u64,
    /// Announcement text posted to each configured channel.
    #[serde(default = "default_announcement")]
    pub announcement: String,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_broadcast_interval(),
            announcement: default_announcement(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_broadcast_interval() -> u64 {
    21_600
}

fn default_announcement() -> String {
    "A task is up for grabs — run /task to claim one. Run /start first if the bot does not know you yet.".into()
}

fn default_leaderboard_limit() -> u32 {
    10
}

fn default_page_size() -> u32 {
    10
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Path to the `SQLite` database file.
    pub db_path: PathBuf,
    /// Slack user IDs allowed to run catalog and grading commands.
    pub admin_user_ids: Vec<String>,
    /// Number of entries shown on the leaderboard.
    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: u32,
    /// Tasks per page in catalog listings.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Slack connectivity settings.
    pub slack: SlackConfig,
    /// Periodic announcement settings.
    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load Slack credentials from OS keychain with env-var fallback.
    ///
    /// Tries the `taskcaster` keyring service first, then falls back to
    /// `SLACK_APP_TOKEN` / `SLACK_BOT_TOKEN` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither keychain nor env vars provide
    /// the required tokens.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.slack.app_token = load_credential("slack_app_token", "SLACK_APP_TOKEN").await?;
        self.slack.bot_token = load_credential("slack_bot_token", "SLACK_BOT_TOKEN").await?;
        Ok(())
    }

    /// Validate that a Slack user may run admin-only commands.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` if the user is not in the admin list.
    pub fn ensure_admin(&self, user_id: &str) -> Result<()> {
        if self.is_admin(user_id) {
            Ok(())
        } else {
            Err(AppError::Unauthorized(
                "user is not in the admin list".into(),
            ))
        }
    }

    /// Whether a Slack user is in the admin allow-list.
    #[must_use]
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_user_ids.iter().any(|id| id == user_id)
    }

    /// Whether a channel is eligible for commands and broadcasts.
    #[must_use]
    pub fn is_registered_channel(&self, channel_id: &str) -> bool {
        self.slack.channel_ids.iter().any(|id| id == channel_id)
    }

    fn validate(&self) -> Result<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("db_path must not be empty".into()));
        }

        if self.admin_user_ids.is_empty() {
            return Err(AppError::Config("admin_user_ids must not be empty".into()));
        }

        if self.slack.channel_ids.is_empty() {
            return Err(AppError::Config(
                "slack.channel_ids must not be empty".into(),
            ));
        }

        if self.page_size == 0 {
            return Err(AppError::Config("page_size must be greater than zero".into()));
        }

        if self.broadcast.interval_seconds == 0 {
            return Err(AppError::Config(
                "broadcast.interval_seconds must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // Try OS keychain first via spawn_blocking (keyring is synchronous I/O).
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new("taskcaster", &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    // Fallback to environment variable.
    env::var(env_key).map_err(|_| {
        AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))
    })
}
