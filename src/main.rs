#![forbid(unsafe_code)]

//! `taskcaster` — Slack task-assignment bot binary.
//!
//! Bootstraps configuration, the `SQLite` store, the Slack Socket Mode
//! integration, and the periodic announcement loop.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use taskcaster::broadcast::spawn_broadcast_task;
use taskcaster::config::GlobalConfig;
use taskcaster::engine::AssignmentEngine;
use taskcaster::persistence::db;
use taskcaster::slack::client::SlackService;
use taskcaster::slack::AppState;
use taskcaster::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "taskcaster", about = "Slack task-assignment bot", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the database path from the config file.
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("taskcaster server bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_from_path(&args.config)?;

    // Override database path from CLI if provided.
    if let Some(db_path) = args.db {
        config.db_path = db_path;
    }

    // Load Slack credentials from keyring / env vars.
    config.load_credentials().await?;

    let config = Arc::new(config);
    info!("configuration loaded");

    // ── Initialize database ─────────────────────────────
    let db = Arc::new(db::connect(&config.db_path).await?);
    info!("database connected");

    // ── Build shared application state ──────────────────
    let engine = AssignmentEngine::new(Arc::clone(&db), config.page_size);

    let (slack_service, queue_task) = SlackService::new(&config.slack)?;
    let slack = Arc::new(slack_service);
    info!("slack service started");

    let state = Arc::new(AppState {
        config: Arc::clone(&config),
        engine: engine.clone(),
        slack: Arc::clone(&slack),
    });

    // ── Start background tasks ──────────────────────────
    let ct = CancellationToken::new();

    let socket_task = slack.start_socket_mode(Arc::clone(&state));

    let broadcast_task = spawn_broadcast_task(
        engine,
        Arc::clone(&slack),
        Arc::clone(&config),
        ct.clone(),
    );

    info!("taskcaster ready");

    // ── Wait for shutdown signal ────────────────────────
    shutdown_signal().await;
    info!("shutdown signal received");
    ct.cancel();

    socket_task.abort();
    let _ = tokio::join!(broadcast_task);
    queue_task.abort();
    info!("taskcaster shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
