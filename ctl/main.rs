#![forbid(unsafe_code)]

//! `taskcaster-ctl` — local catalog companion for `taskcaster`.
//!
//! Operates directly on the bot's database so an operator can seed and
//! inspect the task catalog without going through Slack.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use taskcaster::engine::AssignmentEngine;
use taskcaster::persistence::db;
use taskcaster::Result;

const CTL_PAGE_SIZE: u32 = 10;

#[derive(Debug, Parser)]
#[command(
    name = "taskcaster-ctl",
    about = "Local catalog CLI for taskcaster",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the bot's SQLite database file.
    #[arg(long, default_value = "taskcaster.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Append a task to the catalog.
    Add {
        /// Task text (multiple words are joined with spaces).
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// List catalog tasks, one page at a time.
    List {
        /// Zero-based page index.
        #[arg(long, default_value_t = 0)]
        page: usize,
    },

    /// Delete a task by id, releasing any outstanding assignments.
    Delete {
        /// Catalog task id.
        id: i64,
    },

    /// Show the completed-task leaderboard.
    Top {
        /// Maximum number of entries.
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let pool = Arc::new(db::connect(&args.db).await?);
    let engine = AssignmentEngine::new(pool, CTL_PAGE_SIZE);

    match args.command {
        Command::Add { text } => {
            let task = engine.add_task(&text.join(" ")).await?;
            println!("added task #{}: {}", task.id, task.text);
        }
        Command::List { page } => {
            let page = engine.list_page(page).await?;
            if page.total == 0 {
                println!("catalog is empty");
            } else {
                println!(
                    "{} task(s), page {} of {}",
                    page.total,
                    page.page + 1,
                    page.total_pages
                );
                for task in &page.tasks {
                    println!("#{:<6} {}", task.id, task.text);
                }
            }
        }
        Command::Delete { id } => {
            if engine.delete_task(id).await? {
                println!("deleted task #{id}");
            } else {
                println!("task #{id} not found");
            }
        }
        Command::Top { limit } => {
            let top = engine.leaderboard(limit).await?;
            if top.is_empty() {
                println!("no users recorded yet");
            }
            for (rank, stat) in top.iter().enumerate() {
                println!("{:>3}. {} — {}", rank + 1, stat.user_id, stat.completed_tasks);
            }
        }
    }

    Ok(())
}
