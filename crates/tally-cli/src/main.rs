//! `tally` — command-line client for the Tally server.
//!
//! # Usage
//!
//! ```text
//! tally --url http://localhost:5290 board
//! tally add-task "Read" --points 5 --quota 3
//! tally checkin Read --times 2
//! tally --config ~/.config/tally/config.toml stats
//! ```

mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::{ApiClient, CreateTask};
use rust_decimal::Decimal;
use serde::Deserialize;
use tally_core::task::{FrequencyType, Task, UNLIMITED};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:5290";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tally", about = "Command-line client for the Tally habit tracker")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the tally server (default: http://localhost:5290).
  #[arg(long, env = "TALLY_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List all tasks.
  Tasks,
  /// Create a task.
  AddTask {
    name:        String,
    /// Points per unit; negative for consumption.
    #[arg(long, allow_hyphen_values = true)]
    points:      Decimal,
    /// Units allowed per day; omit for unlimited.
    #[arg(long)]
    quota:       Option<i64>,
    /// daily, weekly, monthly or unspecified.
    #[arg(long, default_value = "daily")]
    frequency:   String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    tags:        Option<String>,
    /// Mark the task as a consumption (spending) task.
    #[arg(long)]
    consume:     bool,
  },
  /// Log a check-in against a task, by name or id.
  Checkin {
    task:  String,
    #[arg(long, default_value_t = 1)]
    times: i64,
    /// Day the check-in counts towards (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    date:  Option<NaiveDate>,
  },
  /// Today's tasks with their completion state.
  Board,
  /// Point totals, streak and the last fifteen days.
  Stats,
  /// Most recent check-ins, newest first.
  History {
    #[arg(long, default_value_t = 20)]
    limit: usize,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string());
  tracing::debug!(%base_url, "using server");

  let client = ApiClient::new(base_url)?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Tasks => {
      let tasks = client.list_tasks().await?;
      print!("{}", render::tasks(&tasks));
    }
    Command::AddTask {
      name,
      points,
      quota,
      frequency,
      description,
      tags,
      consume,
    } => {
      let task = client
        .create_task(&CreateTask {
          name,
          description,
          base_points: points,
          frequency_type: FrequencyType::parse(&frequency),
          frequency_max: quota.unwrap_or(UNLIMITED),
          is_consume: consume,
          tags,
        })
        .await?;
      println!("created {} ({})", task.name, task.task_id);
    }
    Command::Checkin { task, times, date } => {
      let tasks = client.list_tasks().await?;
      let task = resolve_task(&tasks, &task)?;
      let record = client.checkin(task.task_id, times, date).await?;
      print!("{}", render::checkin(task, &record));
    }
    Command::Board => {
      let board = client.board().await?;
      print!("{}", render::board(&board));
    }
    Command::Stats => {
      let stats = client.stats().await?;
      print!("{}", render::stats(&stats));
    }
    Command::History { limit } => {
      let (tasks, records) =
        tokio::try_join!(client.list_tasks(), client.history(limit))?;
      print!("{}", render::history(&tasks, &records));
    }
  }
  Ok(())
}

/// Find a task by id, or else by case-insensitive name.
fn resolve_task<'a>(tasks: &'a [Task], needle: &str) -> Result<&'a Task> {
  if let Ok(id) = needle.parse::<Uuid>() {
    return tasks
      .iter()
      .find(|t| t.task_id == id)
      .ok_or_else(|| anyhow!("no task with id {id}"));
  }

  let mut matches = tasks.iter().filter(|t| t.name.eq_ignore_ascii_case(needle));
  match (matches.next(), matches.next()) {
    (Some(task), None) => Ok(task),
    (Some(_), Some(_)) => Err(anyhow!("{needle:?} names more than one task; use its id")),
    (None, _) => Err(anyhow!("no task named {needle:?}")),
  }
}
