//! `habitkit` command-line entry point.
//!
//! # Responsibility
//! - Resolve config, logging and database location.
//! - Dispatch habit commands to `habitkit_core::HabitService`.

use clap::{Parser, Subcommand};
use habitkit_core::config::default_config_path;
use habitkit_core::db::{open_db, Connection};
use habitkit_core::{
    init_logging, parse_check_in_date, Clock, FixedClock, HabitConfig, HabitService,
    SqliteHabitRepository, SystemClock,
};
use log::warn;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "habitkit", version, about = "Track daily habits and streaks")]
struct Cli {
    /// SQLite database file (overrides config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Pin "today" to a `YYYY-MM-DD` date instead of the local calendar date
    #[arg(long, global = true, hide = true)]
    today: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new habit
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// List habits with current streaks
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one habit
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Change habit name, description or color
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a habit and all of its check-ins
    Delete { id: String },
    /// Record today's check-in
    CheckIn { id: String },
    /// Remove today's check-in
    Undo { id: String },
    /// Summary across all habits
    Stats {
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = HabitConfig::load(&config_path)?;

    let log_dir = config.resolved_log_dir();
    if let Err(err) = init_logging(config.resolved_log_level(), &log_dir.to_string_lossy()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let db_path = cli.db.unwrap_or_else(|| config.resolved_db_path());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = open_db(&db_path)?;

    let result = match cli.today.as_deref() {
        Some(text) => {
            let today = parse_check_in_date(text)
                .map_err(|_| format!("invalid --today date `{text}`, expected YYYY-MM-DD"))?;
            run_command(&conn, FixedClock::new(today), cli.command)
        }
        None => run_command(&conn, SystemClock, cli.command),
    };
    if let Err(err) = &result {
        warn!("event=cli_command module=cli status=error error={err}");
    }
    result
}

fn run_command<C: Clock>(
    conn: &Connection,
    clock: C,
    command: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = SqliteHabitRepository::try_new(conn)?;
    let service = HabitService::new(repo, clock);
    commands::dispatch(&service, command)
}
