//! `taskmgr` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open the slot database.
//! - Run one command, or the interactive shell.

mod app;
mod config;
mod render;
mod shell;

use app::{Action, App, Prompter};
use clap::{Parser, Subcommand};
use config::{Config, Overrides};
use log::{error, info};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use taskmgr_core::db::open_db;
use taskmgr_core::{init_logging, SlotTaskRepository, SqliteSlotStore};

#[derive(Debug, Parser)]
#[command(name = "taskmgr", version, about = "Local to-do list manager")]
struct Cli {
    /// Path to the task database file.
    #[arg(long = "db", global = true, env = "TASKMGR_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, env = "TASKMGR_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files.
    #[arg(long, global = true, env = "TASKMGR_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Config file (default: `<config dir>/taskmgr/config.toml`).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Action(Action),
    /// Start an interactive session.
    Shell,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let overrides = Overrides {
        config: cli.config.clone(),
        db_path: cli.db_path.clone(),
        log_level: cli.log_level.clone(),
        log_dir: cli.log_dir.clone(),
    };

    let config = match Config::load(&overrides) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Logging is best-effort.
    if let Err(err) = init_logging(&config.log_level, &absolute(&config.log_dir)) {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(&cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error");
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command, config: &Config) -> Result<(), String> {
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| {
                format!("failed to create data directory `{}`: {err}", parent.display())
            })?;
        }
    }
    let conn = open_db(&config.db_path)
        .map_err(|err| format!("failed to open `{}`: {err}", config.db_path.display()))?;
    let store = SqliteSlotStore::with_quota(&conn, config.max_value_bytes);
    let mut app = App::open(SlotTaskRepository::new(store));
    info!(
        "event=cli_open module=cli status=ok count={}",
        app.service().tasks().len()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());

    match command {
        Command::Shell => shell::run(&mut app, &mut prompter).map_err(|err| err.to_string()),
        Command::Action(action) => {
            info!("event=cli_command module=cli status=start");
            let output = app.execute(action, &mut prompter);
            let notifications = app.take_notifications(Instant::now());
            let out = prompter.output();
            write!(out, "{output}").map_err(|err| err.to_string())?;
            if !notifications.is_empty() {
                writeln!(out, "{notifications}").map_err(|err| err.to_string())?;
            }
            Ok(())
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
