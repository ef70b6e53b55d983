//! Interactive session loop.
//!
//! `add` takes the rest of the line verbatim; every other line is parsed with
//! clap. After each command the view and any live notifications are redrawn.
//! Notifications expire on their own timers; the loop prunes them at every
//! redraw.

use crate::app::{Action, App, Confirm, Prompter};
use clap::{Parser, Subcommand};
use log::info;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use taskmgr_core::{Filter, TaskRepository};

const SHELL_PROMPT: &str = "taskmgr> ";

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    #[command(flatten)]
    Action(Action),
    /// Change which tasks are shown: all, active or completed.
    Filter { filter: Filter },
    /// Leave the shell.
    #[command(alias = "exit")]
    Quit,
}

/// Runs the shell until `quit` or end of input.
pub fn run<R, I, W>(app: &mut App<R>, prompter: &mut Prompter<I, W>) -> io::Result<()>
where
    R: TaskRepository,
    I: BufRead,
    W: Write,
{
    info!("event=shell_start module=cli status=ok");
    redraw(app, prompter)?;

    while let Some(line) = prompter.read_line(SHELL_PROMPT)? {
        if let Some(text) = add_text(&line) {
            let action = Action::Add {
                text: vec![text.to_string()],
            };
            let output = app.execute(&action, prompter);
            write!(prompter.output(), "{output}")?;
            redraw(app, prompter)?;
            continue;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(err) => {
                write!(prompter.output(), "{}", err.render())?;
                continue;
            }
        };

        match parsed.command {
            ShellCommand::Quit => {
                if confirm_quit(app, prompter) {
                    break;
                }
            }
            ShellCommand::Filter { filter } => app.set_filter(filter),
            ShellCommand::Action(action) => {
                let output = app.execute(&action, prompter);
                write!(prompter.output(), "{output}")?;
            }
        }
        redraw(app, prompter)?;
    }

    info!("event=shell_stop module=cli status=ok");
    Ok(())
}

/// Text after a leading `add` keyword, untouched apart from the keyword.
fn add_text(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("add")?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

fn confirm_quit<R, I, W>(app: &App<R>, prompter: &mut Prompter<I, W>) -> bool
where
    R: TaskRepository,
    I: BufRead,
    W: Write,
{
    match app.unfinished_count() {
        Some(active) => {
            prompter.confirm(&format!("You still have {active} active task(s). Quit anyway?"))
        }
        None => true,
    }
}

fn redraw<R, I, W>(app: &mut App<R>, prompter: &mut Prompter<I, W>) -> io::Result<()>
where
    R: TaskRepository,
    I: BufRead,
    W: Write,
{
    let notifications = app.take_notifications(Instant::now());
    let out = prompter.output();
    if !notifications.is_empty() {
        writeln!(out, "{notifications}")?;
    }
    write!(out, "{}", app.render())
}
