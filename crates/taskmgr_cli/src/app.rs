//! Command dispatch between user input and the core service.
//!
//! # Responsibility
//! - Map parsed commands onto `TaskService` operations.
//! - Drive the two-step confirmation for destructive commands.
//! - Hold the view filter for the session.
//!
//! # Invariants
//! - Every mutation goes through `TaskService`; this layer only formats.
//! - A declined confirmation leaves the store untouched.

use crate::render::{render_notifications, render_view};
use clap::Subcommand;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use taskmgr_core::{
    has_unfinished_tasks, ConfirmationRequest, Filter, NotificationCenter, TaskId,
    TaskRepository, TaskService, ViewProjector,
};

/// Commands available both one-shot and inside the shell.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Action {
    /// Add a task (at least 3 characters).
    Add { text: Vec<String> },
    /// Mark a task completed, or active again.
    Toggle { id: TaskId },
    /// Delete one task.
    Delete {
        id: TaskId,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every completed task.
    ClearCompleted {
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every task.
    ClearAll {
        #[arg(short, long)]
        yes: bool,
    },
    /// Show tasks, optionally narrowed by a filter.
    List {
        #[arg(short, long)]
        filter: Option<Filter>,
    },
    /// Print store statistics.
    Stats,
}

/// Yes/no decision source for destructive commands.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Line-oriented prompt over any reader/writer pair.
pub struct Prompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `prompt` and reads one line; `None` on end of input.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}

impl<R: BufRead, W: Write> Confirm for Prompter<R, W> {
    /// Only `y` or `yes` (any case) approves; EOF and I/O errors decline.
    fn confirm(&mut self, prompt: &str) -> bool {
        match self.read_line(&format!("{prompt} [y/N] ")) {
            Ok(Some(answer)) => {
                matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
            }
            Ok(None) | Err(_) => false,
        }
    }
}

/// One session: the task service plus the view filter.
pub struct App<R: TaskRepository> {
    service: TaskService<R, NotificationCenter>,
    projector: ViewProjector,
}

impl<R: TaskRepository> App<R> {
    pub fn open(repo: R) -> Self {
        Self {
            service: TaskService::open(repo, NotificationCenter::new()),
            projector: ViewProjector::new(),
        }
    }

    pub fn service(&self) -> &TaskService<R, NotificationCenter> {
        &self.service
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.projector.set_filter(filter);
    }

    /// Runs one command and returns the text to print, excluding
    /// notifications.
    pub fn execute(&mut self, action: &Action, confirm: &mut dyn Confirm) -> String {
        match action {
            Action::Add { text } => {
                let _ = self.service.add(&text.join(" "));
                String::new()
            }
            Action::Toggle { id } => {
                if self.service.toggle_complete(*id).is_none() {
                    return format!("No task #{id}\n");
                }
                String::new()
            }
            Action::Delete { id, yes } => {
                let request = self.service.request_delete(*id);
                self.resolve(request, *yes, confirm);
                String::new()
            }
            Action::ClearCompleted { yes } => {
                if let Some(request) = self.service.request_clear_completed() {
                    self.resolve(request, *yes, confirm);
                }
                String::new()
            }
            Action::ClearAll { yes } => {
                if let Some(request) = self.service.request_clear_all() {
                    self.resolve(request, *yes, confirm);
                }
                String::new()
            }
            Action::List { filter } => {
                if let Some(filter) = filter {
                    self.projector.set_filter(*filter);
                }
                self.render()
            }
            Action::Stats => {
                format!("{}\n", self.projector.stats(self.service.tasks()))
            }
        }
    }

    pub fn render(&self) -> String {
        render_view(&self.projector.project(self.service.tasks()))
    }

    /// Drops expired notifications and renders the rest.
    pub fn take_notifications(&mut self, now: Instant) -> String {
        self.service.notifier_mut().prune(now);
        render_notifications(self.service.notifier(), now)
    }

    /// Number of active tasks if leaving now would abandon any.
    pub fn unfinished_count(&self) -> Option<usize> {
        has_unfinished_tasks(self.service.tasks()).then(|| self.service.counters().active)
    }

    fn resolve(&mut self, request: ConfirmationRequest, yes: bool, confirm: &mut dyn Confirm) {
        if yes || confirm.confirm(request.prompt()) {
            self.service.confirm(request);
        } else {
            self.service.cancel(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, App, Confirm, Prompter};
    use clap::Parser;
    use std::io::Cursor;
    use std::time::Instant;
    use taskmgr_core::{Filter, MemorySlotStore, SlotTaskRepository, TaskId};

    struct AssumeYes;

    impl Confirm for AssumeYes {
        fn confirm(&mut self, _prompt: &str) -> bool {
            true
        }
    }

    struct Scripted(Vec<bool>, Vec<String>);

    impl Confirm for Scripted {
        fn confirm(&mut self, prompt: &str) -> bool {
            self.1.push(prompt.to_string());
            self.0.remove(0)
        }
    }

    fn add(text: &str) -> Action {
        Action::Add {
            text: text.split(' ').map(str::to_string).collect(),
        }
    }

    #[test]
    fn add_joins_words_and_list_renders_row() {
        let store = MemorySlotStore::new();
        let mut app = App::open(SlotTaskRepository::new(&store));

        app.execute(&add("Buy oat milk"), &mut AssumeYes);
        let listed = app.execute(&Action::List { filter: None }, &mut AssumeYes);

        assert!(listed.contains("Buy oat milk"));
        assert!(listed.contains("All: 1  Active: 1  Completed: 0"));
    }

    #[test]
    fn add_without_text_is_parsed_and_warned() {
        #[derive(Debug, Parser)]
        #[command(no_binary_name = true)]
        struct Line {
            #[command(subcommand)]
            action: Action,
        }

        let parsed = Line::try_parse_from(["add"]).unwrap();
        assert_eq!(parsed.action, Action::Add { text: Vec::new() });

        let store = MemorySlotStore::new();
        let mut app = App::open(SlotTaskRepository::new(&store));
        app.execute(&parsed.action, &mut AssumeYes);

        assert!(app.service().tasks().is_empty());
        assert!(app
            .take_notifications(Instant::now())
            .contains("Please enter a task"));
    }

    #[test]
    fn declined_delete_keeps_task_and_shows_prompt() {
        let store = MemorySlotStore::new();
        let mut app = App::open(SlotTaskRepository::new(&store));
        app.execute(&add("keep this"), &mut AssumeYes);
        let id = app.service().tasks()[0].id;

        let mut script = Scripted(vec![false], Vec::new());
        app.execute(&Action::Delete { id, yes: false }, &mut script);

        assert_eq!(app.service().tasks().len(), 1);
        assert_eq!(script.1, vec!["Are you sure you want to delete this task?"]);
    }

    #[test]
    fn yes_flag_skips_prompt() {
        let store = MemorySlotStore::new();
        let mut app = App::open(SlotTaskRepository::new(&store));
        app.execute(&add("drop this"), &mut AssumeYes);

        let mut script = Scripted(Vec::new(), Vec::new());
        app.execute(&Action::ClearAll { yes: true }, &mut script);

        assert!(app.service().tasks().is_empty());
        assert!(script.1.is_empty());
    }

    #[test]
    fn toggle_unknown_id_reports_missing_task() {
        let store = MemorySlotStore::new();
        let mut app = App::open(SlotTaskRepository::new(&store));
        let out = app.execute(&Action::Toggle { id: TaskId::new(3) }, &mut AssumeYes);
        assert_eq!(out, "No task #3\n");
    }

    #[test]
    fn list_with_filter_updates_session_filter() {
        let store = MemorySlotStore::new();
        let mut app = App::open(SlotTaskRepository::new(&store));
        app.execute(
            &Action::List {
                filter: Some(Filter::Active),
            },
            &mut AssumeYes,
        );
        assert!(app.render().starts_with("Filter: active\n"));
    }

    #[test]
    fn prompter_accepts_only_yes_answers() {
        let mut out = Vec::new();
        let mut prompter = Prompter::new(Cursor::new("YES\nsure\n"), &mut out);
        assert!(prompter.confirm("Delete?"));
        assert!(!prompter.confirm("Delete?"));
        assert!(!prompter.confirm("Delete?"));
        drop(prompter);
        assert!(String::from_utf8(out).unwrap().starts_with("Delete? [y/N] "));
    }
}
