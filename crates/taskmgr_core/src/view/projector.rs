//! Filter state and view projection.
//!
//! # Responsibility
//! - Own the display filter (`all|active|completed`).
//! - Derive the visible task list, counters and empty-state message.
//!
//! # Invariants
//! - Projection never mutates tasks and never persists anything.
//! - Filtered views keep the store's insertion order.
//! - Counters are computed over the unfiltered store, so
//!   `active + completed == total` always holds.

use crate::model::task::Task;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which tasks a view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter(pub String);

impl Display for UnknownFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown filter `{}`; expected all|active|completed",
            self.0
        )
    }
}

impl Error for UnknownFilter {}

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

/// Counts over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl Counters {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total: tasks.len(),
            active: tasks.len() - completed,
            completed,
        }
    }
}

/// Message shown in place of an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Active filter on a non-empty store where every task is done.
    AllDone,
    /// Completed filter with nothing completed.
    NothingCompleted,
    /// Store is empty.
    NoTasks,
}

impl EmptyState {
    /// Picks the message for an empty filtered view.
    pub fn select(filter: Filter, store_len: usize) -> Self {
        match filter {
            Filter::Active if store_len > 0 => Self::AllDone,
            Filter::Completed => Self::NothingCompleted,
            _ => Self::NoTasks,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::AllDone => "All tasks are done!",
            Self::NothingCompleted => "No completed tasks",
            Self::NoTasks => "No tasks yet",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::AllDone => "You accomplished everything!",
            Self::NothingCompleted => "Start checking off your tasks!",
            Self::NoTasks => "Add your first task above!",
        }
    }
}

/// Render-ready projection of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView<'a> {
    pub filter: Filter,
    pub tasks: Vec<&'a Task>,
    pub counters: Counters,
    /// Set exactly when `tasks` is empty.
    pub empty_state: Option<EmptyState>,
}

/// Store summary printed by the `stats` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub counters: Counters,
    pub filter: Filter,
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total tasks: {}", self.counters.total)?;
        writeln!(f, "Completed tasks: {}", self.counters.completed)?;
        writeln!(f, "Active tasks: {}", self.counters.active)?;
        write!(f, "Active filter: {}", self.filter)
    }
}

/// Holds the filter and projects views from a task slice.
#[derive(Debug, Clone, Default)]
pub struct ViewProjector {
    filter: Filter,
}

impl ViewProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Replaces the filter; no validation beyond the enum itself.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn project<'a>(&self, tasks: &'a [Task]) -> TaskView<'a> {
        let visible: Vec<&Task> = tasks
            .iter()
            .filter(|task| self.filter.matches(task))
            .collect();
        let empty_state = visible
            .is_empty()
            .then(|| EmptyState::select(self.filter, tasks.len()));

        TaskView {
            filter: self.filter,
            tasks: visible,
            counters: Counters::of(tasks),
            empty_state,
        }
    }

    pub fn stats(&self, tasks: &[Task]) -> Stats {
        Stats {
            counters: Counters::of(tasks),
            filter: self.filter,
        }
    }
}

/// True when leaving now would abandon unfinished work.
pub fn has_unfinished_tasks(tasks: &[Task]) -> bool {
    tasks.iter().any(Task::is_active)
}
