//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record persisted in the task slot.
//! - Own text validation and creation-timestamp formatting.
//!
//! # Invariants
//! - `id` is stable for the task lifetime and unique inside one store.
//! - `text` is trimmed and at least `MIN_TASK_TEXT_CHARS` characters long.
//! - `created_at` is set once at creation and never rewritten.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum accepted task text length, in characters, after trimming.
pub const MIN_TASK_TEXT_CHARS: usize = 3;

/// `createdAt` layout, e.g. `19/10/2026 14:05`.
pub const CREATED_AT_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Stable numeric identifier of one task.
///
/// Serialized transparently as a JSON number to keep the persisted layout flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().trim_start_matches('#').parse().map(Self)
    }
}

/// Rejection reasons for user-supplied task text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Input is empty after trimming.
    EmptyText,
    /// Input has fewer than `MIN_TASK_TEXT_CHARS` characters after trimming.
    TextTooShort { chars: usize },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "Please enter a task"),
            Self::TextTooShort { .. } => write!(
                f,
                "Task must be at least {MIN_TASK_TEXT_CHARS} characters long"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    /// Local wall-clock creation time formatted with `CREATED_AT_FORMAT`.
    pub created_at: String,
}

impl Task {
    /// Creates an active task stamped with the current local time.
    ///
    /// Callers are expected to pass text already accepted by
    /// [`normalize_task_text`].
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self::with_created_at(id, text, format_created_at(&Local::now()))
    }

    /// Creates an active task with a caller-provided creation stamp.
    pub fn with_created_at(
        id: TaskId,
        text: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at: created_at.into(),
        }
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Trims raw input and checks the minimum length rule.
///
/// Returns the trimmed text on success.
pub fn normalize_task_text(raw: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyText);
    }
    let chars = trimmed.chars().count();
    if chars < MIN_TASK_TEXT_CHARS {
        return Err(TaskValidationError::TextTooShort { chars });
    }
    Ok(trimmed.to_string())
}

/// Formats a timestamp the way `createdAt` is persisted.
pub fn format_created_at<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(CREATED_AT_FORMAT).to_string()
}
