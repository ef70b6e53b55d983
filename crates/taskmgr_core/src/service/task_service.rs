//! Task use-case service.
//!
//! # Responsibility
//! - Own the in-memory task store and route every mutation through it.
//! - Persist the whole store after each mutation.
//! - Report outcomes through a `Notifier`.
//!
//! # Invariants
//! - Task ids are unique; new ids come from a monotonic allocator.
//! - A failed save never rolls back the in-memory store.
//! - A failed load starts the session with an empty store.
//! - Destructive operations mutate only through `confirm`.

use crate::model::task::{normalize_task_text, Task, TaskId, TaskValidationError};
use crate::notify::{Notifier, Severity};
use crate::repo::task_repo::TaskRepository;
use crate::service::confirmation::{ConfirmationRequest, PendingAction};
use crate::view::projector::Counters;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MSG_ADDED: &str = "Task added";
const MSG_COMPLETED: &str = "Task completed";
const MSG_REACTIVATED: &str = "Task reactivated";
const MSG_DELETED: &str = "Task deleted";
const MSG_NO_COMPLETED: &str = "No completed tasks to delete";
const MSG_NO_TASKS: &str = "No tasks to delete";
const MSG_ALL_DELETED: &str = "All tasks deleted";
const MSG_SAVE_FAILED: &str = "Failed to save tasks";

/// Rejections returned to callers of task operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    Validation(TaskValidationError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Single owner of the task store for one session.
pub struct TaskService<R: TaskRepository, N: Notifier> {
    tasks: Vec<Task>,
    repo: R,
    notifier: N,
    next_id: u64,
}

impl<R: TaskRepository, N: Notifier> TaskService<R, N> {
    /// Rehydrates the store from `repo`.
    ///
    /// Missing, unreadable or corrupted persisted state yields an empty store;
    /// no notification is emitted for it.
    pub fn open(repo: R, notifier: N) -> Self {
        let tasks = match repo.load_tasks() {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    "event=tasks_load module=service status=recovered action=reset_empty error={}",
                    err
                );
                Vec::new()
            }
        };
        Self::with_tasks(repo, notifier, tasks)
    }

    fn with_tasks(repo: R, notifier: N, tasks: Vec<Task>) -> Self {
        let next_id = tasks
            .iter()
            .map(|task| task.id.get())
            .max()
            .map_or(1, |max| max.saturating_add(1));
        info!(
            "event=service_open module=service status=ok count={} next_id={}",
            tasks.len(),
            next_id
        );
        Self {
            tasks,
            repo,
            notifier,
            next_id,
        }
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn counters(&self) -> Counters {
        Counters::of(&self.tasks)
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Validates `raw`, appends a new active task and persists.
    ///
    /// # Errors
    /// - `ServiceError::Validation` when the trimmed text is empty or shorter
    ///   than three characters; the store is unchanged and a warning is
    ///   emitted.
    pub fn add(&mut self, raw: &str) -> Result<TaskId, ServiceError> {
        let text = match normalize_task_text(raw) {
            Ok(text) => text,
            Err(err) => {
                debug!(
                    "event=task_add module=service status=rejected reason={:?}",
                    err
                );
                self.notifier.notify(&err.to_string(), Severity::Warning);
                return Err(err.into());
            }
        };

        let id = self.allocate_id();
        let text_chars = text.chars().count();
        self.tasks.push(Task::new(id, text));
        info!(
            "event=task_add module=service status=ok task_id={} text_chars={}",
            id, text_chars
        );
        self.persist();
        self.notifier.notify(MSG_ADDED, Severity::Success);
        Ok(id)
    }

    /// Flips completion of `id`.
    ///
    /// Returns the new completion state, or `None` when no task has `id`.
    pub fn toggle_complete(&mut self, id: TaskId) -> Option<bool> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_toggle module=service status=noop task_id={id}");
            return None;
        };
        let completed = task.toggle();
        info!("event=task_toggle module=service status=ok task_id={id} completed={completed}");

        self.persist();
        let message = if completed {
            MSG_COMPLETED
        } else {
            MSG_REACTIVATED
        };
        self.notifier.notify(message, Severity::Info);
        Some(completed)
    }

    /// Proposes deleting `id`; nothing changes until the request is confirmed.
    pub fn request_delete(&self, id: TaskId) -> ConfirmationRequest {
        ConfirmationRequest::new(PendingAction::DeleteOne(id))
    }

    /// Proposes removing every completed task.
    ///
    /// Returns `None`, after an informational notification, when no task is
    /// completed.
    pub fn request_clear_completed(&mut self) -> Option<ConfirmationRequest> {
        let count = self.counters().completed;
        if count == 0 {
            self.notifier.notify(MSG_NO_COMPLETED, Severity::Info);
            return None;
        }
        Some(ConfirmationRequest::new(PendingAction::ClearCompleted { count }))
    }

    /// Proposes emptying the store.
    ///
    /// Returns `None`, after an informational notification, when the store is
    /// already empty.
    pub fn request_clear_all(&mut self) -> Option<ConfirmationRequest> {
        if self.tasks.is_empty() {
            self.notifier.notify(MSG_NO_TASKS, Severity::Info);
            return None;
        }
        Some(ConfirmationRequest::new(PendingAction::ClearAll {
            count: self.tasks.len(),
        }))
    }

    /// Applies an approved request against the current store.
    ///
    /// Returns the number of tasks removed. The action is re-evaluated, so a
    /// request that went stale (task already gone, nothing completed any more)
    /// removes nothing.
    pub fn confirm(&mut self, request: ConfirmationRequest) -> usize {
        match request.action() {
            PendingAction::DeleteOne(id) => self.delete_one(id),
            PendingAction::ClearCompleted { .. } => self.clear_completed(),
            PendingAction::ClearAll { .. } => self.clear_all(),
        }
    }

    /// Drops a request without touching the store.
    pub fn cancel(&self, request: ConfirmationRequest) {
        debug!(
            "event=confirmation module=service status=cancelled action={:?}",
            request.action()
        );
    }

    fn delete_one(&mut self, id: TaskId) -> usize {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            debug!("event=task_delete module=service status=noop task_id={id}");
            return 0;
        };
        self.tasks.remove(index);
        info!("event=task_delete module=service status=ok task_id={id}");

        self.persist();
        self.notifier.notify(MSG_DELETED, Severity::Info);
        1
    }

    fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(Task::is_active);
        let removed = before - self.tasks.len();
        if removed == 0 {
            self.notifier.notify(MSG_NO_COMPLETED, Severity::Info);
            return 0;
        }
        info!("event=tasks_clear_completed module=service status=ok removed={removed}");

        self.persist();
        self.notifier
            .notify(&format!("{removed} task(s) deleted"), Severity::Success);
        removed
    }

    fn clear_all(&mut self) -> usize {
        let removed = self.tasks.len();
        if removed == 0 {
            self.notifier.notify(MSG_NO_TASKS, Severity::Info);
            return 0;
        }
        self.tasks.clear();
        info!("event=tasks_clear_all module=service status=ok removed={removed}");

        self.persist();
        self.notifier.notify(MSG_ALL_DELETED, Severity::Info);
        removed
    }

    /// Writes the whole store; failures are logged and notified, never raised.
    fn persist(&mut self) {
        if let Err(err) = self.repo.save_tasks(&self.tasks) {
            error!(
                "event=tasks_save module=service status=error count={} error={}",
                self.tasks.len(),
                err
            );
            self.notifier.notify(MSG_SAVE_FAILED, Severity::Error);
        }
    }

    fn allocate_id(&mut self) -> TaskId {
        let candidate = TaskId::new(self.next_id);
        if self.next_id < u64::MAX && self.get(candidate).is_none() {
            self.next_id += 1;
            return candidate;
        }
        // Allocator ran out at the top of the range: reuse the lowest free id.
        let mut value = 1;
        while self.get(TaskId::new(value)).is_some() {
            value += 1;
        }
        TaskId::new(value)
    }
}
