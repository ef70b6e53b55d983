//! Core domain logic for the task manager.
//! This crate is the single source of truth for task invariants; rendering
//! adapters only call into it and display what it projects.

pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod storage;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{
    format_created_at, normalize_task_text, Task, TaskId, TaskValidationError,
    MIN_TASK_TEXT_CHARS,
};
pub use notify::{
    Notification, NotificationCenter, NotificationId, Notifier, Severity, NOTIFICATION_TTL,
};
pub use repo::task_repo::{RepoError, RepoResult, SlotTaskRepository, TaskRepository, STORAGE_KEY};
pub use service::confirmation::{ConfirmationRequest, PendingAction};
pub use service::task_service::{ServiceError, TaskService};
pub use storage::{
    MemorySlotStore, SlotStore, SqliteSlotStore, StorageError, StorageResult,
    DEFAULT_MAX_VALUE_BYTES,
};
pub use view::projector::{
    has_unfinished_tasks, Counters, EmptyState, Filter, Stats, TaskView, UnknownFilter,
    ViewProjector,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
