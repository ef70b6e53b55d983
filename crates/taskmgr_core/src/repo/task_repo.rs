//! Task persistence adapter over a named slot.
//!
//! # Responsibility
//! - Serialize the whole task store to one JSON value and back.
//! - Keep slot and JSON details out of the service layer.
//!
//! # Invariants
//! - `save_tasks` overwrites the slot wholesale; order is preserved.
//! - `load_tasks` never returns a store with duplicate ids.
//! - An absent slot loads as an empty store, not as an error.

use crate::model::task::{Task, TaskId};
use crate::storage::{SlotStore, StorageError};
use log::{debug, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key holding the serialized task array.
pub const STORAGE_KEY: &str = "taskManagerTasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failures surfaced by task repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying slot store failed to read or write.
    Storage(StorageError),
    /// Store could not be encoded to JSON.
    Encode(serde_json::Error),
    /// Persisted value is not a valid task array.
    Decode(serde_json::Error),
    /// Persisted value parsed but breaks a store invariant.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode tasks: {err}"),
            Self::Decode(err) => write!(f, "failed to decode persisted tasks: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Encode(err) | Self::Decode(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Whole-store persistence contract.
pub trait TaskRepository {
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()>;
    fn load_tasks(&self) -> RepoResult<Vec<Task>>;
}

/// Task repository storing JSON in one slot of a [`SlotStore`].
pub struct SlotTaskRepository<S: SlotStore> {
    store: S,
    key: String,
}

impl<S: SlotStore> SlotTaskRepository<S> {
    /// Uses the default `taskManagerTasks` slot.
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: SlotStore> TaskRepository for SlotTaskRepository<S> {
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        let json = serde_json::to_string(tasks).map_err(RepoError::Encode)?;
        self.store.write_slot(&self.key, &json)?;
        debug!(
            "event=tasks_save module=repo status=ok count={} bytes={}",
            tasks.len(),
            json.len()
        );
        Ok(())
    }

    fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        let Some(json) = self.store.read_slot(&self.key)? else {
            info!("event=tasks_load module=repo status=ok source=empty count=0");
            return Ok(Vec::new());
        };

        let tasks: Vec<Task> = serde_json::from_str(&json).map_err(RepoError::Decode)?;
        ensure_unique_ids(&tasks)?;
        info!(
            "event=tasks_load module=repo status=ok source=slot count={}",
            tasks.len()
        );
        Ok(tasks)
    }
}

fn ensure_unique_ids(tasks: &[Task]) -> RepoResult<()> {
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(task.id) {
            return Err(RepoError::InvalidData(format!(
                "duplicate task id `{}`",
                task.id
            )));
        }
    }
    Ok(())
}
