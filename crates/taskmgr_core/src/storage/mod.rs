//! Local durable key-value storage ("slots").
//!
//! # Responsibility
//! - Define the slot contract used by the persistence adapter.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - A write replaces the previous value of the slot wholesale.
//! - A rejected write leaves the previous value intact.
//! - Values larger than the configured quota are rejected, never truncated.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory_slot;
mod sqlite_slot;

pub use memory_slot::MemorySlotStore;
pub use sqlite_slot::SqliteSlotStore;

/// Default per-value quota, matching the usual browser local storage limit.
pub const DEFAULT_MAX_VALUE_BYTES: usize = 5 * 1024 * 1024;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    /// Backing database failed.
    Db(DbError),
    /// Value exceeds the per-slot quota.
    QuotaExceeded { key: String, bytes: usize, limit: usize },
    /// Store refuses writes (read-only or detached).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded { key, bytes, limit } => write!(
                f,
                "slot `{key}` value of {bytes} bytes exceeds quota of {limit} bytes"
            ),
            Self::Unavailable(reason) => write!(f, "slot storage unavailable: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named-slot string storage.
pub trait SlotStore {
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>>;
    fn write_slot(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_slot(&self, key: &str) -> StorageResult<()>;
}

impl<S: SlotStore + ?Sized> SlotStore for &S {
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write_slot(key, value)
    }

    fn remove_slot(&self, key: &str) -> StorageResult<()> {
        (**self).remove_slot(key)
    }
}

fn check_quota(key: &str, value: &str, limit: usize) -> StorageResult<()> {
    if value.len() > limit {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            bytes: value.len(),
            limit,
        });
    }
    Ok(())
}
