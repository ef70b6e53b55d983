//! SQLite-backed slot store.
//!
//! # Invariants
//! - The connection must come from `db::open_db*` so the `slots` table exists.
//! - Writes are single-statement upserts and therefore atomic.

use super::{check_quota, SlotStore, StorageResult, DEFAULT_MAX_VALUE_BYTES};
use rusqlite::{params, Connection, OptionalExtension};

/// Slot store persisted in the `slots` table.
pub struct SqliteSlotStore<'conn> {
    conn: &'conn Connection,
    max_value_bytes: usize,
}

impl<'conn> SqliteSlotStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_quota(conn, DEFAULT_MAX_VALUE_BYTES)
    }

    pub fn with_quota(conn: &'conn Connection, max_value_bytes: usize) -> Self {
        Self {
            conn,
            max_value_bytes,
        }
    }
}

impl SlotStore for SqliteSlotStore<'_> {
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> StorageResult<()> {
        check_quota(key, value, self.max_value_bytes)?;
        self.conn.execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> StorageResult<()> {
        self.conn.execute("DELETE FROM slots WHERE key = ?1;", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteSlotStore;
    use crate::db::open_db_in_memory;
    use crate::storage::{SlotStore, StorageError};

    #[test]
    fn missing_slot_reads_as_none() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteSlotStore::new(&conn);
        assert_eq!(store.read_slot("absent").unwrap(), None);
    }

    #[test]
    fn write_overwrites_previous_value() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteSlotStore::new(&conn);
        store.write_slot("k", "first").unwrap();
        store.write_slot("k", "second").unwrap();
        assert_eq!(store.read_slot("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn quota_rejection_keeps_previous_value() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteSlotStore::with_quota(&conn, 8);
        store.write_slot("k", "small").unwrap();

        let err = store.write_slot("k", "much too large").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { bytes: 14, limit: 8, .. }));
        assert_eq!(store.read_slot("k").unwrap().as_deref(), Some("small"));
    }

    #[test]
    fn remove_clears_slot_and_is_idempotent() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteSlotStore::new(&conn);
        store.write_slot("k", "v").unwrap();
        store.remove_slot("k").unwrap();
        store.remove_slot("k").unwrap();
        assert_eq!(store.read_slot("k").unwrap(), None);
    }
}
