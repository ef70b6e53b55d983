//! Process-memory slot store for tests and ephemeral sessions.

use super::{check_quota, SlotStore, StorageError, StorageResult, DEFAULT_MAX_VALUE_BYTES};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Slot store kept in a `HashMap`; contents vanish with the value.
#[derive(Debug)]
pub struct MemorySlotStore {
    slots: RefCell<HashMap<String, String>>,
    max_value_bytes: usize,
    reject_writes: Cell<bool>,
}

impl Default for MemorySlotStore {
    fn default() -> Self {
        Self::with_quota(DEFAULT_MAX_VALUE_BYTES)
    }
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(max_value_bytes: usize) -> Self {
        Self {
            slots: RefCell::new(HashMap::new()),
            max_value_bytes,
            reject_writes: Cell::new(false),
        }
    }

    /// Seeds a slot, bypassing quota and write rejection.
    pub fn seed(&self, key: &str, value: &str) {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Makes subsequent writes and removals fail with `Unavailable`.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    fn ensure_writable(&self) -> StorageResult<()> {
        if self.reject_writes.get() {
            return Err(StorageError::Unavailable(
                "memory store is rejecting writes".to_string(),
            ));
        }
        Ok(())
    }
}

impl SlotStore for MemorySlotStore {
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_writable()?;
        check_quota(key, value, self.max_value_bytes)?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> StorageResult<()> {
        self.ensure_writable()?;
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
