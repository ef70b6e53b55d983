//! Persistence adapter layer.
//!
//! # Responsibility
//! - Define the whole-store save/load contract used by task operations.
//! - Isolate serialization and slot details from service orchestration.
//!
//! # Invariants
//! - Repositories return typed errors; recovery policy belongs to callers.

pub mod task_repo;
