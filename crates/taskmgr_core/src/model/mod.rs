//! Task domain model.
//!
//! # Responsibility
//! - Define the data structures shared by operations, persistence and views.
//!
//! # Invariants
//! - Every task is identified by a `TaskId` that is unique in its store.

pub mod task;
