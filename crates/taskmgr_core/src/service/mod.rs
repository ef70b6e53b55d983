//! Core use-case services.
//!
//! # Responsibility
//! - Route every task mutation through one owned store.
//! - Keep rendering adapters decoupled from persistence details.

pub mod confirmation;
pub mod task_service;
