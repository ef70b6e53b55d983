//! Read-only projections of the task store for rendering adapters.

pub mod projector;
