//! Plain-text rendering of projected views.
//!
//! Rendering only formats what the core projects; it never inspects or
//! mutates the task store directly.

use std::fmt::Write;
use std::time::Instant;
use taskmgr_core::{Notification, NotificationCenter, Severity, TaskView};

/// Renders one row per visible task, the counters, and the empty state.
pub fn render_view(view: &TaskView<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Filter: {}", view.filter);

    match view.empty_state {
        Some(empty) => {
            let _ = writeln!(out, "  {}", empty.title());
            let _ = writeln!(out, "  {}", empty.subtitle());
        }
        None => {
            for task in &view.tasks {
                let mark = if task.completed { 'x' } else { ' ' };
                let _ = writeln!(
                    out,
                    "  [{mark}] #{:<4} {}  ({})",
                    task.id, task.text, task.created_at
                );
            }
        }
    }

    let counters = view.counters;
    let _ = writeln!(
        out,
        "All: {}  Active: {}  Completed: {}",
        counters.total, counters.active, counters.completed
    );
    out
}

/// Renders notifications still visible at `now`, oldest first.
pub fn render_notifications(center: &NotificationCenter, now: Instant) -> String {
    center
        .active_at(now)
        .map(render_notification)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_notification(notification: &Notification) -> String {
    let tag = match notification.severity {
        Severity::Info => "info",
        Severity::Success => " ok ",
        Severity::Warning => "warn",
        Severity::Error => "FAIL",
    };
    format!("[{tag}] {}", notification.message)
}
