//! Timed notification bookkeeping.
//!
//! The center never runs timers itself; adapters call `prune` (or read
//! `active_at`) whenever they redraw, which is enough for a single-threaded
//! event loop.

use super::{Notifier, Severity};
use log::{error, info, warn};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Display lifetime of every notification.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

pub type NotificationId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub posted_at: Instant,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.posted_at + NOTIFICATION_TTL
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at()
    }
}

/// Holds posted notifications until their timer elapses.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    entries: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts a notification stamped with an explicit instant.
    pub fn post_at(&mut self, message: &str, severity: Severity, now: Instant) -> NotificationId {
        let id = Uuid::new_v4();
        self.entries.push(Notification {
            id,
            message: message.to_string(),
            severity,
            posted_at: now,
        });
        id
    }

    /// Returns notifications still visible at `now`, oldest first.
    pub fn active_at(&self, now: Instant) -> impl Iterator<Item = &Notification> {
        self.entries.iter().filter(move |entry| !entry.is_expired(now))
    }

    /// Drops expired notifications and returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    /// Every notification not yet pruned, including expired ones.
    pub fn pending(&self) -> &[Notification] {
        &self.entries
    }

    /// Earliest upcoming expiry, for adapters that sleep until the next redraw.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.entries.iter().map(Notification::expires_at).min()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => error!("event=notify module=notify severity={severity}"),
            Severity::Warning => warn!("event=notify module=notify severity={severity}"),
            Severity::Info | Severity::Success => {
                info!("event=notify module=notify severity={severity}")
            }
        }
        self.post_at(message, severity, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationCenter, NOTIFICATION_TTL};
    use crate::notify::{Notifier, Severity};
    use std::time::{Duration, Instant};

    #[test]
    fn notification_expires_after_three_seconds() {
        let mut center = NotificationCenter::new();
        let t0 = Instant::now();
        center.post_at("Task added", Severity::Success, t0);

        assert_eq!(center.active_at(t0 + Duration::from_millis(2_999)).count(), 1);
        assert_eq!(center.active_at(t0 + NOTIFICATION_TTL).count(), 0);
    }

    #[test]
    fn notifications_keep_independent_timers() {
        let mut center = NotificationCenter::new();
        let t0 = Instant::now();
        center.post_at("first", Severity::Info, t0);
        center.post_at("first", Severity::Info, t0 + Duration::from_secs(2));

        let later = t0 + Duration::from_secs(4);
        assert_eq!(center.prune(later), 1);
        let remaining: Vec<_> = center.active_at(later).collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].posted_at, t0 + Duration::from_secs(2));
    }

    #[test]
    fn notifier_impl_records_message_and_severity() {
        let mut center = NotificationCenter::new();
        center.notify("Failed to save tasks", Severity::Error);

        let pending = center.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].message, "Failed to save tasks");
        assert_eq!(pending[0].severity, Severity::Error);
        assert_eq!(center.next_expiry(), Some(pending[0].expires_at()));
    }
}
