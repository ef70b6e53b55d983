//! Transient user-facing notifications.
//!
//! # Responsibility
//! - Define the `Notifier` sink task operations report outcomes to.
//! - Provide a timer-based `NotificationCenter` for rendering adapters.
//!
//! # Invariants
//! - Every notification is independent; nothing is merged or replaced.
//! - A notification always expires `NOTIFICATION_TTL` after it was posted.

use std::fmt::{Display, Formatter};

mod center;

pub use center::{Notification, NotificationCenter, NotificationId, NOTIFICATION_TTL};

/// Presentation class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for operation outcome messages.
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity);
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, message: &str, severity: Severity) {
        (**self).notify(message, severity);
    }
}
