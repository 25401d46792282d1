//! Transient user notifications ("toasts").
//!
//! Append-only queue; each entry is visible until its own expiry and then
//! dropped by `prune`. Time is passed in so callers and tests control it.

use std::time::{Duration, Instant};

/// How long a notification stays visible unless configured otherwise.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(2200);

/// Upper bound for a configured TTL; longer values are clamped to it.
pub const MAX_NOTIFICATION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NoticeLevel,
    pub expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct NotificationQueue {
    ttl: Duration,
    entries: Vec<Notification>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: ttl.min(MAX_NOTIFICATION_TTL),
            entries: Vec::new(),
        }
    }

    pub fn push_at(&mut self, message: impl Into<String>, level: NoticeLevel, now: Instant) {
        // `ttl` is clamped, so this only fails for an `Instant` at the edge of its range.
        let expires_at = now.checked_add(self.ttl).unwrap_or(now);
        self.entries.push(Notification {
            message: message.into(),
            level,
            expires_at,
        });
    }

    pub fn push(&mut self, message: impl Into<String>, level: NoticeLevel) {
        self.push_at(message, level, Instant::now());
    }

    /// Notifications still visible at `now`, oldest first.
    pub fn active(&self, now: Instant) -> impl Iterator<Item = &Notification> {
        self.entries
            .iter()
            .filter(move |entry| entry.expires_at > now)
    }

    /// Drops expired entries; returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.expires_at > now);
        before - self.entries.len()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.last()
    }

    /// Removes and returns every queued notification.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
