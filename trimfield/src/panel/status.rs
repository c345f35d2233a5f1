//! The transient status line shown under the settings form.

use std::time::{Duration, Instant};

/// How long a status message stays visible unless a caller says otherwise.
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_millis(1500);

/// A message that disappears after a timeout. A zero timeout never expires.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    message: Option<String>,
    expires_at: Option<Instant>,
}

impl StatusLine {
    pub fn set(&mut self, message: &str, timeout: Duration, now: Instant) {
        self.message = Some(message.to_string());
        self.expires_at = if timeout.is_zero() { None } else { Some(now + timeout) };
    }

    /// The visible message at `now`, if any.
    pub fn message_at(&self, now: Instant) -> Option<&str> {
        match self.expires_at {
            Some(expiry) if expiry <= now => None,
            _ => self.message.as_deref(),
        }
    }
}
