//! A clock-driven debouncer.
//!
//! The caller supplies the current [`Instant`] on every call, which keeps the
//! debouncer free of timers and easy to drive from an event loop or a test.

use std::time::{Duration, Instant};

/// Holds the most recent value until `delay` has passed without a newer one.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Replaces any pending value and restarts the delay.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.delay, value));
    }

    /// Returns the pending value if its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((due, _)) if *due <= now => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }

    /// Returns the pending value immediately, regardless of the delay.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }
}
