#![forbid(unsafe_code)]

//! Cancellable deferred action driven by an injected clock.
//!
//! There is no timer thread. The owner schedules a deadline, and the host's
//! tick asks whether it has passed. Rescheduling while pending moves the
//! deadline (cancel-and-restart), which is all a debounce needs.

use core::time::Duration;

/// A single pending deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredAction {
    delay: Duration,
    deadline: Option<Duration>,
}

impl DeferredAction {
    /// Idle action that fires `delay` after each schedule.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the action to fire at `now + delay`.
    pub fn schedule(&mut self, now: Duration) {
        self.deadline = Some(now.saturating_add(self.delay));
    }

    /// Armed deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Fire if the deadline has passed. Firing disarms the action, so each
    /// schedule fires at most once.
    pub fn fire_if_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
