//! Rate limiting for host events.
//!
//! Scroll events are coalesced to at most one recomputation per rendered
//! frame. Resize and scroll-settle work is debounced: every new event pushes
//! the deadline back, and the work runs once events stop for the quiet period.
//! Time is passed in by the caller so both primitives stay deterministic.

use std::time::{Duration, Instant};

/// One pending recomputation per animation frame.
#[derive(Debug, Clone, Default)]
pub struct FrameCoalescer {
    pending: bool,
}

impl FrameCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a frame. Returns `true` only when this call scheduled one; the
    /// host should request an animation frame in that case and do nothing
    /// otherwise.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Called when the frame runs. Returns whether work was pending.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }
}

/// Reset-the-timer debounce.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Record an event at `now`, replacing any earlier deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Returns `true` once, at the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
