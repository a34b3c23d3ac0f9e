//! Pending-write descriptor with cancel-and-restart semantics.
//!
//! # Invariants
//! - At most one write is pending; scheduling replaces it and restarts the timer.
//! - A pending write fires only once the quiet period since the last schedule
//!   has fully elapsed.

use std::time::{Duration, Instant};

/// Default quiet period between the last edit and the write.
pub const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 1500;
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(DEFAULT_SAVE_DEBOUNCE_MS);

/// The write waiting for its quiet period to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWrite {
    /// Mutation generation that scheduled this write.
    pub generation: u64,
    pub due_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<PendingWrite>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replaces any pending write; returns the one it superseded.
    pub fn schedule(&mut self, generation: u64, now: Instant) -> Option<PendingWrite> {
        self.pending.replace(PendingWrite {
            generation,
            due_at: now + self.delay,
        })
    }

    pub fn cancel(&mut self) -> Option<PendingWrite> {
        self.pending.take()
    }

    /// Drains the pending write if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<PendingWrite> {
        match self.pending {
            Some(pending) if now >= pending.due_at => self.pending.take(),
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.due_at)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DEBOUNCE)
    }
}
