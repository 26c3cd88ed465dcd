//! Timer Queue - Cancellable delayed callbacks on a virtual clock
//!
//! The document never sleeps. Time moves only when the host calls
//! [`Document::advance`](super::Document::advance), which runs every due
//! callback in deadline order (ties in scheduling order).
//!
//! # Example
//!
//! ```ignore
//! let id = doc.set_timeout(Duration::from_millis(600), |doc| doc.remove(node));
//! doc.clear_timeout(id); // cancelled, never runs
//! doc.advance(Duration::from_secs(1));
//! ```

use std::time::Duration;

use super::Document;

/// Callback run when a timer fires.
pub type TimerCallback = Box<dyn FnOnce(&Document)>;

/// Identifies a scheduled timer for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

struct Timer {
    id: TimerId,
    deadline: Duration,
    callback: TimerCallback,
}

#[derive(Default)]
pub(crate) struct TimerQueue {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn schedule(&mut self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            deadline: self.now + delay,
            callback,
        });
        id
    }

    /// Cancel a timer. Returns false if it already ran or was cancelled.
    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline.
    pub(crate) fn pop_due(&mut self, until: Duration) -> Option<TimerCallback> {
        let position = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.deadline <= until)
            .min_by_key(|(_, timer)| (timer.deadline, timer.id))
            .map(|(position, _)| position)?;
        let timer = self.timers.swap_remove(position);
        self.now = self.now.max(timer.deadline);
        Some(timer.callback)
    }

    pub(crate) fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub(crate) fn pending(&self) -> usize {
        self.timers.len()
    }

    pub(crate) fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|timer| timer.id == id)
    }

    pub(crate) fn clear(&mut self) {
        self.timers.clear();
    }
}
