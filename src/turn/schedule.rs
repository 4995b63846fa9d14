//! Virtual-clock timer queue.
//!
//! Delays (AI pacing, the yacht celebration) are scheduled entries here,
//! never blocking waits. Whoever drives the controller decides how virtual
//! time maps to wall time: tests jump straight to the next deadline, the
//! demo binary sleeps until it.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// Something that should happen later.
///
/// Each event carries the turn it was scheduled in so that a timer outliving
/// its turn can be recognised and dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// Advance the AI opponent by one step.
    AiStep { turn: u32 },
    /// Auto-commit an immediate yacht.
    YachtAutoScore { turn: u32 },
}

#[derive(Debug)]
struct Entry {
    due: Duration,
    id: u64,
    event: TimerEvent,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.id == other.id
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Earlier deadline first; scheduling order breaks ties.
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.id).cmp(&(other.due, other.id))
    }
}

/// Timer queue over a virtual clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    queue: BinaryHeap<Reverse<Entry>>,
}

impl Scheduler {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `event` to fire `delay` from now.
    pub fn schedule(&mut self, delay: Duration, event: TimerEvent) {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push(Reverse(Entry {
            due: self.now + delay,
            id,
            event,
        }));
    }

    /// Deadline of the earliest pending event.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(e)| e.due)
    }

    /// Pop the earliest event due at or before `until`, moving the clock to
    /// its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerEvent> {
        let Reverse(top) = self.queue.peek()?;
        if top.due > until {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.event)
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Drop every pending event.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
