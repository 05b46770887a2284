//! Time-ordered queue of cancellable deferred payloads.
//!
//! Entries are ordered by due time, then by scheduling order. A cancelled
//! entry is removed from the queue outright, so it can never be popped.

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle returned by [`TimerQueue::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// A timer that came due.
#[derive(Debug, Clone, PartialEq)]
pub struct DueTimer<T> {
    pub id: TimerId,
    pub due: Duration,
    pub payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    queue: BTreeMap<(Duration, TimerId), T>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            queue: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, due: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((due, id), payload);
        id
    }

    /// Drop every pending timer; returns how many were removed.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.queue.len();
        self.queue.clear();
        cancelled
    }

    /// Earliest timer due at or before `now`, removed from the queue.
    pub fn pop_due(&mut self, now: Duration) -> Option<DueTimer<T>> {
        let (&(due, id), _) = self.queue.first_key_value()?;
        if due > now {
            return None;
        }
        let payload = self.queue.remove(&(due, id))?;
        Some(DueTimer { id, due, payload })
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
