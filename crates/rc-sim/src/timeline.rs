//! Virtual-clock timeline for periodic ticks.
//!
//! Replaces self-rescheduling callbacks with explicit entries that can be
//! cancelled as a whole. Time is a `Duration` since the timeline was created,
//! so tests can drive it without sleeping.

use std::cmp::{Ordering as CmpOrdering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Work scheduled on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Advance the phase driver and emit a data-table row.
    TableTick,
    /// Clear the displayed table after a full revolution.
    ClearHistory,
    /// Advance particles and publish a draw list.
    Frame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    at: Duration,
    seq: u64,
    task: Task,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        (self.at, self.seq).cmp(&(other.at, other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of pending tasks; ties run in scheduling order.
#[derive(Debug, Default)]
pub struct Timeline {
    now: Duration,
    queue: BinaryHeap<Reverse<Entry>>,
    seq: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the most recently popped task.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule_at(&mut self, at: Duration, task: Task) {
        let at = at.max(self.now);
        self.queue.push(Reverse(Entry {
            at,
            seq: self.seq,
            task,
        }));
        self.seq += 1;
    }

    pub fn schedule_in(&mut self, delay: Duration, task: Task) {
        self.schedule_at(self.now + delay, task);
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(e)| e.at)
    }

    /// Pop the earliest task due at or before `until`, moving the clock to it.
    pub fn pop_due(&mut self, until: Duration) -> Option<(Duration, Task)> {
        if self.next_deadline()? > until {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        self.now = entry.at;
        Some((entry.at, entry.task))
    }

    /// Move the clock forward without running anything.
    pub fn advance_clock(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }

    /// Drop every pending entry of one kind.
    pub fn cancel(&mut self, task: Task) {
        self.queue.retain(|Reverse(e)| e.task != task);
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Shared stop request, checked by long-running loops.
#[derive(Debug, Clone)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    /// A flag that starts out raised (keep running).
    pub fn running() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Ask every holder to stop.
    pub fn stop(&self) {
        self.0.store(false, Ordering::Release);
    }
}
