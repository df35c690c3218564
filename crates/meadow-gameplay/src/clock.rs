//! Simulation time and deferred tasks.
//!
//! The tick loop owns a [`ManualClock`] advanced by each frame's delta and a
//! [`TimerQueue`] that runs tasks once their due time has passed. Tasks can
//! fire late (they run on the first tick at or after the due time) but never
//! early.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Source of monotonic simulation time.
pub trait Clock {
    /// Time elapsed since the clock started.
    fn now(&self) -> Duration;
}

/// Deferred work executed by a [`Scheduler`].
pub type TimerTask = Box<dyn FnOnce()>;

/// Accepts tasks to be run at a later time.
pub trait Scheduler {
    /// Runs `task` once the clock reaches `due`.
    fn schedule(&mut self, due: Duration, task: TimerTask);
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Moves time forward, saturating at [`Duration::MAX`].
    pub fn advance(&mut self, by: Duration) {
        self.now = self.now.saturating_add(by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Pending tasks ordered by due time, then by insertion.
#[derive(Default)]
pub struct TimerQueue {
    entries: BTreeMap<(Duration, u64), TimerTask>,
    next_seq: u64,
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.entries.len())
            .field("next_due", &self.next_due())
            .finish()
    }
}

impl TimerQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of tasks still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Returns the earliest due time, if any task is waiting.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    /// Runs every task due at or before `now`, in due order.
    ///
    /// Returns how many tasks ran.
    pub fn run_due(&mut self, now: Duration) -> usize {
        let mut ran = 0;
        while let Some(entry) = self.entries.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let task = entry.remove();
            task();
            ran += 1;
        }
        ran
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, due: Duration, task: TimerTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((due, seq), task);
    }
}
