//! Cooldown gates for attacks and abilities.

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use meadow_common::{ensure_positive, ConfigResult};

use crate::clock::{Clock, Scheduler};

/// Blocks an action from repeating until its cooldown has elapsed.
///
/// Triggering arms the gate and schedules a release task; while armed,
/// further triggers are dropped. The release task only holds a weak handle,
/// so a gate dropped mid-cooldown (its owner died) is simply forgotten.
#[derive(Debug)]
pub struct CooldownGate {
    armed: Rc<Cell<bool>>,
    duration: Duration,
    release_at: Option<Duration>,
}

impl CooldownGate {
    /// Creates an unarmed gate. `duration` must be non-zero.
    pub fn new(duration: Duration) -> ConfigResult<Self> {
        ensure_positive("cooldown duration", duration.as_secs_f64())?;
        Ok(Self {
            armed: Rc::new(Cell::new(false)),
            duration,
            release_at: None,
        })
    }

    /// Creates a gate with a cooldown in milliseconds.
    pub fn from_millis(millis: u64) -> ConfigResult<Self> {
        Self::new(Duration::from_millis(millis))
    }

    /// Returns the cooldown length.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns whether the gate is currently blocking.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.get()
    }

    /// Returns when the pending release is due, while armed.
    #[must_use]
    pub fn release_at(&self) -> Option<Duration> {
        self.release_at.filter(|_| self.is_armed())
    }

    /// Returns the cooldown left at `now`, zero when unarmed.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        self.release_at()
            .map_or(Duration::ZERO, |due| due.saturating_sub(now))
    }

    /// Attempts to pass the gate.
    ///
    /// Returns false, with no side effect, while armed. Otherwise arms the
    /// gate, schedules its release `duration` from now, and returns true.
    pub fn try_trigger<C, S>(&mut self, clock: &C, scheduler: &mut S) -> bool
    where
        C: Clock + ?Sized,
        S: Scheduler + ?Sized,
    {
        if self.armed.get() {
            return false;
        }

        self.armed.set(true);
        let due = clock.now() + self.duration;
        self.release_at = Some(due);

        let handle: Weak<Cell<bool>> = Rc::downgrade(&self.armed);
        scheduler.schedule(
            due,
            Box::new(move || {
                if let Some(armed) = handle.upgrade() {
                    armed.set(false);
                }
            }),
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, TimerQueue};
    use proptest::prelude::*;

    #[test]
    fn test_rejects_zero_duration() {
        assert!(CooldownGate::from_millis(0).is_err());
    }

    #[test]
    fn test_trigger_arms_and_releases() {
        let mut clock = ManualClock::new();
        let mut timers = TimerQueue::new();
        let mut gate = CooldownGate::from_millis(500).expect("valid gate");

        assert!(gate.try_trigger(&clock, &mut timers));
        assert!(gate.is_armed());
        assert_eq!(gate.release_at(), Some(Duration::from_millis(500)));
        assert_eq!(timers.pending(), 1);

        clock.advance(Duration::from_millis(499));
        timers.run_due(clock.now());
        assert!(!gate.try_trigger(&clock, &mut timers));
        assert_eq!(timers.pending(), 1);
        assert_eq!(gate.remaining(clock.now()), Duration::from_millis(1));

        clock.advance(Duration::from_millis(1));
        timers.run_due(clock.now());
        assert!(!gate.is_armed());
        assert_eq!(gate.remaining(clock.now()), Duration::ZERO);
        assert!(gate.try_trigger(&clock, &mut timers));
    }

    #[test]
    fn test_gates_are_independent() {
        let clock = ManualClock::new();
        let mut timers = TimerQueue::new();
        let mut light = CooldownGate::from_millis(500).expect("valid gate");
        let mut heavy = CooldownGate::from_millis(5000).expect("valid gate");

        assert!(light.try_trigger(&clock, &mut timers));
        assert!(heavy.try_trigger(&clock, &mut timers));
        assert!(!light.try_trigger(&clock, &mut timers));
        assert_eq!(timers.pending(), 2);
    }

    #[test]
    fn test_dropped_gate_release_is_harmless() {
        let mut clock = ManualClock::new();
        let mut timers = TimerQueue::new();
        let mut gate = CooldownGate::from_millis(10).expect("valid gate");
        assert!(gate.try_trigger(&clock, &mut timers));
        drop(gate);

        clock.advance(Duration::from_millis(10));
        assert_eq!(timers.run_due(clock.now()), 1);
    }

    proptest! {
        #[test]
        fn prop_one_trigger_per_window(duration_ms in 1u64..10_000, step_ms in 1u64..500, steps in 1usize..200) {
            let mut clock = ManualClock::new();
            let mut timers = TimerQueue::new();
            let mut gate = CooldownGate::from_millis(duration_ms).expect("valid gate");
            let mut last_fire: Option<Duration> = None;

            for _ in 0..steps {
                timers.run_due(clock.now());
                if gate.try_trigger(&clock, &mut timers) {
                    if let Some(last) = last_fire {
                        prop_assert!(clock.now() - last >= Duration::from_millis(duration_ms));
                    }
                    last_fire = Some(clock.now());
                }
                prop_assert!(timers.pending() <= 1);
                clock.advance(Duration::from_millis(step_ms));
            }
        }
    }
}
