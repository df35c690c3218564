//! Health pools and depletion tracking.

use meadow_common::{ensure_positive, ConfigResult};
use serde::{Deserialize, Serialize};

/// Result of applying damage to a [`HealthPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Pool still has health left
    Survived {
        /// Health remaining after the hit
        remaining: u32,
    },
    /// This hit emptied the pool
    Depleted,
    /// The pool was already empty; the hit was ignored
    AlreadyDepleted,
}

impl DamageOutcome {
    /// Returns whether the pool is depleted after the hit.
    #[must_use]
    pub const fn is_depleted(self) -> bool {
        matches!(self, Self::Depleted | Self::AlreadyDepleted)
    }

    /// Returns true only for the hit that emptied the pool.
    ///
    /// Owners destroy the entity on this signal, which fires at most once
    /// per pool.
    #[must_use]
    pub const fn just_depleted(self) -> bool {
        matches!(self, Self::Depleted)
    }
}

/// Coarse health classification used by health bar overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthBand {
    /// More than half health
    Healthy,
    /// Between a fifth and a half
    Wounded,
    /// A fifth or less
    Critical,
}

/// Current and maximum hit points of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPool {
    current: u32,
    max: u32,
}

impl HealthPool {
    /// Creates a full pool. `max` must be positive.
    pub fn new(max: u32) -> ConfigResult<Self> {
        ensure_positive("max health", f64::from(max))?;
        Ok(Self { current: max, max })
    }

    /// Returns current health.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Returns maximum health.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Returns whether the pool is empty.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Returns current / max in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    /// Classifies the current fraction.
    #[must_use]
    pub fn band(&self) -> HealthBand {
        let fraction = self.fraction();
        if fraction > 0.5 {
            HealthBand::Healthy
        } else if fraction > 0.2 {
            HealthBand::Wounded
        } else {
            HealthBand::Critical
        }
    }

    /// Subtracts `amount`, flooring at zero.
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.is_depleted() {
            return DamageOutcome::AlreadyDepleted;
        }
        self.current = self.current.saturating_sub(amount);
        if self.current == 0 {
            DamageOutcome::Depleted
        } else {
            DamageOutcome::Survived {
                remaining: self.current,
            }
        }
    }

    /// Restores up to `amount`, capped at max. A depleted pool stays empty.
    pub fn heal(&mut self, amount: u32) {
        if self.is_depleted() {
            return;
        }
        self.current = self.current.saturating_add(amount).min(self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_zero_max() {
        assert!(HealthPool::new(0).is_err());
    }

    #[test]
    fn test_damage_sequence() {
        let mut pool = HealthPool::new(1000).expect("valid pool");

        let first = pool.apply_damage(200);
        assert_eq!(pool.current(), 800);
        assert!(!first.is_depleted());

        let second = pool.apply_damage(500);
        assert_eq!(pool.current(), 300);
        assert!(!second.is_depleted());

        let third = pool.apply_damage(1000);
        assert_eq!(pool.current(), 0);
        assert!(third.just_depleted());
    }

    #[test]
    fn test_depletion_signals_once() {
        let mut pool = HealthPool::new(10).expect("valid pool");
        assert_eq!(pool.apply_damage(10), DamageOutcome::Depleted);
        assert_eq!(pool.apply_damage(10), DamageOutcome::AlreadyDepleted);
        assert!(pool.apply_damage(1).is_depleted());
        assert!(!pool.apply_damage(1).just_depleted());
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut pool = HealthPool::new(100).expect("valid pool");
        pool.apply_damage(30);
        pool.heal(50);
        assert_eq!(pool.current(), 100);
    }

    #[test]
    fn test_heal_does_not_revive() {
        let mut pool = HealthPool::new(100).expect("valid pool");
        pool.apply_damage(100);
        pool.heal(50);
        assert!(pool.is_depleted());
    }

    #[test]
    fn test_bands() {
        let mut pool = HealthPool::new(100).expect("valid pool");
        assert_eq!(pool.band(), HealthBand::Healthy);
        pool.apply_damage(50);
        assert_eq!(pool.band(), HealthBand::Wounded);
        pool.apply_damage(30);
        assert_eq!(pool.band(), HealthBand::Critical);
        assert!((pool.fraction() - 0.2).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_damage_floors_at_zero(max in 1u32..100_000, hits in proptest::collection::vec(0u32..5_000, 0..20)) {
            let mut pool = HealthPool::new(max).expect("valid pool");
            for hit in hits {
                let before = pool.current();
                let outcome = pool.apply_damage(hit);
                prop_assert_eq!(pool.current(), before.saturating_sub(hit));
                prop_assert!(pool.current() <= pool.max());
                prop_assert_eq!(outcome.is_depleted(), pool.current() == 0);
                prop_assert_eq!(pool.is_depleted(), pool.current() == 0);
            }
        }
    }
}
