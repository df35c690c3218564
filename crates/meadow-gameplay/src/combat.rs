//! Melee combat: attack tiers and area damage resolution.

use glam::Vec2;
use meadow_common::{distance, EntityId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::Damageable;
use crate::health::DamageOutcome;

/// Default reach of a player melee swing.
pub const DEFAULT_ATTACK_RANGE: f32 = 150.0;

/// One of the player's attack keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackSlot {
    /// Light, fast attack
    Primary,
    /// Medium attack
    Secondary,
    /// Heavy, slow attack
    Tertiary,
}

impl AttackSlot {
    /// All slots in key order.
    pub const ALL: [Self; 3] = [Self::Primary, Self::Secondary, Self::Tertiary];

    /// Returns the slot's position in [`AttackSlot::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
            Self::Tertiary => 2,
        }
    }
}

/// Damage and cooldown of one attack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackTier {
    /// Damage dealt to every target in range
    pub damage: u32,
    /// Cooldown in milliseconds
    pub cooldown_ms: u64,
}

impl AttackTier {
    /// Creates a tier.
    #[must_use]
    pub const fn new(damage: u32, cooldown_ms: u64) -> Self {
        Self {
            damage,
            cooldown_ms,
        }
    }
}

/// A single target struck by an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    /// Entity that was struck
    pub target: EntityId,
    /// Damage applied
    pub damage: u32,
    /// What the damage did to the target's health
    pub outcome: DamageOutcome,
}

/// Everything one attack did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    /// Targets that were in range
    pub hits: Vec<Hit>,
    /// Targets emptied by this attack, to be destroyed by the caller
    pub depleted: Vec<EntityId>,
}

impl AttackReport {
    /// Returns true if nothing was in range.
    #[must_use]
    pub fn is_miss(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Applies area melee damage.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Damages every candidate within `range` of `attacker`.
    ///
    /// All candidates are visited; a miss never affects the others. Targets
    /// already depleted before the swing are skipped. The resolver never
    /// removes anything: callers destroy the returned `depleted` targets
    /// after the scan.
    pub fn resolve_attack<'a, T, I>(
        attacker: Vec2,
        candidates: I,
        range: f32,
        damage: u32,
    ) -> AttackReport
    where
        T: Damageable + 'a,
        I: IntoIterator<Item = &'a mut T>,
    {
        let mut report = AttackReport::default();

        for candidate in candidates {
            if candidate.health().is_depleted() {
                continue;
            }
            if distance(attacker, candidate.position()) > range {
                continue;
            }

            let outcome = candidate.take_damage(damage);
            let target = candidate.id();
            debug!(%target, damage, ?outcome, "attack landed");

            if outcome.just_depleted() {
                report.depleted.push(target);
            }
            report.hits.push(Hit {
                target,
                damage,
                outcome,
            });
        }

        report
    }
}
