//! Tunable gameplay parameters.
//!
//! Defaults reproduce the training-ground scene: a 200x200 tile map of
//! 32 px tiles (minus the 2 px physics inset), 1000 hp actors and the
//! three-tier attack table.

use glam::Vec2;
use meadow_common::{ensure_positive, ConfigError, ConfigResult, WorldBounds};
use serde::{Deserialize, Serialize};

use crate::combat::{AttackSlot, AttackTier, DEFAULT_ATTACK_RANGE};
use crate::threat::{DetectionZone, Temperament, DEFAULT_CLOSE_RANGE, DEFAULT_DETECTION_RADIUS};

/// World size and seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World width in units
    pub width: f32,
    /// World height in units
    pub height: f32,
    /// RNG seed (None = random)
    pub seed: Option<u64>,
    /// NPCs spawned when the world starts
    pub initial_npcs: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 200.0 * 32.0 - 2.0,
            height: 200.0 * 32.0 - 2.0,
            seed: None,
            initial_npcs: 10,
        }
    }
}

/// NPC body and behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    /// Maximum health
    pub health: u32,
    /// Movement speed in units per second
    pub speed: f32,
    /// Body width
    pub width: f32,
    /// Body height
    pub height: f32,
    /// Maximum wander distance from the spawn point
    pub wander_radius: f32,
    /// Aggro radius
    pub detection_radius: f32,
    /// Distance at which a chasing NPC stops
    pub close_range: f32,
    /// Reaction to a hostile inside the detection radius
    pub temperament: Temperament,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            health: 1000,
            speed: 200.0,
            width: 32.0,
            height: 32.0,
            wander_radius: 400.0,
            detection_radius: DEFAULT_DETECTION_RADIUS,
            close_range: DEFAULT_CLOSE_RANGE,
            temperament: Temperament::Aggressive,
        }
    }
}

impl NpcConfig {
    /// Returns the body size.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Builds the detection zone.
    pub fn detection_zone(&self) -> ConfigResult<DetectionZone> {
        DetectionZone::new(self.detection_radius, self.close_range)
    }
}

/// Player body and movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Maximum health
    pub health: u32,
    /// Walking speed in units per second
    pub walk_speed: f32,
    /// Running speed in units per second
    pub run_speed: f32,
    /// Body width
    pub width: f32,
    /// Body height
    pub height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            health: 1000,
            walk_speed: 250.0,
            run_speed: 500.0,
            width: 32.0,
            height: 32.0,
        }
    }
}

impl PlayerConfig {
    /// Returns the body size.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Attack table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Melee reach shared by all tiers
    pub range: f32,
    /// Light attack
    pub primary: AttackTier,
    /// Medium attack
    pub secondary: AttackTier,
    /// Heavy attack
    pub tertiary: AttackTier,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            range: DEFAULT_ATTACK_RANGE,
            primary: AttackTier::new(200, 500),
            secondary: AttackTier::new(500, 1500),
            tertiary: AttackTier::new(1000, 5000),
        }
    }
}

impl AttackConfig {
    /// Returns the tier bound to a slot.
    #[must_use]
    pub const fn tier(&self, slot: AttackSlot) -> AttackTier {
        match slot {
            AttackSlot::Primary => self.primary,
            AttackSlot::Secondary => self.secondary,
            AttackSlot::Tertiary => self.tertiary,
        }
    }
}

/// Teleport ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    /// Jump length along the movement direction
    pub distance: f32,
    /// Cooldown in milliseconds
    pub cooldown_ms: u64,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            distance: 1000.0,
            cooldown_ms: 5000,
        }
    }
}

/// All gameplay parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkirmishConfig {
    /// World settings
    pub world: WorldConfig,
    /// NPC settings
    pub npc: NpcConfig,
    /// Player settings
    pub player: PlayerConfig,
    /// Attack table
    pub attacks: AttackConfig,
    /// Teleport ability
    pub teleport: TeleportConfig,
}

impl SkirmishConfig {
    /// Builds the world bounds.
    pub fn bounds(&self) -> ConfigResult<WorldBounds> {
        WorldBounds::new(0.0, 0.0, self.world.width, self.world.height)
    }

    /// Checks every value the simulation depends on.
    pub fn validate(&self) -> ConfigResult<()> {
        self.bounds()?;

        ensure_positive("npc.health", f64::from(self.npc.health))?;
        ensure_positive("npc.speed", f64::from(self.npc.speed))?;
        ensure_positive("npc.width", f64::from(self.npc.width))?;
        ensure_positive("npc.height", f64::from(self.npc.height))?;
        ensure_positive("npc.wander_radius", f64::from(self.npc.wander_radius))?;
        self.npc.detection_zone()?;

        ensure_positive("player.health", f64::from(self.player.health))?;
        ensure_positive("player.walk_speed", f64::from(self.player.walk_speed))?;
        ensure_positive("player.run_speed", f64::from(self.player.run_speed))?;
        ensure_positive("player.width", f64::from(self.player.width))?;
        ensure_positive("player.height", f64::from(self.player.height))?;

        ensure_positive("attacks.range", f64::from(self.attacks.range))?;
        for slot in AttackSlot::ALL {
            let tier = self.attacks.tier(slot);
            ensure_positive("attack damage", f64::from(tier.damage))?;
            ensure_positive("attack cooldown_ms", tier.cooldown_ms as f64)?;
        }

        ensure_positive("teleport.cooldown_ms", self.teleport.cooldown_ms as f64)?;
        if self.teleport.distance < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "teleport.distance",
                value: f64::from(self.teleport.distance),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SkirmishConfig::default();
        assert!(config.validate().is_ok());
        let bounds = config.bounds().expect("valid bounds");
        assert_eq!(bounds.width(), 6398.0);
        assert_eq!(config.attacks.tier(AttackSlot::Tertiary).damage, 1000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SkirmishConfig::default();
        config.npc.wander_radius = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "npc.wander_radius",
                ..
            })
        ));

        let mut config = SkirmishConfig::default();
        config.attacks.secondary.cooldown_ms = 0;
        assert!(config.validate().is_err());

        let mut config = SkirmishConfig::default();
        config.attacks.tertiary.damage = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "attack damage",
                ..
            })
        ));

        let mut config = SkirmishConfig::default();
        config.npc.close_range = 500.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedDetectionZone { .. })
        ));
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let json = r#"{ "npc": { "speed": 120.0, "temperament": "skittish" }, "world": { "seed": 9 } }"#;
        let config: SkirmishConfig = serde_json::from_str(json).expect("valid json");

        assert_eq!(config.npc.speed, 120.0);
        assert_eq!(config.npc.temperament, Temperament::Skittish);
        assert_eq!(config.npc.health, 1000);
        assert_eq!(config.world.seed, Some(9));
        assert_eq!(config.world.initial_npcs, 10);
        assert_eq!(config.attacks, AttackConfig::default());
    }
}
