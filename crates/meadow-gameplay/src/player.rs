//! Player input, movement and abilities.

use glam::Vec2;
use meadow_common::{ConfigResult, WorldBounds};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Clock, Scheduler};
use crate::combat::{AttackSlot, AttackTier};
use crate::config::{AttackConfig, PlayerConfig, TeleportConfig};
use crate::cooldown::CooldownGate;
use crate::entity::{Entity, Movable};

/// Input state for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement direction; each axis is -1, 0 or 1
    pub movement: Vec2,
    /// Attack keys held this tick, indexed by [`AttackSlot::index`]
    pub attacks: [bool; 3],
    /// Teleport key pressed this tick
    pub teleport: bool,
    /// Run toggle pressed this tick
    pub toggle_run: bool,
}

impl PlayerInput {
    /// Builds the movement vector from direction keys.
    ///
    /// Left wins over right and up wins over down when both are held.
    #[must_use]
    pub fn from_keys(left: bool, right: bool, up: bool, down: bool) -> Self {
        let x = if left {
            -1.0
        } else if right {
            1.0
        } else {
            0.0
        };
        let y = if up {
            -1.0
        } else if down {
            1.0
        } else {
            0.0
        };
        Self {
            movement: Vec2::new(x, y),
            ..Self::default()
        }
    }

    /// Marks an attack slot as held.
    #[must_use]
    pub fn with_attack(mut self, slot: AttackSlot) -> Self {
        self.attacks[slot.index()] = true;
        self
    }

    /// Marks the teleport key as pressed.
    #[must_use]
    pub fn with_teleport(mut self) -> Self {
        self.teleport = true;
        self
    }

    /// Returns whether an attack slot is held.
    #[must_use]
    pub const fn is_attacking(&self, slot: AttackSlot) -> bool {
        self.attacks[slot.index()]
    }
}

/// A completed teleport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeleportJump {
    /// Position before the jump
    pub from: Vec2,
    /// Position after the jump
    pub to: Vec2,
}

/// What the player did during one update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerActions {
    /// Attacks that passed their cooldown gate, in slot order
    pub attacks: Vec<(AttackSlot, AttackTier)>,
    /// Attacks dropped because their slot was still cooling down
    pub rejected: Vec<AttackSlot>,
    /// Teleport performed this tick, if its cooldown allowed it
    pub teleport: Option<TeleportJump>,
}

/// Drives the player entity from input.
#[derive(Debug)]
pub struct PlayerController {
    running: bool,
    walk_speed: f32,
    run_speed: f32,
    attack_gates: [CooldownGate; 3],
    tiers: [AttackTier; 3],
    attack_range: f32,
    teleport_gate: CooldownGate,
    teleport_distance: f32,
    score: u32,
}

impl PlayerController {
    /// Creates a controller from configuration.
    pub fn new(
        player: &PlayerConfig,
        attacks: &AttackConfig,
        teleport: &TeleportConfig,
    ) -> ConfigResult<Self> {
        let tiers = AttackSlot::ALL.map(|slot| attacks.tier(slot));
        let attack_gates = [
            CooldownGate::from_millis(tiers[0].cooldown_ms)?,
            CooldownGate::from_millis(tiers[1].cooldown_ms)?,
            CooldownGate::from_millis(tiers[2].cooldown_ms)?,
        ];

        Ok(Self {
            running: false,
            walk_speed: player.walk_speed,
            run_speed: player.run_speed,
            attack_gates,
            tiers,
            attack_range: attacks.range,
            teleport_gate: CooldownGate::from_millis(teleport.cooldown_ms)?,
            teleport_distance: teleport.distance,
            score: 0,
        })
    }

    /// Returns whether the player is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Flips between walking and running.
    pub fn toggle_run(&mut self) {
        self.running = !self.running;
        debug!(running = self.running, "run toggled");
    }

    /// Returns the current movement speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        if self.running {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    /// Returns the melee reach.
    #[must_use]
    pub const fn attack_range(&self) -> f32 {
        self.attack_range
    }

    /// Returns the cooldown gate of an attack slot.
    #[must_use]
    pub fn attack_gate(&self, slot: AttackSlot) -> &CooldownGate {
        &self.attack_gates[slot.index()]
    }

    /// Returns the teleport cooldown gate.
    #[must_use]
    pub const fn teleport_gate(&self) -> &CooldownGate {
        &self.teleport_gate
    }

    /// Returns the number of NPCs killed by the player.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Adds kills to the score.
    pub fn add_kills(&mut self, kills: u32) {
        self.score = self.score.saturating_add(kills);
    }

    /// Applies one tick of input: run toggle, movement, teleport, then attack
    /// gating. Attacks are only gated here; the caller resolves them.
    pub fn update<C, S>(
        &mut self,
        body: &mut Entity,
        input: &PlayerInput,
        dt: f32,
        bounds: &WorldBounds,
        clock: &C,
        scheduler: &mut S,
    ) -> PlayerActions
    where
        C: Clock + ?Sized,
        S: Scheduler + ?Sized,
    {
        if input.toggle_run {
            self.toggle_run();
        }

        let movement = Vec2::new(unit_axis(input.movement.x), unit_axis(input.movement.y));
        self.step(body, movement, dt, bounds);

        let mut actions = PlayerActions::default();

        if input.teleport {
            actions.teleport = self.teleport(body, movement, bounds, clock, scheduler);
        }

        for slot in AttackSlot::ALL {
            if !input.is_attacking(slot) {
                continue;
            }
            if self.attack_gates[slot.index()].try_trigger(clock, scheduler) {
                actions.attacks.push((slot, self.tiers[slot.index()]));
            } else {
                debug!(?slot, "attack skipped, slot cooling down");
                actions.rejected.push(slot);
            }
        }

        actions
    }

    fn step(&self, body: &mut Entity, movement: Vec2, dt: f32, bounds: &WorldBounds) {
        if movement == Vec2::ZERO {
            return;
        }
        let area = bounds.inset(body.half_extents());
        let next = body.position() + movement * self.speed() * dt;
        body.set_position(area.clamp(next));
    }

    fn teleport<C, S>(
        &mut self,
        body: &mut Entity,
        movement: Vec2,
        bounds: &WorldBounds,
        clock: &C,
        scheduler: &mut S,
    ) -> Option<TeleportJump>
    where
        C: Clock + ?Sized,
        S: Scheduler + ?Sized,
    {
        if !self.teleport_gate.try_trigger(clock, scheduler) {
            debug!("teleport skipped, cooling down");
            return None;
        }

        let from = body.position();
        let area = bounds.inset(body.half_extents());
        let to = area.clamp(from + movement * self.teleport_distance);
        body.set_position(to);
        debug!(?from, ?to, "teleported");
        Some(TeleportJump { from, to })
    }
}

fn unit_axis(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
