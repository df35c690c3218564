//! Scripted player input for headless runs.

use clap::ValueEnum;
use glam::Vec2;
use meadow_common::distance;
use meadow_gameplay::{AttackSlot, PlayerInput, Skirmish};

/// Distance beyond which the hunter teleports toward its prey.
const TELEPORT_DISTANCE: f32 = 1200.0;

/// Per-axis dead zone so the hunter does not jitter on top of a target.
const AXIS_DEAD_ZONE: f32 = 8.0;

/// Built-in input scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Script {
    /// No input at all
    Idle,
    /// Walk back and forth swinging the light attack
    Patrol,
    /// Run at the nearest NPC and use every attack in range
    #[default]
    Hunter,
}

/// Produces one [`PlayerInput`] per tick from the world state.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    script: Script,
    tick: u64,
}

impl ScriptedInput {
    /// Creates a driver for the given script.
    #[must_use]
    pub const fn new(script: Script) -> Self {
        Self { script, tick: 0 }
    }

    /// Returns the input for the next tick.
    pub fn next(&mut self, world: &Skirmish) -> PlayerInput {
        let tick = self.tick;
        self.tick += 1;

        match self.script {
            Script::Idle => PlayerInput::default(),
            Script::Patrol => patrol(tick),
            Script::Hunter => hunt(tick, world),
        }
    }
}

fn patrol(tick: u64) -> PlayerInput {
    let leftward = (tick / 120) % 2 == 0;
    PlayerInput::from_keys(leftward, !leftward, false, false).with_attack(AttackSlot::Primary)
}

fn hunt(tick: u64, world: &Skirmish) -> PlayerInput {
    let Some(player) = world.player() else {
        return PlayerInput::default();
    };
    let here = player.position();

    let prey = world
        .npc_ids()
        .iter()
        .filter_map(|id| world.entity(*id))
        .map(|npc| npc.position())
        .min_by(|a, b| distance(here, *a).total_cmp(&distance(here, *b)));
    let Some(prey) = prey else {
        return PlayerInput::default();
    };

    let offset = prey - here;
    let mut input = PlayerInput::from_keys(
        offset.x < -AXIS_DEAD_ZONE,
        offset.x > AXIS_DEAD_ZONE,
        offset.y < -AXIS_DEAD_ZONE,
        offset.y > AXIS_DEAD_ZONE,
    );
    // Start running on the first tick and stay running.
    input.toggle_run = tick == 0;

    let gap = distance(here, prey);
    let range = world
        .player_controller()
        .map_or(0.0, meadow_gameplay::PlayerController::attack_range);
    if gap <= range {
        input.movement = Vec2::ZERO;
        for slot in AttackSlot::ALL {
            input = input.with_attack(slot);
        }
    } else if gap > TELEPORT_DISTANCE {
        input = input.with_teleport();
    }
    input
}
