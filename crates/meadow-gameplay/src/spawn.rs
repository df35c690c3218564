//! Spawn placement.

use glam::Vec2;
use meadow_common::WorldBounds;

/// Chooses where new entities appear.
///
/// NPCs land on whole-unit coordinates drawn uniformly from the bounds
/// shrunk by one full body size on each side. The player always starts at
/// the centre of the world.
#[derive(Debug, Clone, Copy)]
pub struct Spawner {
    bounds: WorldBounds,
}

impl Spawner {
    /// Creates a spawner for the given world.
    #[must_use]
    pub const fn new(bounds: WorldBounds) -> Self {
        Self { bounds }
    }

    /// Returns the player's spawn point.
    #[must_use]
    pub fn player_position(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Picks a random spawn point for an NPC of the given body size.
    pub fn npc_position(&self, body_size: Vec2, rng: &mut fastrand::Rng) -> Vec2 {
        let area = self.bounds.inset(body_size);
        Vec2::new(
            whole_between(rng, area.left, area.right),
            whole_between(rng, area.top, area.bottom),
        )
    }

    /// Picks `count` NPC spawn points.
    pub fn npc_positions(&self, body_size: Vec2, count: usize, rng: &mut fastrand::Rng) -> Vec<Vec2> {
        (0..count).map(|_| self.npc_position(body_size, rng)).collect()
    }
}

fn whole_between(rng: &mut fastrand::Rng, lo: f32, hi: f32) -> f32 {
    let lo_whole = lo.ceil() as i64;
    let hi_whole = hi.floor() as i64;
    if lo_whole > hi_whole {
        return (lo + hi) * 0.5;
    }
    rng.i64(lo_whole..=hi_whole) as f32
}
