//! Motion sink: turns desired velocities into positions.
//!
//! Rendering engines supply their own physics body; the headless simulation
//! uses [`EulerIntegrator`].

use glam::Vec2;
use meadow_common::WorldBounds;

use crate::entity::{Entity, Movable};

/// Consumes an entity's velocity for one tick.
pub trait MotionSink {
    /// Moves `body` by its velocity over `dt` seconds, keeping it inside
    /// `bounds`.
    fn integrate(&mut self, body: &mut Entity, dt: f32, bounds: &WorldBounds);
}

/// Explicit Euler step with the body clamped inside the world.
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerIntegrator;

impl MotionSink for EulerIntegrator {
    fn integrate(&mut self, body: &mut Entity, dt: f32, bounds: &WorldBounds) {
        let velocity = body.velocity();
        if velocity == Vec2::ZERO {
            return;
        }
        let area = bounds.inset(body.half_extents());
        let next = body.position() + velocity * dt;
        body.set_position(area.clamp(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Role;
    use crate::health::HealthPool;
    use meadow_common::EntityId;

    fn body_at(position: Vec2) -> Entity {
        Entity::new(
            EntityId::from_raw(1),
            Role::Npc,
            position,
            Vec2::splat(16.0),
            200.0,
            HealthPool::new(10).expect("valid pool"),
        )
    }

    #[test]
    fn test_euler_step() {
        let bounds = WorldBounds::new(0.0, 0.0, 1000.0, 1000.0).expect("valid bounds");
        let mut body = body_at(Vec2::new(500.0, 500.0));
        body.set_velocity(Vec2::new(200.0, -100.0));

        EulerIntegrator.integrate(&mut body, 0.5, &bounds);
        assert_eq!(body.position(), Vec2::new(600.0, 450.0));
    }

    #[test]
    fn test_clamped_to_bounds() {
        let bounds = WorldBounds::new(0.0, 0.0, 1000.0, 1000.0).expect("valid bounds");
        let mut body = body_at(Vec2::new(990.0, 20.0));
        body.set_velocity(Vec2::new(200.0, -200.0));

        EulerIntegrator.integrate(&mut body, 1.0, &bounds);
        assert_eq!(body.position(), Vec2::new(984.0, 16.0));
    }
}
