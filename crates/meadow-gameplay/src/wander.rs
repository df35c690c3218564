//! Idle wandering for NPCs.
//!
//! An NPC alternates between walking out to a random point near its spawn
//! origin and walking back. Transitions are purely distance-triggered: the
//! controller holds no timers, so repeated queries from the same position
//! return the same target.

use std::f32::consts::TAU;

use glam::Vec2;
use meadow_common::{distance, ensure_positive, ConfigResult, WorldBounds};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Distance at which a target or the origin counts as reached.
pub const ARRIVAL_THRESHOLD: f32 = 5.0;

/// Extra clearance kept between wander targets and the world edge.
pub const BOUNDS_MARGIN: f32 = 10.0;

/// Observable phase of the wander cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WanderState {
    /// Standing at (or not yet left) the origin
    AtOrigin,
    /// Walking out to a random target
    MovingToTarget,
    /// Walking back to the origin
    Returning,
}

/// Picks wander targets around a fixed origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WanderController {
    origin: Vec2,
    target: Option<Vec2>,
    radius: f32,
    wandering: bool,
    half_extents: Vec2,
}

impl WanderController {
    /// Creates a controller anchored at `origin`.
    pub fn new(origin: Vec2, radius: f32, half_extents: Vec2) -> ConfigResult<Self> {
        ensure_positive("wander radius", f64::from(radius))?;
        Ok(Self {
            origin,
            target: None,
            radius,
            wandering: false,
            half_extents,
        })
    }

    /// Returns the origin, pulled inside the wander area once bounds are known.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Returns the current target, if one has been chosen.
    #[must_use]
    pub const fn current_target(&self) -> Option<Vec2> {
        self.target
    }

    /// Returns the wander radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns whether the controller is heading outward.
    #[must_use]
    pub const fn is_wandering(&self) -> bool {
        self.wandering
    }

    /// Classifies the cycle phase for an NPC at `position`.
    #[must_use]
    pub fn state(&self, position: Vec2) -> WanderState {
        if self.wandering {
            WanderState::MovingToTarget
        } else if self.target.is_none() || distance(position, self.origin) < ARRIVAL_THRESHOLD {
            WanderState::AtOrigin
        } else {
            WanderState::Returning
        }
    }

    /// Returns the point the NPC should walk toward.
    ///
    /// Without bounds (the NPC has not been placed in a world) this returns
    /// the zero vector and leaves the state untouched.
    pub fn target(
        &mut self,
        position: Vec2,
        bounds: Option<&WorldBounds>,
        rng: &mut fastrand::Rng,
    ) -> Vec2 {
        let Some(bounds) = bounds else {
            return Vec2::ZERO;
        };

        let area = bounds.inset(self.half_extents + Vec2::splat(BOUNDS_MARGIN));
        let home = area.clamp(self.origin);
        if home != self.origin {
            debug!(origin = ?self.origin, ?home, "wander origin moved inside bounds");
            self.origin = home;
        }

        let mut target = match self.target {
            Some(target) if self.wandering => target,
            _ => self.return_to_origin(),
        };

        if self.wandering && distance(position, target) < ARRIVAL_THRESHOLD {
            debug!(?target, "wander target reached, returning to origin");
            target = self.return_to_origin();
        }

        if !self.wandering && distance(position, self.origin) < ARRIVAL_THRESHOLD {
            target = self.pick_outward_target(&area, rng);
        }

        target
    }

    fn return_to_origin(&mut self) -> Vec2 {
        self.wandering = false;
        self.target = Some(self.origin);
        self.origin
    }

    fn pick_outward_target(&mut self, area: &WorldBounds, rng: &mut fastrand::Rng) -> Vec2 {
        let angle = rng.f32() * TAU;
        let reach = rng.f32() * self.radius;
        let raw = self.origin + Vec2::new(angle.cos(), angle.sin()) * reach;
        let target = area.clamp(raw);

        debug!(?target, "picked new wander target");
        self.wandering = true;
        self.target = Some(target);
        target
    }
}
