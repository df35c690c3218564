//! World-space geometry: rectangular bounds and distance helpers.
//!
//! Positions are `glam::Vec2` in world units (pixels on the
//! tilemap). The y axis grows downward, so `top < bottom`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Axis-aligned rectangle the simulation is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Left edge (minimum x)
    pub left: f32,
    /// Top edge (minimum y)
    pub top: f32,
    /// Right edge (maximum x)
    pub right: f32,
    /// Bottom edge (maximum y)
    pub bottom: f32,
}

impl WorldBounds {
    /// Creates bounds from an origin and a size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, ConfigError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidBounds { width, height });
        }
        Ok(Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        })
    }

    /// Returns the width of the bounds.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Returns the height of the bounds.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Returns the centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// Returns true if the point lies inside (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// Shrinks the bounds by `margin` on each axis.
    ///
    /// If the margin would invert an axis, that axis collapses onto its
    /// midpoint instead.
    #[must_use]
    pub fn inset(&self, margin: Vec2) -> Self {
        let (left, right) = shrink_axis(self.left, self.right, margin.x);
        let (top, bottom) = shrink_axis(self.top, self.bottom, margin.y);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Clamps a point into the bounds.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.left, self.right),
            point.y.clamp(self.top, self.bottom),
        )
    }
}

fn shrink_axis(min: f32, max: f32, margin: f32) -> (f32, f32) {
    let lo = min + margin;
    let hi = max - margin;
    if lo <= hi {
        (lo, hi)
    } else {
        let mid = (min + max) * 0.5;
        (mid, mid)
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector from `from` toward `to`, or zero when the points coincide.
#[must_use]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds() -> WorldBounds {
        WorldBounds::new(0.0, 0.0, 6398.0, 6398.0).expect("valid bounds")
    }

    #[test]
    fn test_bounds_dimensions() {
        let b = bounds();
        assert_eq!(b.width(), 6398.0);
        assert_eq!(b.height(), 6398.0);
        assert_eq!(b.center(), Vec2::new(3199.0, 3199.0));
    }

    #[test]
    fn test_bounds_reject_empty() {
        assert!(WorldBounds::new(0.0, 0.0, 0.0, 10.0).is_err());
        assert!(WorldBounds::new(0.0, 0.0, 10.0, -1.0).is_err());
        assert!(WorldBounds::new(0.0, 0.0, f32::NAN, 10.0).is_err());
    }

    #[test]
    fn test_inset_collapses_when_too_large() {
        let b = WorldBounds::new(0.0, 0.0, 20.0, 100.0).expect("valid bounds");
        let inner = b.inset(Vec2::new(30.0, 10.0));
        assert_eq!(inner.left, 10.0);
        assert_eq!(inner.right, 10.0);
        assert_eq!(inner.top, 10.0);
        assert_eq!(inner.bottom, 90.0);
    }

    #[test]
    fn test_direction_to_same_point() {
        assert_eq!(direction_to(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
        let dir = direction_to(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((dir.length() - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_clamp_stays_inside(x in -1e5f32..1e5, y in -1e5f32..1e5) {
            let b = bounds().inset(Vec2::new(26.0, 26.0));
            prop_assert!(b.contains(b.clamp(Vec2::new(x, y))));
        }
    }
}
