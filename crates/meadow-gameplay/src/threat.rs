//! Threat response: chase or flee when a hostile is close.

use glam::Vec2;
use meadow_common::{direction_to, distance, ensure_positive, ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Default aggro radius.
pub const DEFAULT_DETECTION_RADIUS: f32 = 200.0;

/// Default "stop chasing" radius.
pub const DEFAULT_CLOSE_RANGE: f32 = 60.0;

/// Aggro radius plus the inner band in which a chaser stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionZone {
    detection_radius: f32,
    close_range: f32,
}

impl Default for DetectionZone {
    fn default() -> Self {
        Self {
            detection_radius: DEFAULT_DETECTION_RADIUS,
            close_range: DEFAULT_CLOSE_RANGE,
        }
    }
}

impl DetectionZone {
    /// Creates a zone; `close_range` must be strictly inside `detection_radius`.
    pub fn new(detection_radius: f32, close_range: f32) -> ConfigResult<Self> {
        ensure_positive("detection radius", f64::from(detection_radius))?;
        ensure_positive("close range", f64::from(close_range))?;
        if close_range >= detection_radius {
            return Err(ConfigError::InvertedDetectionZone {
                close_range,
                detection_radius,
            });
        }
        Ok(Self {
            detection_radius,
            close_range,
        })
    }

    /// Returns the aggro radius.
    #[must_use]
    pub const fn detection_radius(&self) -> f32 {
        self.detection_radius
    }

    /// Returns the inner stop radius.
    #[must_use]
    pub const fn close_range(&self) -> f32 {
        self.close_range
    }
}

/// How an NPC reacts to a hostile inside its detection radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperament {
    /// Closes in and holds at close range
    #[default]
    Aggressive,
    /// Runs directly away
    Skittish,
}

/// Steering decision for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThreatResponse {
    /// Stand still next to the hostile
    Hold,
    /// Move toward the hostile with this velocity
    Pursue(Vec2),
    /// Move away from the hostile with this velocity
    Evade(Vec2),
    /// No threat; use the wander target
    Defer,
}

impl ThreatResponse {
    /// Returns the velocity for every decision except [`ThreatResponse::Defer`].
    #[must_use]
    pub fn velocity(self) -> Option<Vec2> {
        match self {
            Self::Hold => Some(Vec2::ZERO),
            Self::Pursue(v) | Self::Evade(v) => Some(v),
            Self::Defer => None,
        }
    }
}

/// Decides whether a hostile overrides wandering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatResponseController {
    zone: DetectionZone,
    speed: f32,
    temperament: Temperament,
}

impl ThreatResponseController {
    /// Creates a controller moving at `speed` units per second.
    pub fn new(zone: DetectionZone, speed: f32, temperament: Temperament) -> ConfigResult<Self> {
        ensure_positive("speed", f64::from(speed))?;
        Ok(Self {
            zone,
            speed,
            temperament,
        })
    }

    /// Returns the detection zone.
    #[must_use]
    pub const fn zone(&self) -> DetectionZone {
        self.zone
    }

    /// Returns the temperament.
    #[must_use]
    pub const fn temperament(&self) -> Temperament {
        self.temperament
    }

    /// Evaluates the response for an NPC at `own` against the nearest
    /// hostile, if any.
    #[must_use]
    pub fn respond(&self, own: Vec2, hostile: Option<Vec2>) -> ThreatResponse {
        let Some(hostile) = hostile else {
            return ThreatResponse::Defer;
        };

        let dist = distance(own, hostile);
        if dist >= self.zone.detection_radius {
            return ThreatResponse::Defer;
        }

        match self.temperament {
            Temperament::Aggressive if dist <= self.zone.close_range => ThreatResponse::Hold,
            Temperament::Aggressive => {
                ThreatResponse::Pursue(direction_to(own, hostile) * self.speed)
            },
            Temperament::Skittish => {
                let away = direction_to(hostile, own);
                // Standing exactly on the hostile gives no direction; pick one.
                let away = if away == Vec2::ZERO { Vec2::X } else { away };
                ThreatResponse::Evade(away * self.speed)
            },
        }
    }
}
