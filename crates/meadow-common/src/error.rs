//! Error types for Meadow.

use thiserror::Error;

/// Invalid configuration detected while constructing a component.
///
/// Every variant is raised at construction time; nothing in the tick loop
/// produces one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// World bounds with a non-positive extent
    #[error("world bounds must have positive size, got {width}x{height}")]
    InvalidBounds {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },

    /// A value that must be strictly positive was not
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Name of the offending field
        field: &'static str,
        /// Value that was supplied
        value: f64,
    },

    /// Detection zone whose inner radius is not inside the outer one
    #[error("close range {close_range} must be smaller than detection radius {detection_radius}")]
    InvertedDetectionZone {
        /// Inner "stop chasing" radius
        close_range: f32,
        /// Outer aggro radius
        detection_radius: f32,
    },
}

/// Result type alias for configuration checks.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Checks that a value is strictly positive (NaN fails).
pub fn ensure_positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("radius", 1.0).is_ok());
        assert_eq!(
            ensure_positive("radius", 0.0),
            Err(ConfigError::NonPositive {
                field: "radius",
                value: 0.0
            })
        );
        assert!(ensure_positive("radius", f64::NAN).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvertedDetectionZone {
            close_range: 60.0,
            detection_radius: 50.0,
        };
        assert_eq!(
            err.to_string(),
            "close range 60 must be smaller than detection radius 50"
        );
    }
}
