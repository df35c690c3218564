//! # Meadow Common
//!
//! Common types and shared abstractions for Meadow.
//!
//! This crate provides foundational types used across the Meadow crates:
//! - ID types (EntityId and its allocator)
//! - World bounds and distance helpers
//! - Configuration error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod geometry;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::geometry::*;
    pub use crate::ids::*;
    pub use glam::Vec2;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_exports() {
        let mut ids = IdAllocator::new();
        let bounds = WorldBounds::new(0.0, 0.0, 100.0, 100.0).expect("valid bounds");
        assert!(ids.allocate().is_valid());
        assert!(bounds.contains(Vec2::new(50.0, 50.0)));
    }
}
