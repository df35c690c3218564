//! # Meadow Gameplay
//!
//! Headless simulation core for the meadow skirmish.
//!
//! This crate provides the entity layer and all combat systems:
//! - Entities (player, NPCs) in an index-stable arena
//! - Health pools and area melee combat
//! - NPC wandering and threat response
//! - Cooldown gates on a deterministic clock and scheduler
//! - Player controller with run toggle and teleport
//! - Event bus and game statistics
//! - The [`Skirmish`] world tick

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod clock;
pub mod combat;
pub mod config;
pub mod cooldown;
pub mod entity;
pub mod events;
pub mod health;
pub mod motion;
pub mod player;
pub mod skirmish;
pub mod spawn;
pub mod threat;
pub mod wander;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::clock::*;
    pub use crate::combat::*;
    pub use crate::config::*;
    pub use crate::cooldown::*;
    pub use crate::entity::*;
    pub use crate::events::*;
    pub use crate::health::*;
    pub use crate::motion::*;
    pub use crate::player::*;
    pub use crate::skirmish::*;
    pub use crate::spawn::*;
    pub use crate::threat::*;
    pub use crate::wander::*;
}

pub use prelude::*;
