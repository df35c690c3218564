//! Event bus for inter-system communication.
//!
//! The world owns one bus; systems publish into it during a tick and the
//! world drains it at the end of the tick.

use crossbeam_channel::{bounded, Receiver, Sender};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use meadow_common::EntityId;

use crate::combat::AttackSlot;
use crate::entity::Role;

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Entity spawned
    EntitySpawned {
        /// Entity ID
        entity_id: EntityId,
        /// Player or NPC
        role: Role,
        /// Spawn position
        position: Vec2,
    },
    /// Entity took damage
    EntityDamaged {
        /// Entity ID
        entity_id: EntityId,
        /// Player or NPC
        role: Role,
        /// Damage amount
        damage: u32,
        /// Source entity (if any)
        source: Option<EntityId>,
    },
    /// Entity destroyed
    EntityDestroyed {
        /// Entity ID
        entity_id: EntityId,
        /// Player or NPC
        role: Role,
    },
    /// An attack was dropped because its slot was cooling down
    AttackRejected {
        /// Attacker
        entity_id: EntityId,
        /// Slot that was pressed
        slot: AttackSlot,
    },
    /// Entity teleported
    Teleported {
        /// Entity ID
        entity_id: EntityId,
        /// Position before the jump
        from: Vec2,
        /// Position after the jump
        to: Vec2,
    },
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<GameEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GameEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: GameEvent) {
        // Non-blocking send - if full, event is dropped
        if self.sender.try_send(event).is_err() {
            warn!(capacity = self.capacity, "event bus full, dropping event");
        }
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Running totals shown on the HUD.
///
/// The world records each event as it is published, so the totals hold
/// even when the bus is full and drops events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    /// NPCs spawned
    pub spawned: u32,
    /// NPCs killed
    pub killed: u32,
    /// Total damage dealt to NPCs
    pub damage: u64,
}

impl GameStats {
    /// Folds one event into the totals.
    pub fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EntitySpawned {
                role: Role::Npc, ..
            } => self.spawned += 1,
            GameEvent::EntityDestroyed {
                role: Role::Npc, ..
            } => self.killed += 1,
            GameEvent::EntityDamaged {
                role: Role::Npc,
                damage,
                ..
            } => self.damage += u64::from(*damage),
            _ => {},
        }
    }

    /// Returns how many spawned NPCs are still alive.
    #[must_use]
    pub const fn alive(&self) -> u32 {
        self.spawned.saturating_sub(self.killed)
    }
}
