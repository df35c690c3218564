//! Entity system with arena-based storage.
//!
//! Entities are plain data; behaviour lives in controllers that borrow them.
//! Engine-facing code sees them through the capability traits [`Actor`],
//! [`Movable`], [`Damageable`] and [`Destroyable`].

use ahash::AHashMap;
use glam::Vec2;
use meadow_common::EntityId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::health::{DamageOutcome, HealthPool};

/// Error types for entity operations.
#[derive(Debug, Error)]
pub enum EntityError {
    /// Entity not found
    #[error("Entity not found: {0}")]
    NotFound(EntityId),
    /// Entity already despawned
    #[error("Entity already despawned: {0}")]
    AlreadyDespawned(EntityId),
    /// Entity with this ID is already stored
    #[error("Entity already registered: {0}")]
    AlreadyRegistered(EntityId),
}

/// Result type for entity operations.
pub type EntityResult<T> = Result<T, EntityError>;

/// Role of an entity in the skirmish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Player character
    Player,
    /// Non-player character
    Npc,
}

/// Anything with an identity and a position.
pub trait Actor {
    /// Returns the entity ID.
    fn id(&self) -> EntityId;
    /// Returns the world position.
    fn position(&self) -> Vec2;
}

/// An actor whose position is driven by a velocity.
pub trait Movable: Actor {
    /// Returns the desired velocity in units per second.
    fn velocity(&self) -> Vec2;
    /// Sets the desired velocity.
    fn set_velocity(&mut self, velocity: Vec2);
    /// Moves the actor.
    fn set_position(&mut self, position: Vec2);
}

/// An actor that can take damage.
pub trait Damageable: Actor {
    /// Returns the health pool.
    fn health(&self) -> &HealthPool;
    /// Returns the health pool mutably.
    fn health_mut(&mut self) -> &mut HealthPool;

    /// Applies damage to the health pool.
    fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        self.health_mut().apply_damage(amount)
    }
}

/// An actor with a one-shot destruction lifecycle.
pub trait Destroyable: Actor {
    /// Returns whether the actor has been destroyed.
    fn is_destroyed(&self) -> bool;
    /// Marks the actor destroyed. Returns false if it already was.
    fn mark_destroyed(&mut self) -> bool;
}

/// An entity in the game world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier
    id: EntityId,
    /// Player or NPC
    role: Role,
    /// World position (centre of the body)
    position: Vec2,
    /// Desired velocity, consumed by the motion sink
    velocity: Vec2,
    /// Half of the body's width and height
    half_extents: Vec2,
    /// Movement speed in units per second
    speed: f32,
    /// Hit points
    health: HealthPool,
    /// Whether hostile NPCs can notice this entity
    detectable: bool,
    /// Set once the entity has been destroyed
    destroyed: bool,
}

impl Entity {
    /// Creates a new entity.
    #[must_use]
    pub fn new(
        id: EntityId,
        role: Role,
        position: Vec2,
        half_extents: Vec2,
        speed: f32,
        health: HealthPool,
    ) -> Self {
        Self {
            id,
            role,
            position,
            velocity: Vec2::ZERO,
            half_extents,
            speed,
            health,
            detectable: role == Role::Player,
            destroyed: false,
        }
    }

    /// Returns the entity's unique ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the entity's world position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Returns the entity's current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Returns half of the body size.
    #[must_use]
    pub const fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    /// Returns the movement speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Returns the health pool.
    #[must_use]
    pub const fn health(&self) -> &HealthPool {
        &self.health
    }

    /// Returns whether NPCs can detect this entity.
    #[must_use]
    pub const fn is_detectable(&self) -> bool {
        self.detectable
    }

    /// Toggles whether NPCs can detect this entity.
    pub fn set_detectable(&mut self, detectable: bool) {
        self.detectable = detectable;
    }

    /// Returns whether the entity is still part of the simulation.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.destroyed && !self.health.is_depleted()
    }
}

impl Actor for Entity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}

impl Movable for Entity {
    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }
}

impl Damageable for Entity {
    fn health(&self) -> &HealthPool {
        &self.health
    }

    fn health_mut(&mut self) -> &mut HealthPool {
        &mut self.health
    }
}

impl Destroyable for Entity {
    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn mark_destroyed(&mut self) -> bool {
        !std::mem::replace(&mut self.destroyed, true)
    }
}

/// Arena-based entity storage.
///
/// Slots are never shifted: despawning leaves a tombstone that is reused by
/// a later spawn, so indices held during a scan stay valid while entities
/// are removed.
#[derive(Debug, Default)]
pub struct EntityArena {
    /// Storage slots for entities
    entities: Vec<Option<Entity>>,
    /// Free slot indices for reuse
    free_list: Vec<usize>,
    /// Map from EntityId to slot index for fast lookup
    id_to_index: AHashMap<EntityId, usize>,
}

impl EntityArena {
    /// Creates a new empty entity arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new entity arena with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            id_to_index: AHashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.id_to_index.len()
    }

    /// Returns true if there are no stored entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id_to_index.is_empty()
    }

    /// Returns the total slot count (including tombstones).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    /// Inserts an entity into the arena.
    pub fn insert(&mut self, entity: Entity) -> EntityResult<EntityId> {
        let id = entity.id();
        if self.id_to_index.contains_key(&id) {
            return Err(EntityError::AlreadyRegistered(id));
        }

        let index = if let Some(free_index) = self.free_list.pop() {
            self.entities[free_index] = Some(entity);
            free_index
        } else {
            let index = self.entities.len();
            self.entities.push(Some(entity));
            index
        };

        self.id_to_index.insert(id, index);
        Ok(id)
    }

    /// Despawns an entity by ID.
    ///
    /// Returns the despawned entity on success.
    pub fn despawn(&mut self, id: EntityId) -> EntityResult<Entity> {
        let index = self
            .id_to_index
            .remove(&id)
            .ok_or(EntityError::NotFound(id))?;

        let entity = self.entities[index]
            .take()
            .ok_or(EntityError::AlreadyDespawned(id))?;

        self.free_list.push(index);
        Ok(entity)
    }

    /// Gets a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> EntityResult<&Entity> {
        let index = self.id_to_index.get(&id).ok_or(EntityError::NotFound(id))?;

        self.entities[*index]
            .as_ref()
            .ok_or(EntityError::NotFound(id))
    }

    /// Gets a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> EntityResult<&mut Entity> {
        let index = self.id_to_index.get(&id).ok_or(EntityError::NotFound(id))?;

        self.entities[*index]
            .as_mut()
            .ok_or(EntityError::NotFound(id))
    }

    /// Checks if an entity with the given ID exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.id_to_index.contains_key(&id)
    }

    /// Returns an iterator over all stored entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter_map(|opt| opt.as_ref())
    }

    /// Returns a mutable iterator over all stored entities in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut().filter_map(|opt| opt.as_mut())
    }

    /// Returns an iterator over entities with a specific role.
    pub fn iter_by_role(&self, role: Role) -> impl Iterator<Item = &Entity> {
        self.iter().filter(move |e| e.role() == role)
    }

    /// Returns a mutable iterator over living entities with a specific role.
    pub fn iter_alive_mut(&mut self, role: Role) -> impl Iterator<Item = &mut Entity> {
        self.iter_mut()
            .filter(move |e| e.role() == role && e.is_alive())
    }

    /// Clears all entities from the arena.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.free_list.clear();
        self.id_to_index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meadow_common::IdAllocator;

    fn make(ids: &mut IdAllocator, role: Role) -> Entity {
        Entity::new(
            ids.allocate(),
            role,
            Vec2::ZERO,
            Vec2::splat(16.0),
            200.0,
            HealthPool::new(1000).expect("valid pool"),
        )
    }

    #[test]
    fn test_entity_defaults() {
        let mut ids = IdAllocator::new();
        let player = make(&mut ids, Role::Player);
        let npc = make(&mut ids, Role::Npc);
        assert!(player.is_detectable());
        assert!(!npc.is_detectable());
        assert!(npc.is_alive());
        assert_eq!(npc.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_mark_destroyed_once() {
        let mut ids = IdAllocator::new();
        let mut npc = make(&mut ids, Role::Npc);
        assert!(npc.mark_destroyed());
        assert!(!npc.mark_destroyed());
        assert!(npc.is_destroyed());
        assert!(!npc.is_alive());
    }

    #[test]
    fn test_take_damage_through_trait() {
        let mut ids = IdAllocator::new();
        let mut npc = make(&mut ids, Role::Npc);
        let outcome = npc.take_damage(1000);
        assert!(outcome.just_depleted());
        assert!(!npc.is_alive());
    }

    #[test]
    fn test_arena_insert_and_get() {
        let mut ids = IdAllocator::new();
        let mut arena = EntityArena::new();

        let id = arena.insert(make(&mut ids, Role::Player)).expect("insert");
        assert!(id.is_valid());
        assert_eq!(arena.len(), 1);

        let entity = arena.get(id).expect("Entity should exist");
        assert_eq!(entity.role(), Role::Player);
    }

    #[test]
    fn test_arena_rejects_duplicate() {
        let mut ids = IdAllocator::new();
        let mut arena = EntityArena::new();
        let entity = make(&mut ids, Role::Npc);
        let copy = entity.clone();

        arena.insert(entity).expect("first insert");
        assert!(matches!(
            arena.insert(copy),
            Err(EntityError::AlreadyRegistered(_))
        ));
    }

    #[test]
    fn test_arena_despawn() {
        let mut ids = IdAllocator::new();
        let mut arena = EntityArena::new();

        let id = arena.insert(make(&mut ids, Role::Player)).expect("insert");
        let entity = arena.despawn(id).expect("Despawn should succeed");
        assert_eq!(entity.role(), Role::Player);
        assert_eq!(arena.len(), 0);
        assert!(arena.get(id).is_err());
        assert!(matches!(arena.despawn(id), Err(EntityError::NotFound(_))));
    }

    #[test]
    fn test_arena_reuse_slot() {
        let mut ids = IdAllocator::new();
        let mut arena = EntityArena::new();

        let id1 = arena.insert(make(&mut ids, Role::Npc)).expect("insert");
        let _ = arena.despawn(id1);
        assert_eq!(arena.capacity(), 1);

        let id2 = arena.insert(make(&mut ids, Role::Npc)).expect("insert");
        assert_eq!(arena.capacity(), 1);
        assert_eq!(arena.len(), 1);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_arena_iter_by_role() {
        let mut ids = IdAllocator::new();
        let mut arena = EntityArena::with_capacity(4);

        arena.insert(make(&mut ids, Role::Player)).expect("insert");
        arena.insert(make(&mut ids, Role::Npc)).expect("insert");
        let dead = arena.insert(make(&mut ids, Role::Npc)).expect("insert");
        arena
            .get_mut(dead)
            .expect("should exist")
            .take_damage(5000);

        assert_eq!(arena.iter().count(), 3);
        assert_eq!(arena.iter_by_role(Role::Npc).count(), 2);
        assert_eq!(arena.iter_alive_mut(Role::Npc).count(), 1);
    }

    #[test]
    fn test_arena_clear() {
        let mut ids = IdAllocator::new();
        let mut arena = EntityArena::new();
        arena.insert(make(&mut ids, Role::Player)).expect("insert");
        arena.clear();
        assert!(arena.is_empty());
        assert!(!arena.contains(EntityId::from_raw(1)));
    }
}
