//! The skirmish world: entity registry, NPC brains, player and the tick.
//!
//! One [`Skirmish::tick`] runs, in order:
//! 1. advance the clock and fire due cooldown releases,
//! 2. the player update (movement, teleport, attacks); killed NPCs are
//!    removed only after each attack's scan,
//! 3. NPC steering (threat response, otherwise wander),
//! 4. the motion sink.

use std::fmt;
use std::time::Duration;

use ahash::AHashMap;
use glam::Vec2;
use meadow_common::{direction_to, distance, ConfigError, EntityId, IdAllocator, WorldBounds};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clock::{Clock, ManualClock, TimerQueue};
use crate::combat::CombatResolver;
use crate::config::SkirmishConfig;
use crate::entity::{Destroyable, Entity, EntityArena, EntityError, Movable, Role};
use crate::events::{EventBus, GameEvent, GameStats};
use crate::health::HealthPool;
use crate::motion::{EulerIntegrator, MotionSink};
use crate::player::{PlayerController, PlayerInput};
use crate::spawn::Spawner;
use crate::threat::ThreatResponseController;
use crate::wander::WanderController;

/// Errors raised while building or populating a skirmish.
#[derive(Debug, Error)]
pub enum SkirmishError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Entity registry failure
    #[error(transparent)]
    Entity(#[from] EntityError),
    /// A player already exists
    #[error("Player already spawned: {0}")]
    PlayerAlreadySpawned(EntityId),
}

/// Result type for skirmish operations.
pub type SkirmishResult<T> = Result<T, SkirmishError>;

/// Callback run once for every entity removed from the world.
///
/// The hook sees the entity as it was removed, already marked destroyed.
pub type RemovalHook = Box<dyn FnMut(&Entity)>;

/// Per-NPC behaviour state.
#[derive(Debug, Clone)]
pub struct NpcBrain {
    /// Idle wandering
    pub wander: WanderController,
    /// Reaction to the player
    pub threat: ThreatResponseController,
}

/// Summary of one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Simulation time after the tick
    pub now: Duration,
    /// Events published during the tick, up to the bus capacity
    pub events: Vec<GameEvent>,
    /// NPCs killed by the player during the tick
    pub kills: Vec<EntityId>,
    /// NPCs still alive after the tick
    pub npcs_alive: usize,
}

/// A bounded arena with one player and any number of NPCs.
pub struct Skirmish {
    config: SkirmishConfig,
    bounds: WorldBounds,
    spawner: Spawner,
    ids: IdAllocator,
    arena: EntityArena,
    npcs: Vec<EntityId>,
    brains: AHashMap<EntityId, NpcBrain>,
    player_id: Option<EntityId>,
    player: Option<PlayerController>,
    rng: fastrand::Rng,
    clock: ManualClock,
    timers: TimerQueue,
    events: EventBus,
    stats: GameStats,
    motion: Box<dyn MotionSink>,
    removal_hooks: Vec<RemovalHook>,
    tick_count: u64,
}

impl fmt::Debug for Skirmish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skirmish")
            .field("bounds", &self.bounds)
            .field("entities", &self.arena.len())
            .field("npcs", &self.npcs.len())
            .field("player_id", &self.player_id)
            .field("now", &self.clock.now())
            .field("timers", &self.timers)
            .field("stats", &self.stats)
            .field("removal_hooks", &self.removal_hooks.len())
            .field("tick_count", &self.tick_count)
            .finish_non_exhaustive()
    }
}

impl Skirmish {
    /// Creates an empty world from a validated configuration.
    pub fn new(config: SkirmishConfig) -> SkirmishResult<Self> {
        config.validate()?;
        let bounds = config.bounds()?;
        let rng = match config.world.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        info!(
            width = bounds.width(),
            height = bounds.height(),
            seed = ?config.world.seed,
            "skirmish created"
        );

        Ok(Self {
            config,
            bounds,
            spawner: Spawner::new(bounds),
            ids: IdAllocator::new(),
            arena: EntityArena::with_capacity(64),
            npcs: Vec::new(),
            brains: AHashMap::new(),
            player_id: None,
            player: None,
            rng,
            clock: ManualClock::new(),
            timers: TimerQueue::new(),
            events: EventBus::default(),
            stats: GameStats::default(),
            motion: Box::new(EulerIntegrator),
            removal_hooks: Vec::new(),
            tick_count: 0,
        })
    }

    /// Creates a world with the player and the configured initial NPCs.
    pub fn start(config: SkirmishConfig) -> SkirmishResult<Self> {
        let initial = config.world.initial_npcs as usize;
        let mut skirmish = Self::new(config)?;
        skirmish.spawn_player()?;
        skirmish.spawn_npcs(initial)?;
        Ok(skirmish)
    }

    /// Replaces the motion sink.
    pub fn set_motion_sink(&mut self, sink: Box<dyn MotionSink>) {
        self.motion = sink;
    }

    /// Registers a callback run once per removed entity.
    pub fn on_removal<F>(&mut self, hook: F)
    where
        F: FnMut(&Entity) + 'static,
    {
        self.removal_hooks.push(Box::new(hook));
    }

    /// Spawns the player at the centre of the world.
    pub fn spawn_player(&mut self) -> SkirmishResult<EntityId> {
        if let Some(existing) = self.player_id {
            return Err(SkirmishError::PlayerAlreadySpawned(existing));
        }

        let cfg = &self.config.player;
        let controller =
            PlayerController::new(cfg, &self.config.attacks, &self.config.teleport)?;
        let position = self.spawner.player_position();
        let entity = Entity::new(
            self.ids.allocate(),
            Role::Player,
            position,
            cfg.size() * 0.5,
            cfg.walk_speed,
            HealthPool::new(cfg.health)?,
        );

        let id = self.arena.insert(entity)?;
        self.player_id = Some(id);
        self.player = Some(controller);
        self.emit(GameEvent::EntitySpawned {
            entity_id: id,
            role: Role::Player,
            position,
        });
        info!(%id, ?position, "player spawned");
        Ok(id)
    }

    /// Spawns `count` NPCs at random positions.
    pub fn spawn_npcs(&mut self, count: usize) -> SkirmishResult<Vec<EntityId>> {
        let size = self.config.npc.size();
        let positions = self.spawner.npc_positions(size, count, &mut self.rng);
        let ids = positions
            .into_iter()
            .map(|position| self.spawn_npc_at(position))
            .collect::<SkirmishResult<Vec<_>>>()?;
        info!(count, total = self.npcs.len(), "npcs spawned");
        Ok(ids)
    }

    /// Spawns one NPC whose wander origin is `position`.
    ///
    /// Positions outside the world are pulled back inside it.
    pub fn spawn_npc_at(&mut self, position: Vec2) -> SkirmishResult<EntityId> {
        let cfg = &self.config.npc;
        let half_extents = cfg.size() * 0.5;
        let requested = position;
        let position = self.bounds.inset(half_extents).clamp(requested);
        if position != requested {
            debug!(?requested, ?position, "npc spawn clamped into bounds");
        }
        let brain = NpcBrain {
            wander: WanderController::new(position, cfg.wander_radius, half_extents)?,
            threat: ThreatResponseController::new(
                cfg.detection_zone()?,
                cfg.speed,
                cfg.temperament,
            )?,
        };
        let entity = Entity::new(
            self.ids.allocate(),
            Role::Npc,
            position,
            half_extents,
            cfg.speed,
            HealthPool::new(cfg.health)?,
        );

        let id = self.arena.insert(entity)?;
        self.npcs.push(id);
        self.brains.insert(id, brain);
        self.emit(GameEvent::EntitySpawned {
            entity_id: id,
            role: Role::Npc,
            position,
        });
        debug!(%id, ?position, "npc spawned");
        Ok(id)
    }

    /// Removes an entity from the world and runs the removal hooks.
    ///
    /// Returns false, after logging a warning, when the entity is unknown or
    /// already gone.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let mut entity = match self.arena.despawn(id) {
            Ok(entity) => entity,
            Err(err) => {
                warn!(%id, %err, "despawn ignored");
                return false;
            },
        };

        entity.mark_destroyed();
        let role = entity.role();
        match role {
            Role::Npc => {
                self.npcs.retain(|npc| *npc != id);
                self.brains.remove(&id);
            },
            Role::Player => {
                self.player_id = None;
                self.player = None;
            },
        }

        for hook in &mut self.removal_hooks {
            hook(&entity);
        }
        self.emit(GameEvent::EntityDestroyed {
            entity_id: id,
            role,
        });
        info!(%id, ?role, "entity destroyed");
        true
    }

    /// Advances the world by `dt` seconds.
    pub fn tick(&mut self, dt: f32, input: &PlayerInput) -> TickReport {
        let step = if dt >= 0.0 {
            Duration::try_from_secs_f32(dt).ok()
        } else {
            None
        };
        let (dt, step) = match step {
            Some(step) => (dt, step),
            None => {
                warn!(dt, "invalid frame delta, treating as zero");
                (0.0, Duration::ZERO)
            },
        };

        self.tick_count += 1;
        self.clock.advance(step);
        self.timers.run_due(self.clock.now());

        let kills = self.update_player(dt, input);
        self.steer_npcs(dt);
        self.integrate_npcs(dt);

        TickReport {
            tick: self.tick_count,
            now: self.clock.now(),
            events: self.events.drain(),
            kills,
            npcs_alive: self.npcs.len(),
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.stats.record(&event);
        self.events.publish(event);
    }

    fn update_player(&mut self, dt: f32, input: &PlayerInput) -> Vec<EntityId> {
        let Some(player_id) = self.player_id else {
            return Vec::new();
        };
        let (Some(controller), Ok(body)) = (self.player.as_mut(), self.arena.get_mut(player_id))
        else {
            return Vec::new();
        };

        let actions = controller.update(
            body,
            input,
            dt,
            &self.bounds,
            &self.clock,
            &mut self.timers,
        );
        let origin = body.position();
        let range = controller.attack_range();

        if let Some(jump) = actions.teleport {
            self.emit(GameEvent::Teleported {
                entity_id: player_id,
                from: jump.from,
                to: jump.to,
            });
        }
        for slot in actions.rejected {
            self.emit(GameEvent::AttackRejected {
                entity_id: player_id,
                slot,
            });
        }

        let mut kills = Vec::new();
        for (slot, tier) in actions.attacks {
            let report = CombatResolver::resolve_attack(
                origin,
                self.arena.iter_alive_mut(Role::Npc),
                range,
                tier.damage,
            );
            debug!(?slot, hits = report.hits.len(), "attack resolved");

            for hit in &report.hits {
                self.emit(GameEvent::EntityDamaged {
                    entity_id: hit.target,
                    role: Role::Npc,
                    damage: hit.damage,
                    source: Some(player_id),
                });
            }
            for target in report.depleted {
                if self.despawn(target) {
                    kills.push(target);
                }
            }
        }

        if let Some(controller) = self.player.as_mut() {
            controller.add_kills(kills.len() as u32);
        }
        kills
    }

    fn steer_npcs(&mut self, dt: f32) {
        let hostile = self
            .player_id
            .and_then(|id| self.arena.get(id).ok())
            .filter(|player| player.is_detectable() && player.is_alive())
            .map(Entity::position);

        for id in &self.npcs {
            let (Some(brain), Ok(npc)) = (self.brains.get_mut(id), self.arena.get_mut(*id)) else {
                continue;
            };
            if !npc.is_alive() {
                continue;
            }

            let position = npc.position();
            let velocity = match brain.threat.respond(position, hostile).velocity() {
                Some(velocity) => velocity,
                None => {
                    let target = brain.wander.target(position, Some(&self.bounds), &mut self.rng);
                    // Never step past the target in one tick.
                    let mut speed = npc.speed();
                    if dt > 0.0 {
                        speed = speed.min(distance(position, target) / dt);
                    }
                    direction_to(position, target) * speed
                },
            };
            npc.set_velocity(velocity);
        }
    }

    fn integrate_npcs(&mut self, dt: f32) {
        for id in &self.npcs {
            if let Ok(npc) = self.arena.get_mut(*id) {
                self.motion.integrate(npc, dt, &self.bounds);
            }
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SkirmishConfig {
        &self.config
    }

    /// Returns the world bounds.
    #[must_use]
    pub const fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    /// Returns the simulation time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Returns the number of ticks run.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Returns the running totals.
    #[must_use]
    pub const fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Returns the number of cooldown releases still pending.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Returns the player's ID, if spawned.
    #[must_use]
    pub const fn player_id(&self) -> Option<EntityId> {
        self.player_id
    }

    /// Returns the player entity.
    #[must_use]
    pub fn player(&self) -> Option<&Entity> {
        self.player_id.and_then(|id| self.arena.get(id).ok())
    }

    /// Returns the player controller.
    #[must_use]
    pub const fn player_controller(&self) -> Option<&PlayerController> {
        self.player.as_ref()
    }

    /// Hides or reveals the player to NPCs.
    pub fn set_player_detectable(&mut self, detectable: bool) {
        if let Some(id) = self.player_id {
            if let Ok(player) = self.arena.get_mut(id) {
                player.set_detectable(detectable);
            }
        }
    }

    /// Returns the live NPC IDs in spawn order.
    #[must_use]
    pub fn npc_ids(&self) -> &[EntityId] {
        &self.npcs
    }

    /// Returns the number of live NPCs.
    #[must_use]
    pub fn npc_count(&self) -> usize {
        self.npcs.len()
    }

    /// Returns an entity by ID.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.arena.get(id).ok()
    }

    /// Returns an entity by ID mutably.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.arena.get_mut(id).ok()
    }

    /// Returns an NPC's behaviour state.
    #[must_use]
    pub fn brain(&self, id: EntityId) -> Option<&NpcBrain> {
        self.brains.get(&id)
    }

    /// Returns all entities in the world.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.arena.iter()
    }
}
