//! Actor pools and the tag registry.
//!
//! Short-lived actors (bullets, enemies) are never despawned in normal play.
//! Each kind lives in an [`EntityPool`]: a sequence of instances, created from
//! one blueprint, that are activated and deactivated in place. "Destroyed"
//! actors just become invisible, collide with nothing, and wait to be reused.
//!
//! Slots are scanned in insertion order and the first inactive one wins; there
//! is no free-list reordering. When every slot is busy the pool grows by one
//! instance — acquisition never fails for capacity reasons.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use super::SpawnRequest;
use crate::common::config::GameConfig;
use crate::plugins::core::GameRng;
use crate::plugins::lifetime::LifetimeScheduler;

/// Lifecycle of a pooled actor instance.
///
/// Inactive -> Active on acquisition; Active -> PendingReturn on lifetime
/// expiry or a terminal collision; the return commit completes the cycle.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActorState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

/// Membership card of a pooled actor: which pool it must be returned to.
#[derive(Component, Debug, Clone)]
pub struct Pooled {
    pub tag: String,
}

/// Marker for actors allocated outside any pool (explosions, power-ups,
/// meteor split children). Detached actors are genuinely despawned when they
/// die instead of being recycled.
#[derive(Component, Debug, Clone, Copy)]
pub struct Detached;

/// Everything a spawn hook may need, threaded through acquisition so the
/// hook runs synchronously inside it.
pub struct SpawnContext<'w, 's, 'a> {
    pub commands: &'a mut Commands<'w, 's>,
    pub scheduler: &'a mut LifetimeScheduler,
    pub rng: &'a mut GameRng,
    pub config: &'a GameConfig,
}

/// A poolable actor kind.
///
/// `instantiate` creates one inactive instance (warm-up and growth);
/// `on_spawn` runs once per acquisition and must restart the instance's
/// lifetime timer, reset its transient state, and apply its initial
/// trajectory.
pub trait ActorBlueprint: Send + Sync + 'static {
    fn instantiate(&self, commands: &mut Commands) -> Entity;

    fn on_spawn(&self, ctx: &mut SpawnContext, actor: Entity, req: &SpawnRequest);

    /// Render layer the kind is placed on when activated.
    fn layer_z(&self) -> f32 {
        1.0
    }
}

/// Immutable registration record for one pool.
pub struct PoolDescriptor {
    pub tag: &'static str,
    pub blueprint: Box<dyn ActorBlueprint>,
    pub initial_size: usize,
}

#[derive(Debug)]
struct PoolSlot {
    entity: Entity,
    active: bool,
}

pub struct EntityPool {
    blueprint: Box<dyn ActorBlueprint>,
    slots: Vec<PoolSlot>,
}

impl EntityPool {
    fn new(blueprint: Box<dyn ActorBlueprint>) -> Self {
        Self {
            blueprint,
            slots: Vec::new(),
        }
    }

    /// Instance count, active or not. Never shrinks.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.slots.iter().any(|slot| slot.entity == entity)
    }

    fn warm_up(&mut self, commands: &mut Commands, tag: &str, initial_size: usize) {
        for _ in 0..initial_size {
            let entity = self.instantiate_inactive(commands, tag);
            self.slots.push(PoolSlot {
                entity,
                active: false,
            });
        }
    }

    /// Create one instance and apply the pool-side inactive invariants.
    /// Kind-specific components come from the blueprint.
    fn instantiate_inactive(&self, commands: &mut Commands, tag: &str) -> Entity {
        let entity = self.blueprint.instantiate(commands);
        commands.entity(entity).insert((
            Pooled {
                tag: tag.to_owned(),
            },
            ActorState::Inactive,
            Visibility::Hidden,
        ));
        entity
    }

    /// Reuse the first inactive instance, or grow by one. The spawn hook has
    /// completed by the time this returns.
    fn acquire(&mut self, ctx: &mut SpawnContext, req: &SpawnRequest) -> Entity {
        let entity = match self.slots.iter_mut().find(|slot| !slot.active) {
            Some(slot) => {
                slot.active = true;
                slot.entity
            }
            None => {
                debug!("expanding pool for tag: {}", req.tag);
                let entity = self.instantiate_inactive(ctx.commands, req.tag);
                self.slots.push(PoolSlot {
                    entity,
                    active: true,
                });
                entity
            }
        };

        ctx.commands.entity(entity).insert((
            ActorState::Active,
            Visibility::Visible,
            Transform::from_translation(req.pos.extend(self.blueprint.layer_z()))
                .with_rotation(Quat::from_rotation_z(req.rotation)),
        ));
        self.blueprint.on_spawn(ctx, entity, req);
        entity
    }

    fn release(&mut self, entity: Entity) -> bool {
        match self.slots.iter_mut().find(|slot| slot.entity == entity) {
            Some(slot) => {
                slot.active = false;
                true
            }
            None => false,
        }
    }
}

/// Tag -> pool mapping; the single entry point used by spawners.
#[derive(Resource, Default)]
pub struct PoolRegistry {
    pools: HashMap<String, EntityPool>,
}

impl PoolRegistry {
    /// Register and warm up a pool. Re-registering a tag replaces the
    /// previous pool (last write wins); the old instances stay in the world
    /// but are never handed out again.
    pub fn register(&mut self, commands: &mut Commands, descriptor: PoolDescriptor) {
        let PoolDescriptor {
            tag,
            blueprint,
            initial_size,
        } = descriptor;

        if self.pools.contains_key(tag) {
            warn!("pool with tag {tag} re-registered; replacing the previous pool");
        }

        let mut pool = EntityPool::new(blueprint);
        pool.warm_up(commands, tag, initial_size);
        self.pools.insert(tag.to_owned(), pool);
    }

    /// Acquire an actor from the pool named by the request's tag.
    ///
    /// An unknown tag is a recoverable mistake: it is logged and the caller
    /// gets `None` to no-op on.
    pub fn spawn(&mut self, ctx: &mut SpawnContext, req: &SpawnRequest) -> Option<Entity> {
        let Some(pool) = self.pools.get_mut(req.tag) else {
            warn!("pool with tag {} doesn't exist", req.tag);
            return None;
        };
        Some(pool.acquire(ctx, req))
    }

    /// Hand an instance back to its pool. Returns whether the pool knew it.
    pub fn release(&mut self, tag: &str, entity: Entity) -> bool {
        self.pools
            .get_mut(tag)
            .is_some_and(|pool| pool.release(entity))
    }

    pub fn pool(&self, tag: &str) -> Option<&EntityPool> {
        self.pools.get(tag)
    }
}
