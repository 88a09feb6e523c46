//! Pooling plugin: message-based producer -> consumer spawning over tagged
//! actor pools.
//!
//! # Data flow (big picture)
//! ```text
//!   Update schedule
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  Producers: player fire control, enemy spawner                       │
//! │      - write: SpawnRequest { tag, pos, rotation, heading } message   │
//! │                                                                      │
//! │  Consumer: allocate_from_pools                                       │
//! │      - reads: SpawnRequest messages                                  │
//! │      - mutates: PoolRegistry (slot claim / growth)                   │
//! │      - runs each blueprint's spawn hook synchronously                │
//! └──────────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!   FixedPostUpdate schedule
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  Physics emits CollisionStart messages (Avian)                       │
//! │  Resolvers flip terminal actors to ActorState::PendingReturn         │
//! │  return_to_pool_commit restores the inactive invariants and releases │
//! │  the slot                                                            │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Producers do **not** borrow `ResMut<PoolRegistry>`; they only enqueue
//! intent. The allocator is the single writer that mutates the pools, which
//! keeps pool mutation localized and the producers trivially concurrent.
//!
//! Inactivity is value-based, not structural: a returned actor is hidden,
//! stripped of velocity, and given empty collision filters, but keeps its
//! archetype. That avoids archetype churn on the hottest path in the game.

pub mod registry;

use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

pub use registry::{
    ActorBlueprint, ActorState, Detached, EntityPool, PoolDescriptor, PoolRegistry, Pooled,
    SpawnContext,
};

use crate::common::config::GameConfig;
use crate::plugins::core::GameRng;
use crate::plugins::lifetime::LifetimeScheduler;

/// Buffered intent to activate one actor from the pool named by `tag`.
///
/// `heading` is the initial travel direction; each blueprint's spawn hook
/// turns it into a velocity (and, for bullets, a facing).
#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnRequest {
    pub tag: &'static str,
    pub pos: Vec2,
    pub rotation: f32,
    pub heading: Vec2,
}

/// Consumer: drain spawn requests into pool acquisitions.
pub fn allocate_from_pools(
    mut registry: ResMut<PoolRegistry>,
    mut reader: MessageReader<SpawnRequest>,
    mut commands: Commands,
    mut scheduler: ResMut<LifetimeScheduler>,
    mut rng: ResMut<GameRng>,
    config: Res<GameConfig>,
) {
    for req in reader.read() {
        let mut ctx = SpawnContext {
            commands: &mut commands,
            scheduler: &mut scheduler,
            rng: &mut rng,
            config: &config,
        };
        // Unknown tags are logged by the registry; the request is dropped.
        let _ = registry.spawn(&mut ctx, req);
    }
}

/// Return commit: recycle actors marked `PendingReturn`.
///
/// This system is the owner of the *inactive invariants*. Inactive actors
/// must be hidden, motionless, colliding with nothing, and free of any
/// scheduled lifetime. Centralizing these writes here prevents
/// inconsistencies.
pub fn return_to_pool_commit(
    mut registry: ResMut<PoolRegistry>,
    mut scheduler: ResMut<LifetimeScheduler>,
    mut q: Query<(
        Entity,
        &Pooled,
        &mut ActorState,
        &mut Visibility,
        &mut LinearVelocity,
        &mut CollisionLayers,
    )>,
) {
    for (entity, pooled, mut state, mut vis, mut vel, mut layers) in &mut q {
        if *state != ActorState::PendingReturn {
            continue;
        }

        *state = ActorState::Inactive;
        *vis = Visibility::Hidden;
        vel.0 = Vec2::ZERO;
        layers.filters = LayerMask::NONE;

        scheduler.cancel(entity);
        if !registry.release(&pooled.tag, entity) {
            warn!("returned actor not found in pool {}", pooled.tag);
        }
    }
}

/// Maintain spawn request message buffers.
///
/// Messages are double-buffered; `update()` advances buffers.
fn update_spawn_messages(mut msgs: ResMut<Messages<SpawnRequest>>) {
    msgs.update();
}

pub fn plugin(app: &mut App) {
    app.init_resource::<PoolRegistry>();

    // Message storage for spawn requests.
    app.init_resource::<Messages<SpawnRequest>>();
    app.add_systems(PostUpdate, update_spawn_messages);

    // Producers enqueue first, then the single pool writer drains.
    app.add_systems(
        Update,
        allocate_from_pools
            .after(crate::plugins::projectiles::request_player_bullets)
            .after(crate::plugins::enemies::spawn_wave),
    );

    // After collision resolution, commit all pending returns.
    app.add_systems(
        FixedPostUpdate,
        return_to_pool_commit
            .after(crate::plugins::projectiles::process_bullet_impacts)
            .after(crate::plugins::enemies::process_enemy_hits),
    );
}
