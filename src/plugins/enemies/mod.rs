//! Enemies plugin: pooled enemy kinds, the wave spawner, and destruction
//! handling.
//!
//! Two pools back all regular enemies: squares (red or yellow, rolled per
//! spawn) and meteors. The odd one out is the meteor split child: it is a
//! true allocation that bypasses the pool and is genuinely despawned when it
//! dies. That asymmetry is inherited from the original design and kept on
//! purpose — routing children through a pool would change the game's
//! allocation behavior.

pub mod destruction;
pub mod spawner;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;
use rand::Rng;

pub use destruction::process_enemy_hits;
pub use spawner::{spawn_wave, SpawnCadence};

use crate::common::config::GameConfig;
use crate::common::layers::Layer;
use crate::plugins::flow::{phase_is, GamePhase};
use crate::plugins::pooling::{ActorBlueprint, SpawnContext, SpawnRequest};

pub const SQUARE_POOL: &str = "enemy/squares";
pub const METEOR_POOL: &str = "enemy/meteors";

/// Pools the wave spawner draws from, uniformly.
pub const ENEMY_POOLS: [&str; 2] = [SQUARE_POOL, METEOR_POOL];

#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    RedSquare,
    YellowSquare,
    Meteor,
    SmallMeteor,
}

impl EnemyKind {
    /// Meteors split once; their children never split again.
    pub fn splits(self) -> bool {
        matches!(self, Self::Meteor)
    }

    pub fn speed(self, config: &GameConfig) -> f32 {
        match self {
            Self::YellowSquare => {
                config.enemy_default_speed * config.yellow_square_speed_multiplier
            }
            _ => config.enemy_default_speed,
        }
    }
}

/// Index of the visual rolled at spawn; it also selects the matching
/// explosion from the catalog.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantIndex(pub usize);

#[derive(Debug, Clone, Copy)]
struct VariantSpec {
    kind: EnemyKind,
    color: Color,
}

fn active_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [Layer::Player, Layer::PlayerBullet])
}

fn inactive_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [] as [Layer; 0])
}

/// One blueprint per enemy pool. The variant table is what the spawn hook
/// rerolls from; for squares the roll decides the kind as well.
pub struct EnemyBlueprint {
    name: &'static str,
    size: f32,
    variants: Vec<VariantSpec>,
}

impl EnemyBlueprint {
    pub fn squares() -> Self {
        Self {
            name: "Enemy(Square)",
            size: 32.0,
            variants: vec![
                VariantSpec {
                    kind: EnemyKind::RedSquare,
                    color: Color::srgb(0.9, 0.25, 0.25),
                },
                VariantSpec {
                    kind: EnemyKind::YellowSquare,
                    color: Color::srgb(0.95, 0.8, 0.2),
                },
            ],
        }
    }

    pub fn meteors() -> Self {
        Self {
            name: "Enemy(Meteor)",
            size: 36.0,
            variants: vec![
                VariantSpec {
                    kind: EnemyKind::Meteor,
                    color: Color::srgb(0.55, 0.5, 0.45),
                },
                VariantSpec {
                    kind: EnemyKind::Meteor,
                    color: Color::srgb(0.42, 0.4, 0.38),
                },
            ],
        }
    }
}

impl ActorBlueprint for EnemyBlueprint {
    fn instantiate(&self, commands: &mut Commands) -> Entity {
        let first = self.variants[0];
        commands
            .spawn((
                Name::new(self.name),
                Enemy,
                // Placeholder kind and variant; every acquisition rerolls.
                first.kind,
                VariantIndex::default(),
                Sprite {
                    color: first.color,
                    custom_size: Some(Vec2::splat(self.size)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 1.0),
                RigidBody::Kinematic,
                Collider::circle(self.size * 0.5),
                Sensor,
                inactive_enemy_layers(),
                LinearVelocity(Vec2::ZERO),
                CollisionEventsEnabled,
            ))
            .id()
    }

    fn on_spawn(&self, ctx: &mut SpawnContext, actor: Entity, req: &SpawnRequest) {
        ctx.scheduler.schedule(actor, ctx.config.enemy_lifetime);

        let index = ctx.rng.0.gen_range(0..self.variants.len());
        let variant = self.variants[index];

        let dir = if req.heading.length_squared() < 1e-4 {
            Vec2::NEG_X
        } else {
            req.heading.normalize()
        };

        ctx.commands.entity(actor).insert((
            variant.kind,
            VariantIndex(index),
            Sprite {
                color: variant.color,
                custom_size: Some(Vec2::splat(self.size)),
                ..default()
            },
            LinearVelocity(dir * variant.kind.speed(ctx.config)),
            active_enemy_layers(),
        ));
    }
}

pub fn plugin(app: &mut App) {
    // Cadence comes from settings, read once at build time.
    let interval = app.world().resource::<GameConfig>().enemy_spawn_interval;
    app.insert_resource(SpawnCadence::new(interval));

    app.add_systems(
        Update,
        spawner::spawn_wave.run_if(phase_is(GamePhase::Playing)),
    );

    app.add_systems(
        FixedPostUpdate,
        destruction::process_enemy_hits
            .after(CollisionEventSystems)
            .run_if(phase_is(GamePhase::Playing)),
    );
}

#[cfg(test)]
mod tests;
