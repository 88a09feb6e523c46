//! Detached cosmetic effects.
//!
//! Explosions are pure presentation: spawned on demand, never pooled, and
//! despawned by the lifetime scheduler after `explosion_lifetime`. They are
//! solid-colour sprites so the project stays asset-free.

use bevy::prelude::*;

use crate::common::config::GameConfig;
use crate::plugins::lifetime::LifetimeScheduler;
use crate::plugins::pooling::Detached;

#[derive(Component, Debug, Clone, Copy)]
pub struct Explosion;

/// One explosion visual.
#[derive(Debug, Clone, Copy)]
pub struct ExplosionSpec {
    pub color: Color,
    pub size: f32,
}

/// Explosion visuals in enemy-variant order: an enemy's rolled variant index
/// picks the matching entry, clamped to this list. An empty catalog means
/// explosions are skipped entirely.
#[derive(Resource, Debug, Clone)]
pub struct ExplosionCatalog(pub Vec<ExplosionSpec>);

impl Default for ExplosionCatalog {
    fn default() -> Self {
        Self(vec![
            ExplosionSpec {
                color: Color::srgb(1.0, 0.45, 0.2),
                size: 40.0,
            },
            ExplosionSpec {
                color: Color::srgb(1.0, 0.85, 0.25),
                size: 40.0,
            },
        ])
    }
}

/// Flash used where a bullet lands, independent of the enemy's own explosion.
pub fn impact_burst() -> ExplosionSpec {
    ExplosionSpec {
        color: Color::srgb(1.0, 0.95, 0.8),
        size: 16.0,
    }
}

pub fn spawn_explosion(
    commands: &mut Commands,
    scheduler: &mut LifetimeScheduler,
    config: &GameConfig,
    spec: ExplosionSpec,
    pos: Vec2,
) -> Entity {
    let entity = commands
        .spawn((
            Name::new("Explosion"),
            Explosion,
            Detached,
            Sprite {
                color: spec.color,
                custom_size: Some(Vec2::splat(spec.size)),
                ..default()
            },
            Transform::from_translation(pos.extend(3.0)),
        ))
        .id();
    scheduler.schedule(entity, config.explosion_lifetime);
    entity
}

pub fn plugin(app: &mut App) {
    app.init_resource::<ExplosionCatalog>();
}
