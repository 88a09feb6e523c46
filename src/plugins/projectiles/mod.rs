//! Projectiles plugin: the pooled bullet kind and its producer/resolver
//! systems.
//!
//! Bullets follow the standard pooled-actor pipeline: the fire control
//! enqueues `SpawnRequest`s, the pool allocator activates instances and runs
//! [`BulletBlueprint::on_spawn`], and the impact resolver flips spent bullets
//! to `PendingReturn` for the commit system to recycle.

pub mod fire;
pub mod impact;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;

pub use fire::request_player_bullets;
pub use impact::process_bullet_impacts;

use crate::common::layers::Layer;
use crate::plugins::flow::{phase_is, GamePhase};
use crate::plugins::pooling::{ActorBlueprint, SpawnContext, SpawnRequest};

pub const BULLET_POOL: &str = "bullet";

#[derive(Component, Debug, Clone, Copy)]
pub struct Bullet;

#[inline]
fn active_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerBullet, [Layer::Enemy])
}

/// "Disabled" without structural changes: empty filters means we collide with
/// nothing.
#[inline]
fn inactive_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerBullet, [] as [Layer; 0])
}

pub struct BulletBlueprint;

impl ActorBlueprint for BulletBlueprint {
    fn instantiate(&self, commands: &mut Commands) -> Entity {
        commands
            .spawn((
                Name::new("Bullet(Pooled)"),
                Bullet,
                Sprite {
                    color: Color::srgb(1.0, 0.85, 0.3),
                    custom_size: Some(Vec2::splat(8.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 2.0),
                RigidBody::Kinematic,
                Collider::circle(4.0),
                Sensor,
                inactive_bullet_layers(),
                LinearVelocity(Vec2::ZERO),
                CollisionEventsEnabled,
            ))
            .id()
    }

    fn on_spawn(&self, ctx: &mut SpawnContext, actor: Entity, req: &SpawnRequest) {
        ctx.scheduler.schedule(actor, ctx.config.bullet_lifetime);

        let dir = if req.heading.length_squared() < 1e-4 {
            Vec2::X
        } else {
            req.heading.normalize()
        };
        // The sprite is drawn pointing up; -90 degrees makes it face its
        // heading.
        let facing = dir.y.atan2(dir.x) - std::f32::consts::FRAC_PI_2;

        ctx.commands.entity(actor).insert((
            Transform::from_translation(req.pos.extend(self.layer_z()))
                .with_rotation(Quat::from_rotation_z(facing)),
            LinearVelocity(dir * ctx.config.bullet_speed),
            active_bullet_layers(),
        ));
    }

    fn layer_z(&self) -> f32 {
        2.0
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        fire::request_player_bullets.run_if(phase_is(GamePhase::Playing)),
    );

    app.add_systems(
        FixedPostUpdate,
        impact::process_bullet_impacts
            .after(CollisionEventSystems)
            .run_if(phase_is(GamePhase::Playing)),
    );
}
