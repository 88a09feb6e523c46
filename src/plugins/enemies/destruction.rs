//! Enemy-side collision handling: a bullet hit destroys the enemy.
//!
//! Destruction fans out in a fixed order: reward event first (so scoring is
//! up to date the moment the body disappears), then the variant-matched
//! explosion, the power-up roll, the meteor split, and finally the
//! deactivation itself — back to the pool for pooled enemies, a real despawn
//! for detached split children.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use rand::Rng;

use super::{active_enemy_layers, Enemy, EnemyKind, VariantIndex};
use crate::common::config::GameConfig;
use crate::plugins::core::GameRng;
use crate::plugins::effects::{spawn_explosion, ExplosionCatalog};
use crate::plugins::events::{EnemyDestroyed, EnemyDestroyedBus, ENEMY_DESTROYED_REWARD};
use crate::plugins::lifetime::LifetimeScheduler;
use crate::plugins::pooling::{ActorState, Detached};
use crate::plugins::powerups::{spawn_powerup, PowerUpCatalog};
use crate::plugins::projectiles::Bullet;

/// Headings of the two split children, relative to the base leftward travel:
/// 45° above and below it in the standard angle convention.
const SPLIT_ANGLES_DEG: [f32; 2] = [135.0, 225.0];

pub fn process_enemy_hits(
    mut started: MessageReader<CollisionStart>,
    mut commands: Commands,
    mut scheduler: ResMut<LifetimeScheduler>,
    mut rng: ResMut<GameRng>,
    mut bus: ResMut<EnemyDestroyedBus>,
    config: Res<GameConfig>,
    explosions: Res<ExplosionCatalog>,
    drops: Res<PowerUpCatalog>,
    q_bullets: Query<(), With<Bullet>>,
    mut q_enemies: Query<
        (
            &EnemyKind,
            &VariantIndex,
            &Transform,
            &Sprite,
            Option<&mut ActorState>,
        ),
        With<Enemy>,
    >,
    // Per-frame dedupe
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let e1 = q_enemies.contains(ev.collider1);
        let e2 = q_enemies.contains(ev.collider2);
        if !(e1 ^ e2) {
            continue;
        }
        let (enemy, other) = if e1 {
            (ev.collider1, ev.collider2)
        } else {
            (ev.collider2, ev.collider1)
        };

        // Only bullets destroy enemies; player contact is the player's
        // problem.
        if !q_bullets.contains(other) {
            continue;
        }

        if !seen.insert(enemy) {
            continue;
        }

        let Ok((kind, variant, tf, sprite, state)) = q_enemies.get_mut(enemy) else {
            continue;
        };
        // Pooled enemies must be active; detached children carry no state.
        if let Some(state) = &state {
            if **state != ActorState::Active {
                continue;
            }
        }

        let kind = *kind;
        let variant = *variant;
        let pos = tf.translation.truncate();
        let scale = tf.scale;
        let sprite = sprite.clone();

        // Reward first: subscribers (scoring) observe it synchronously,
        // before the body is gone.
        bus.0.publish(EnemyDestroyed {
            reward: ENEMY_DESTROYED_REWARD,
        });

        // Explosion matching the rolled visual, clamped to the catalog.
        if !explosions.0.is_empty() {
            let index = variant.0.min(explosions.0.len() - 1);
            spawn_explosion(&mut commands, &mut scheduler, &config, explosions.0[index], pos);
        }

        // Power-up roll.
        if !drops.0.is_empty() && rng.0.gen_range(0.0..1.0f32) < config.powerup_drop_chance {
            let drop = drops.0[rng.0.gen_range(0..drops.0.len())];
            spawn_powerup(&mut commands, &mut scheduler, drop, pos);
        }

        // Meteors burst a second time and split into two detached children.
        if kind.splits() {
            if let Some(spec) = explosions.0.first().copied() {
                spawn_explosion(&mut commands, &mut scheduler, &config, spec, pos);
            }
            spawn_split_children(
                &mut commands,
                &mut scheduler,
                &config,
                variant,
                &sprite,
                pos,
                scale,
            );
        }

        match state {
            Some(mut state) => *state = ActorState::PendingReturn,
            None => {
                scheduler.cancel(enemy);
                commands.entity(enemy).despawn();
            }
        }
    }
}

/// Clone the dying meteor into two half-scale SmallMeteor children with
/// diverging headings. These are real allocations — they never touch the
/// pool and despawn for good when they die.
fn spawn_split_children(
    commands: &mut Commands,
    scheduler: &mut LifetimeScheduler,
    config: &GameConfig,
    variant: VariantIndex,
    sprite: &Sprite,
    pos: Vec2,
    parent_scale: Vec3,
) {
    for angle_deg in SPLIT_ANGLES_DEG {
        let angle = angle_deg.to_radians();
        let dir = Vec2::new(angle.cos(), angle.sin());

        let child = commands
            .spawn((
                Name::new("Enemy(SmallMeteor)"),
                Enemy,
                Detached,
                EnemyKind::SmallMeteor,
                variant,
                sprite.clone(),
                Transform {
                    translation: pos.extend(1.0),
                    scale: parent_scale * 0.5,
                    ..default()
                },
                RigidBody::Kinematic,
                Collider::circle(18.0),
                Sensor,
                active_enemy_layers(),
                LinearVelocity(dir * EnemyKind::SmallMeteor.speed(config)),
                CollisionEventsEnabled,
            ))
            .id();
        scheduler.schedule(child, config.enemy_lifetime);
    }
}
