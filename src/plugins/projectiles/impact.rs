//! Bullet-side collision handling.
//!
//! A bullet that touches anything in the Enemy layer leaves a small impact
//! burst and goes back to the pool. The enemy side of the same contact is
//! resolved independently by the enemies plugin.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::Bullet;
use crate::common::config::GameConfig;
use crate::common::layers::Layer;
use crate::plugins::effects;
use crate::plugins::lifetime::LifetimeScheduler;
use crate::plugins::pooling::ActorState;

pub fn process_bullet_impacts(
    mut started: MessageReader<CollisionStart>,
    mut commands: Commands,
    mut scheduler: ResMut<LifetimeScheduler>,
    config: Res<GameConfig>,
    mut q_bullets: Query<(&mut ActorState, &Transform), With<Bullet>>,
    q_layers: Query<&CollisionLayers>,
    // Per-frame dedupe
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        // Identify the bullet side; exactly one side must be a bullet.
        let b1 = q_bullets.contains(ev.collider1);
        let b2 = q_bullets.contains(ev.collider2);
        if !(b1 ^ b2) {
            continue;
        }
        let (bullet, other) = if b1 {
            (ev.collider1, ev.collider2)
        } else {
            (ev.collider2, ev.collider1)
        };

        if !seen.insert(bullet) {
            continue;
        }

        let Ok(other_layers) = q_layers.get(other) else {
            continue;
        };
        if !other_layers.memberships.has_all(Layer::Enemy) {
            continue;
        }

        let Ok((mut state, tf)) = q_bullets.get_mut(bullet) else {
            continue;
        };
        if *state != ActorState::Active {
            continue;
        }

        effects::spawn_explosion(
            &mut commands,
            &mut scheduler,
            &config,
            effects::impact_burst(),
            tf.translation.truncate(),
        );
        *state = ActorState::PendingReturn;
    }
}
