//! Scheduled deactivation for short-lived actors.
//!
//! Every timed death in the game goes through one scheduler resource instead
//! of per-actor coroutines: pooled actors are marked for return to their pool
//! when their lifetime expires, detached actors (explosions, power-ups, split
//! meteors) are despawned outright.
//!
//! Scheduling is keyed by entity, so starting a lifetime for an actor always
//! replaces whatever was previously scheduled for it. This is the invariant
//! that makes recycling safe: a stale timer from an actor's previous run must
//! never deactivate its fresh incarnation early.
//!
//! Timers advance on virtual time; pausing the game freezes them.

use std::time::Duration;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::plugins::pooling::{ActorState, Detached, Pooled};

#[derive(Resource, Default, Debug)]
pub struct LifetimeScheduler {
    entries: HashMap<Entity, Timer>,
}

impl LifetimeScheduler {
    /// Start (or restart) the one-shot expiry for `actor`. Any previously
    /// scheduled expiry for the same actor is cancelled.
    pub fn schedule(&mut self, actor: Entity, seconds: f32) {
        self.entries
            .insert(actor, Timer::from_seconds(seconds, TimerMode::Once));
    }

    /// Returns whether an entry existed.
    pub fn cancel(&mut self, actor: Entity) -> bool {
        self.entries.remove(&actor).is_some()
    }

    pub fn remaining(&self, actor: Entity) -> Option<Duration> {
        self.entries.get(&actor).map(Timer::remaining)
    }

    pub fn scheduled_count(&self) -> usize {
        self.entries.len()
    }

    /// Advance all entries by `dt`, removing and returning the expired ones.
    pub fn advance(&mut self, dt: Duration) -> Vec<Entity> {
        let mut expired = Vec::new();
        self.entries.retain(|actor, timer| {
            timer.tick(dt);
            if timer.is_finished() {
                expired.push(*actor);
                false
            } else {
                true
            }
        });
        expired
    }
}

/// Drive the scheduler from the frame clock and apply each expiry.
pub fn expire_lifetimes(
    time: Res<Time>,
    mut scheduler: ResMut<LifetimeScheduler>,
    mut commands: Commands,
    mut q_pooled: Query<&mut ActorState, With<Pooled>>,
    q_detached: Query<(), With<Detached>>,
) {
    for actor in scheduler.advance(time.delta()) {
        if let Ok(mut state) = q_pooled.get_mut(actor) {
            if *state == ActorState::Active {
                *state = ActorState::PendingReturn;
            }
        } else if q_detached.contains(actor) {
            commands.entity(actor).despawn();
        }
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<LifetimeScheduler>();
    app.add_systems(Update, expire_lifetimes);
}
