//! Score tracking.
//!
//! Scoring never sees enemies directly: it subscribes to the destroy-reward
//! bus at plugin build time and credits whatever rewards arrive. Power-ups
//! add to the total directly.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use bevy::prelude::*;

use crate::plugins::events::EnemyDestroyedBus;

/// Running score. Clones share the same counter, which is what lets a bus
/// callback and the resource observe one total.
#[derive(Resource, Clone, Default)]
pub struct Score {
    total: Arc<AtomicI32>,
}

impl Score {
    pub fn get(&self) -> i32 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn add(&self, amount: i32) {
        self.total.fetch_add(amount, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.total.store(0, Ordering::Relaxed);
    }
}

/// Requires the events plugin to have run first.
pub fn plugin(app: &mut App) {
    let score = Score::default();
    let credit = score.clone();
    app.insert_resource(score);

    let mut bus = app.world_mut().resource_mut::<EnemyDestroyedBus>();
    bus.0.subscribe(move |ev| credit.add(ev.reward));
}
