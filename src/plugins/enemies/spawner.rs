//! Producer: timed enemy waves.
//!
//! Every `enemy_spawn_interval` seconds, pick one of the enemy pools at
//! random and request a spawn just past the right edge of the play area at a
//! random height, heading left. Which instance gets activated (and which
//! variant it rolls) is the allocator's business.

use bevy::prelude::*;
use rand::Rng;

use super::ENEMY_POOLS;
use crate::plugins::core::{GameRng, PlayArea};
use crate::plugins::pooling::SpawnRequest;

/// Horizontal margin so enemies enter from off-screen.
const SPAWN_MARGIN: f32 = 32.0;

#[derive(Resource, Debug)]
pub struct SpawnCadence {
    timer: Timer,
}

impl SpawnCadence {
    pub fn new(interval: f32) -> Self {
        Self {
            timer: Timer::from_seconds(interval, TimerMode::Repeating),
        }
    }
}

pub fn spawn_wave(
    time: Res<Time>,
    mut cadence: ResMut<SpawnCadence>,
    mut rng: ResMut<GameRng>,
    area: Res<PlayArea>,
    mut writer: MessageWriter<SpawnRequest>,
) {
    cadence.timer.tick(time.delta());

    // A long frame can owe more than one wave.
    for _ in 0..cadence.timer.times_finished_this_tick() {
        let tag = ENEMY_POOLS[rng.0.gen_range(0..ENEMY_POOLS.len())];
        let y = rng.0.gen_range(area.min.y..area.max.y);

        writer.write(SpawnRequest {
            tag,
            pos: Vec2::new(area.max.x + SPAWN_MARGIN, y),
            rotation: 0.0,
            heading: Vec2::NEG_X,
        });
    }
}
