//! Core plugin: shared resources and global settings.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common::config::GameConfig;

/// Process-wide RNG behind a resource so gameplay rolls (variant rerolls,
/// drop chances, spawn placement) can be seeded deterministically in tests.
#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl Default for GameRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// World-space rectangle gameplay happens within. Enemies enter just past its
/// right edge at a random height.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PlayArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            min: Vec2::new(-640.0, -360.0),
            max: Vec2::new(640.0, 360.0),
        }
    }
}

pub fn plugin(app: &mut App) {
    // init_resource keeps any settings/seed the composition root supplied
    // before us.
    app.init_resource::<GameConfig>();
    app.init_resource::<GameRng>();
    app.init_resource::<PlayArea>();
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));
}
