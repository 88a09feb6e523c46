//! Game composition root.
//!
//! Provides two public configuration functions:
//! - `configure_full`: includes DefaultPlugins (window/render) + game plugins.
//! - `configure_headless`: minimal configuration for integration tests.
//!
//! This is also where the actor pools are declared: which tags exist, which
//! blueprint backs each, and how many instances to pre-create. Everything
//! else discovers pools purely by tag.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::config::GameConfig;
use crate::plugins;
use crate::plugins::enemies::{self, EnemyBlueprint};
use crate::plugins::pooling::{PoolDescriptor, PoolRegistry};
use crate::plugins::projectiles::{BulletBlueprint, BULLET_POOL};

pub fn run() {
    App::new().add_plugins(configure_full).run();
}

/// Full configuration for `cargo run`.
pub fn configure_full(app: &mut App) {
    let default_plugins = DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Square Shooter".into(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    });
    app.add_plugins(default_plugins);

    // Settings come from disk in the full game; headless runs keep defaults.
    app.insert_resource(GameConfig::load_or_default("config.toml"));

    configure_game(app);
    plugins::register_render(app);
}

/// Headless configuration for integration tests.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - Do NOT add render-only plugins (camera).
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

/// Configuration shared by both full and headless apps.
fn configure_game(app: &mut App) {
    plugins::register_gameplay(app);
    app.add_systems(Startup, register_actor_pools);
}

/// Declare every pool the game uses: one for bullets, one per enemy family.
fn register_actor_pools(mut commands: Commands, mut registry: ResMut<PoolRegistry>) {
    registry.register(
        &mut commands,
        PoolDescriptor {
            tag: BULLET_POOL,
            blueprint: Box::new(BulletBlueprint),
            initial_size: 32,
        },
    );
    registry.register(
        &mut commands,
        PoolDescriptor {
            tag: enemies::SQUARE_POOL,
            blueprint: Box::new(EnemyBlueprint::squares()),
            initial_size: 12,
        },
    );
    registry.register(
        &mut commands,
        PoolDescriptor {
            tag: enemies::METEOR_POOL,
            blueprint: Box::new(EnemyBlueprint::meteors()),
            initial_size: 8,
        },
    );
}
