//! Feature plugins.

use bevy::prelude::*;

pub mod core;
pub mod effects;
pub mod enemies;
pub mod events;
pub mod flow;
pub mod lifetime;
pub mod physics;
pub mod player;
pub mod pooling;
pub mod powerups;
pub mod projectiles;
pub mod score;

// Render-only
pub mod camera;

/// Register gameplay plugins that work in headless tests.
///
/// Order matters at the edges: core provides the settings other plugins read
/// at build time, and the event bus must exist before scoring subscribes.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    events::plugin(app);
    score::plugin(app);
    flow::plugin(app);
    physics::plugin(app);
    lifetime::plugin(app);
    pooling::plugin(app);
    effects::plugin(app);
    powerups::plugin(app);
    player::plugin(app);
    enemies::plugin(app);
    projectiles::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    register_gameplay(app);
    register_render(app);
}
