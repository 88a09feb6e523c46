//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides the core ECS runtime.
//! - we then call `square_shooter::game::configure_headless` to install
//!   gameplay plugins.

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;

pub fn app_headless() -> App {
    let mut app = App::new();

    // Core ECS runtime. AssetPlugin + ScenePlugin keep the physics stack
    // happy without any renderer.
    app.add_plugins((MinimalPlugins, AssetPlugin::default(), ScenePlugin));

    square_shooter::game::configure_headless(&mut app);
    app
}
