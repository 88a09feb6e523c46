use avian2d::prelude::*;
use bevy::prelude::*;

const PIXELS_PER_METER: f32 = 20.0;

pub fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default().with_length_unit(PIXELS_PER_METER));
    app.insert_resource(Gravity(Vec2::ZERO));
}
