//! Producer: read fire input and enqueue bullet spawn requests.
//!
//! This system intentionally does **not** access the pool registry; it only
//! writes intent. The weapon tier decides the pattern:
//! tier 1 single shot, tier 2 split shot (±30°), tier 3 both.

use bevy::prelude::*;

use super::BULLET_POOL;
use crate::plugins::player::{Player, WeaponLevel};
use crate::plugins::pooling::SpawnRequest;

pub fn request_player_bullets(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    q_player: Query<(&Transform, &WeaponLevel), With<Player>>,
    mut writer: MessageWriter<SpawnRequest>,
) {
    let Some(keys) = keys else {
        return;
    };
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }

    let (tf, weapon) = match q_player.single() {
        Ok(v) => v,
        Err(e) => {
            debug!("No single Player to fire from: {e:?}");
            return;
        }
    };
    let origin = tf.translation.truncate();

    match weapon.0 {
        1 => fire_single(origin, &mut writer),
        2 => fire_split(origin, &mut writer),
        _ => {
            fire_split(origin, &mut writer);
            fire_single(origin, &mut writer);
        }
    }
}

fn fire_single(origin: Vec2, writer: &mut MessageWriter<SpawnRequest>) {
    writer.write(bullet_request(origin, Vec2::X));
}

/// Two bullets at 30° up and 30° down relative to the forward direction.
fn fire_split(origin: Vec2, writer: &mut MessageWriter<SpawnRequest>) {
    let angle = 30f32.to_radians();
    writer.write(bullet_request(origin, Vec2::new(angle.cos(), angle.sin())));
    writer.write(bullet_request(origin, Vec2::new(angle.cos(), -angle.sin())));
}

fn bullet_request(origin: Vec2, heading: Vec2) -> SpawnRequest {
    SpawnRequest {
        tag: BULLET_POOL,
        pos: origin,
        rotation: 0.0,
        heading,
    }
}
