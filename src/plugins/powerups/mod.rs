//! Power-ups.
//!
//! Dropped by dying enemies, collected by the player, and never pooled: an
//! uncollected power-up is genuinely despawned when its lifetime runs out.
//! Exactly one effect applies per pickup, chosen by kind.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::config::GameConfig;
use crate::common::layers::Layer;
use crate::plugins::flow::{phase_is, GamePhase};
use crate::plugins::lifetime::LifetimeScheduler;
use crate::plugins::player::{Invincible, Player, WeaponLevel};
use crate::plugins::pooling::Detached;
use crate::plugins::score::Score;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Score,
    Invincibility,
    WeaponUpgrade,
}

/// Drop table; dying enemies pick uniformly from it. Empty means enemies
/// never drop anything.
#[derive(Resource, Debug, Clone)]
pub struct PowerUpCatalog(pub Vec<PowerUpKind>);

impl Default for PowerUpCatalog {
    fn default() -> Self {
        Self(vec![
            PowerUpKind::Score,
            PowerUpKind::Invincibility,
            PowerUpKind::WeaponUpgrade,
        ])
    }
}

/// Uncollected power-ups vanish after this long.
pub const POWERUP_LIFETIME_SECS: f32 = 10.0;

/// Direct score credit for the Score kind.
pub const SCORE_POWERUP_AWARD: i32 = 50;

fn kind_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Score => Color::srgb(0.3, 0.9, 0.4),
        PowerUpKind::Invincibility => Color::srgb(0.4, 0.6, 1.0),
        PowerUpKind::WeaponUpgrade => Color::srgb(0.9, 0.4, 0.9),
    }
}

pub fn spawn_powerup(
    commands: &mut Commands,
    scheduler: &mut LifetimeScheduler,
    kind: PowerUpKind,
    pos: Vec2,
) -> Entity {
    let entity = commands
        .spawn((
            Name::new("PowerUp"),
            kind,
            Detached,
            Sprite {
                color: kind_color(kind),
                custom_size: Some(Vec2::splat(18.0)),
                ..default()
            },
            Transform::from_translation(pos.extend(1.5)),
            RigidBody::Static,
            Collider::circle(9.0),
            Sensor,
            CollisionLayers::new(Layer::PowerUp, [Layer::Player]),
            CollisionEventsEnabled,
        ))
        .id();
    scheduler.schedule(entity, POWERUP_LIFETIME_SECS);
    entity
}

/// Apply pickups: exactly one effect by kind, then the power-up is gone.
pub fn process_powerup_pickups(
    mut started: MessageReader<CollisionStart>,
    mut commands: Commands,
    mut scheduler: ResMut<LifetimeScheduler>,
    config: Res<GameConfig>,
    score: Res<Score>,
    q_kinds: Query<&PowerUpKind>,
    mut q_player: Query<&mut WeaponLevel, With<Player>>,
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let (powerup, player) = if q_kinds.contains(ev.collider1) && q_player.contains(ev.collider2)
        {
            (ev.collider1, ev.collider2)
        } else if q_kinds.contains(ev.collider2) && q_player.contains(ev.collider1) {
            (ev.collider2, ev.collider1)
        } else {
            continue;
        };

        // A power-up can only be collected once, even if physics reports the
        // contact twice in one step.
        if !seen.insert(powerup) {
            continue;
        }

        let Ok(kind) = q_kinds.get(powerup) else {
            continue;
        };

        match *kind {
            PowerUpKind::Score => score.add(SCORE_POWERUP_AWARD),
            PowerUpKind::Invincibility => {
                commands
                    .entity(player)
                    .insert(Invincible::new(config.invincibility_duration));
            }
            PowerUpKind::WeaponUpgrade => {
                if let Ok(mut weapon) = q_player.get_mut(player) {
                    weapon.upgrade();
                }
            }
        }

        scheduler.cancel(powerup);
        commands.entity(powerup).despawn();
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<PowerUpCatalog>();
    app.add_systems(
        FixedPostUpdate,
        process_powerup_pickups
            .after(CollisionEventSystems)
            .run_if(phase_is(GamePhase::Playing)),
    );
}
