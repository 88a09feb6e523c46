//! Player plugin.
//!
//! Pipeline:
//! - Update: sample input, write PlayerInput resource; tick invincibility
//! - FixedUpdate: apply velocity to the kinematic rigid body
//! - FixedPostUpdate: resolve enemy contact (game over unless invincible)
//!
//! The fire control lives in the projectiles plugin; it only reads the
//! player's transform and weapon tier from here.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::config::GameConfig;
use crate::common::layers::Layer;
use crate::plugins::enemies::Enemy;
use crate::plugins::flow::{phase_is, GameFlow, GamePhase};

pub const PLAYER_START: Vec2 = Vec2::new(-480.0, 0.0);

const FLASH_INTERVAL_SECS: f32 = 0.2;

#[derive(Component)]
pub struct Player;

/// Weapon tier, 1..=3. Tiers change the fire pattern, not the bullets.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponLevel(pub u8);

impl Default for WeaponLevel {
    fn default() -> Self {
        Self(1)
    }
}

impl WeaponLevel {
    pub const MAX: u8 = 3;

    pub fn upgrade(&mut self) {
        if self.0 < Self::MAX {
            self.0 += 1;
        }
    }
}

/// Timed damage immunity with a visibility flash. The flash always ends with
/// the player visible.
#[derive(Component, Debug)]
pub struct Invincible {
    remaining: Timer,
    flash: Timer,
}

impl Invincible {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: Timer::from_seconds(duration, TimerMode::Once),
            flash: Timer::from_seconds(FLASH_INTERVAL_SECS, TimerMode::Repeating),
        }
    }
}

#[derive(Resource, Default, Debug)]
pub struct PlayerInput {
    pub move_axis: Vec2,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .add_systems(Startup, spawn)
        .add_systems(Update, (gather_input, tick_invincibility))
        .add_systems(
            FixedUpdate,
            apply_movement.run_if(phase_is(GamePhase::Playing)),
        )
        .add_systems(
            FixedPostUpdate,
            process_player_enemy_collisions
                .after(CollisionEventSystems)
                .run_if(phase_is(GamePhase::Playing)),
        );
}

fn spawn(mut commands: Commands) {
    let layers = CollisionLayers::new(Layer::Player, [Layer::Enemy, Layer::PowerUp]);

    commands.spawn((
        Name::new("Player"),
        Player,
        WeaponLevel::default(),
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(Vec2::splat(26.0)),
            ..default()
        },
        Transform::from_xyz(PLAYER_START.x, PLAYER_START.y, 1.0),
        RigidBody::Kinematic,
        Collider::circle(13.0),
        layers,
        LinearVelocity::ZERO,
        CollisionEventsEnabled,
    ));
}

fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<PlayerInput>) {
    let Some(keys) = keys else {
        return;
    };

    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    input.move_axis = if axis.length_squared() > 0.0 {
        axis.normalize()
    } else {
        Vec2::ZERO
    };
}

pub fn apply_movement(
    config: Res<GameConfig>,
    input: Res<PlayerInput>,
    mut q_player: Query<&mut LinearVelocity, With<Player>>,
) {
    let Ok(mut vel) = q_player.single_mut() else {
        return;
    };
    vel.0 = input.move_axis * config.player_speed;
}

/// Tick invincibility: flash while active, end visible, drop the component.
pub fn tick_invincibility(
    time: Res<Time>,
    mut commands: Commands,
    mut q: Query<(Entity, &mut Invincible, &mut Visibility), With<Player>>,
) {
    for (entity, mut invincible, mut vis) in &mut q {
        invincible.remaining.tick(time.delta());
        invincible.flash.tick(time.delta());

        if invincible.remaining.is_finished() {
            *vis = Visibility::Visible;
            commands.entity(entity).remove::<Invincible>();
            continue;
        }

        if invincible.flash.just_finished() {
            *vis = match *vis {
                Visibility::Hidden => Visibility::Visible,
                _ => Visibility::Hidden,
            };
        }
    }
}

/// Enemy contact ends the run, unless the player is invincible.
pub fn process_player_enemy_collisions(
    mut started: MessageReader<CollisionStart>,
    mut flow: ResMut<GameFlow>,
    q_player: Query<Has<Invincible>, With<Player>>,
    q_enemies: Query<(), With<Enemy>>,
) {
    for ev in started.read() {
        let (player, other) = if q_player.contains(ev.collider1) {
            (ev.collider1, ev.collider2)
        } else if q_player.contains(ev.collider2) {
            (ev.collider2, ev.collider1)
        } else {
            continue;
        };

        if !q_enemies.contains(other) {
            continue;
        }
        let Ok(invincible) = q_player.get(player) else {
            continue;
        };
        if invincible {
            continue;
        }

        flow.set_phase(GamePhase::GameOver);
        return;
    }
}
