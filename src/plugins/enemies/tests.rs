//! Enemy tests — deterministic, collision messages injected directly.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::ecs::world::CommandQueue;
use bevy::prelude::*;

use super::{
    destruction, spawner, Enemy, EnemyBlueprint, EnemyKind, VariantIndex, ENEMY_POOLS,
    METEOR_POOL, SQUARE_POOL,
};
use crate::common::config::GameConfig;
use crate::common::test_utils::run_system_once;
use crate::plugins::core::{GameRng, PlayArea};
use crate::plugins::effects::{Explosion, ExplosionCatalog};
use crate::plugins::events::EnemyDestroyedBus;
use crate::plugins::lifetime::LifetimeScheduler;
use crate::plugins::pooling::{
    ActorBlueprint, ActorState, Detached, SpawnContext, SpawnRequest,
};
use crate::plugins::powerups::{PowerUpCatalog, PowerUpKind};
use crate::plugins::projectiles::Bullet;

// --------------------------------------------------------------------------------------
// Helpers
// --------------------------------------------------------------------------------------

fn destruction_world(config: GameConfig) -> World {
    let mut world = World::new();
    world.init_resource::<LifetimeScheduler>();
    world.insert_resource(GameRng::seeded(42));
    world.insert_resource(config);
    world.init_resource::<ExplosionCatalog>();
    world.init_resource::<PowerUpCatalog>();
    world.init_resource::<EnemyDestroyedBus>();
    world.init_resource::<Messages<CollisionStart>>();
    world
}

/// Counts rewards delivered on the destruction bus.
fn observe_rewards(world: &mut World) -> Arc<AtomicI32> {
    let total = Arc::new(AtomicI32::new(0));
    let sink = Arc::clone(&total);
    world
        .resource_mut::<EnemyDestroyedBus>()
        .0
        .subscribe(move |ev| {
            sink.fetch_add(ev.reward, Ordering::Relaxed);
        });
    total
}

fn spawn_active_enemy(world: &mut World, kind: EnemyKind, variant: usize) -> Entity {
    world
        .spawn((
            Enemy,
            kind,
            VariantIndex(variant),
            Transform::from_xyz(50.0, -20.0, 1.0),
            Sprite {
                color: Color::srgb(0.5, 0.5, 0.5),
                custom_size: Some(Vec2::splat(36.0)),
                ..default()
            },
            ActorState::Active,
        ))
        .id()
}

fn hit_with_bullet(world: &mut World, enemy: Entity) {
    let bullet = world.spawn(Bullet).id();
    world.write_message(CollisionStart {
        collider1: bullet,
        collider2: enemy,
        body1: Some(bullet),
        body2: Some(enemy),
    });
    run_system_once(world, destruction::process_enemy_hits);
}

fn small_meteors(world: &mut World) -> Vec<(Entity, Vec3, Vec2)> {
    let mut q = world.query::<(Entity, &EnemyKind, &Transform, &LinearVelocity)>();
    q.iter(world)
        .filter(|(_, kind, _, _)| **kind == EnemyKind::SmallMeteor)
        .map(|(e, _, tf, vel)| (e, tf.scale, vel.0))
        .collect()
}

// --------------------------------------------------------------------------------------
// Destruction fan-out
// --------------------------------------------------------------------------------------

#[test]
fn bullet_hit_awards_explodes_and_recycles() {
    let mut world = destruction_world(GameConfig {
        powerup_drop_chance: 0.0,
        ..default()
    });
    let rewards = observe_rewards(&mut world);
    let enemy = spawn_active_enemy(&mut world, EnemyKind::RedSquare, 0);

    hit_with_bullet(&mut world, enemy);

    // Reward delivered synchronously during the hit.
    assert_eq!(rewards.load(Ordering::Relaxed), 100);

    // Variant 0 explosion at the death position.
    let mut q = world.query::<(&Explosion, &Transform)>();
    let bursts: Vec<_> = q.iter(&world).collect();
    assert_eq!(bursts.len(), 1);
    assert_eq!(bursts[0].1.translation.truncate(), Vec2::new(50.0, -20.0));

    assert_eq!(
        *world.get::<ActorState>(enemy).unwrap(),
        ActorState::PendingReturn
    );
}

#[test]
fn explosion_index_is_clamped_to_the_catalog() {
    let mut world = destruction_world(GameConfig {
        powerup_drop_chance: 0.0,
        ..default()
    });
    // Variant index far beyond the two default explosion entries.
    let enemy = spawn_active_enemy(&mut world, EnemyKind::YellowSquare, 7);

    hit_with_bullet(&mut world, enemy);

    let count = world.query::<&Explosion>().iter(&world).count();
    assert_eq!(count, 1);
}

#[test]
fn empty_explosion_catalog_degrades_silently() {
    let mut world = destruction_world(GameConfig {
        powerup_drop_chance: 0.0,
        ..default()
    });
    world.insert_resource(ExplosionCatalog(Vec::new()));
    let rewards = observe_rewards(&mut world);
    let enemy = spawn_active_enemy(&mut world, EnemyKind::Meteor, 0);

    hit_with_bullet(&mut world, enemy);

    assert_eq!(world.query::<&Explosion>().iter(&world).count(), 0);
    // Everything else still happened.
    assert_eq!(rewards.load(Ordering::Relaxed), 100);
    assert_eq!(small_meteors(&mut world).len(), 2);
}

#[test]
fn inactive_enemies_ignore_stale_contacts() {
    let mut world = destruction_world(GameConfig::default());
    let rewards = observe_rewards(&mut world);
    let enemy = spawn_active_enemy(&mut world, EnemyKind::RedSquare, 0);
    *world.get_mut::<ActorState>(enemy).unwrap() = ActorState::PendingReturn;

    hit_with_bullet(&mut world, enemy);

    assert_eq!(rewards.load(Ordering::Relaxed), 0);
}

// --------------------------------------------------------------------------------------
// Power-up drops
// --------------------------------------------------------------------------------------

#[test]
fn certain_drop_chance_spawns_exactly_one_powerup() {
    let mut world = destruction_world(GameConfig {
        powerup_drop_chance: 1.0,
        ..default()
    });
    let enemy = spawn_active_enemy(&mut world, EnemyKind::RedSquare, 0);

    hit_with_bullet(&mut world, enemy);

    let count = world.query::<&PowerUpKind>().iter(&world).count();
    assert_eq!(count, 1);
}

#[test]
fn zero_drop_chance_never_drops() {
    let mut world = destruction_world(GameConfig {
        powerup_drop_chance: 0.0,
        ..default()
    });
    let enemy = spawn_active_enemy(&mut world, EnemyKind::RedSquare, 0);

    hit_with_bullet(&mut world, enemy);

    assert_eq!(world.query::<&PowerUpKind>().iter(&world).count(), 0);
}

#[test]
fn empty_drop_table_is_skipped() {
    let mut world = destruction_world(GameConfig {
        powerup_drop_chance: 1.0,
        ..default()
    });
    world.insert_resource(PowerUpCatalog(Vec::new()));
    let enemy = spawn_active_enemy(&mut world, EnemyKind::RedSquare, 0);

    hit_with_bullet(&mut world, enemy);

    assert_eq!(world.query::<&PowerUpKind>().iter(&world).count(), 0);
}

// --------------------------------------------------------------------------------------
// Meteor split
// --------------------------------------------------------------------------------------

#[test]
fn meteor_splits_into_two_half_scale_children_on_diverging_headings() {
    let config = GameConfig {
        powerup_drop_chance: 0.0,
        ..default()
    };
    let speed = EnemyKind::SmallMeteor.speed(&config);
    let mut world = destruction_world(config);
    let meteor = spawn_active_enemy(&mut world, EnemyKind::Meteor, 1);

    hit_with_bullet(&mut world, meteor);

    let children = small_meteors(&mut world);
    assert_eq!(children.len(), 2);

    for (_, scale, _) in &children {
        assert_eq!(*scale, Vec3::ONE * 0.5);
    }

    // Headings at 135° and 225° from the 0°-is-right convention.
    let expected_up = Vec2::new(135f32.to_radians().cos(), 135f32.to_radians().sin()) * speed;
    let expected_down = Vec2::new(225f32.to_radians().cos(), 225f32.to_radians().sin()) * speed;
    let mut velocities: Vec<Vec2> = children.iter().map(|(_, _, v)| *v).collect();
    velocities.sort_by(|a, b| b.y.total_cmp(&a.y));
    assert!((velocities[0] - expected_up).length() < 1e-3);
    assert!((velocities[1] - expected_down).length() < 1e-3);

    // The parent itself goes back to the pool, and the meteor death played
    // the extra lead explosion alongside the variant one.
    assert_eq!(
        *world.get::<ActorState>(meteor).unwrap(),
        ActorState::PendingReturn
    );
    assert_eq!(world.query::<&Explosion>().iter(&world).count(), 2);

    // Children are timed like any enemy.
    for (child, _, _) in &children {
        assert!(world
            .resource::<LifetimeScheduler>()
            .remaining(*child)
            .is_some());
    }
}

#[test]
fn small_meteors_never_split_and_die_for_good() {
    let mut world = destruction_world(GameConfig {
        powerup_drop_chance: 0.0,
        ..default()
    });
    let rewards = observe_rewards(&mut world);

    // Detached child: no ActorState, marked Detached.
    let child = world
        .spawn((
            Enemy,
            Detached,
            EnemyKind::SmallMeteor,
            VariantIndex(0),
            Transform::default(),
            Sprite {
                color: Color::srgb(0.5, 0.5, 0.5),
                custom_size: Some(Vec2::splat(18.0)),
                ..default()
            },
        ))
        .id();

    hit_with_bullet(&mut world, child);

    // Destroyed for real, still worth a reward, no grandchildren.
    assert!(world.get_entity(child).is_err());
    assert_eq!(rewards.load(Ordering::Relaxed), 100);
    assert_eq!(small_meteors(&mut world).len(), 0);
}

// --------------------------------------------------------------------------------------
// Kinds, blueprint, spawner
// --------------------------------------------------------------------------------------

#[test]
fn yellow_squares_are_faster_by_the_configured_multiplier() {
    let config = GameConfig::default();
    assert_eq!(
        EnemyKind::YellowSquare.speed(&config),
        config.enemy_default_speed * config.yellow_square_speed_multiplier
    );
    assert_eq!(
        EnemyKind::Meteor.speed(&config),
        config.enemy_default_speed
    );
}

#[test]
fn spawn_hook_rerolls_a_variant_and_sets_its_trajectory() {
    let mut world = World::new();
    let mut scheduler = LifetimeScheduler::default();
    let mut rng = GameRng::seeded(3);
    let config = GameConfig::default();

    let mut queue = CommandQueue::default();
    let actor = {
        let mut commands = Commands::new(&mut queue, &world);
        let blueprint = EnemyBlueprint::squares();
        let actor = blueprint.instantiate(&mut commands);
        let req = SpawnRequest {
            tag: SQUARE_POOL,
            pos: Vec2::new(600.0, 40.0),
            rotation: 0.0,
            heading: Vec2::NEG_X,
        };
        let mut ctx = SpawnContext {
            commands: &mut commands,
            scheduler: &mut scheduler,
            rng: &mut rng,
            config: &config,
        };
        blueprint.on_spawn(&mut ctx, actor, &req);
        actor
    };
    queue.apply(&mut world);

    let kind = *world.get::<EnemyKind>(actor).unwrap();
    assert!(matches!(
        kind,
        EnemyKind::RedSquare | EnemyKind::YellowSquare
    ));

    // Trajectory: leftward at the kind's speed.
    let vel = world.get::<LinearVelocity>(actor).unwrap().0;
    assert_eq!(vel, Vec2::NEG_X * kind.speed(&config));

    // Lifetime restarted for this acquisition.
    assert_eq!(
        scheduler.remaining(actor).unwrap().as_secs_f32(),
        config.enemy_lifetime
    );
}

#[test]
fn waves_request_spawns_inside_the_play_area() {
    let mut world = World::new();
    world.insert_resource(spawner::SpawnCadence::new(1.0));
    world.insert_resource(GameRng::seeded(9));
    world.insert_resource(PlayArea::default());
    world.init_resource::<Messages<SpawnRequest>>();

    let mut time = Time::default();
    time.advance_by(std::time::Duration::from_secs_f32(1.05));
    world.insert_resource(time);

    run_system_once(&mut world, spawner::spawn_wave);
    let requests = run_system_once(
        &mut world,
        |mut reader: MessageReader<SpawnRequest>| -> Vec<SpawnRequest> {
            reader.read().copied().collect()
        },
    );

    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert!(ENEMY_POOLS.contains(&req.tag));
    assert!(req.tag == SQUARE_POOL || req.tag == METEOR_POOL);
    assert_eq!(req.heading, Vec2::NEG_X);

    let area = PlayArea::default();
    assert!(req.pos.x > area.max.x);
    assert!(req.pos.y >= area.min.y && req.pos.y <= area.max.y);
}
