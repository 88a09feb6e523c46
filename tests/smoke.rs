mod common;

use square_shooter::plugins::enemies::{METEOR_POOL, SQUARE_POOL};
use square_shooter::plugins::flow::{GameFlow, GamePhase};
use square_shooter::plugins::pooling::PoolRegistry;
use square_shooter::plugins::projectiles::BULLET_POOL;

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }
}

#[test]
fn pools_are_warmed_at_startup() {
    let mut app = common::app_headless();
    app.update();

    let registry = app.world().resource::<PoolRegistry>();
    for tag in [BULLET_POOL, SQUARE_POOL, METEOR_POOL] {
        let pool = registry.pool(tag).unwrap_or_else(|| panic!("missing pool {tag}"));
        assert!(!pool.is_empty());
        assert_eq!(pool.active_count(), 0);
    }
}

#[test]
fn session_starts_in_the_main_menu() {
    let mut app = common::app_headless();
    app.update();

    assert_eq!(
        app.world().resource::<GameFlow>().current(),
        GamePhase::MainMenu
    );
}
