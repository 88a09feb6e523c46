//! Game-flow plugin: the global phase machine.
//!
//! Four phases govern the whole session. The machine itself only owns the
//! current phase and its change notifications; everything an engine must do
//! about a transition (freeze time, present another scene) is recorded as a
//! [`HostDirective`] and applied by a separate system, so the machine stays
//! a plain value that tests can drive directly.
//!
//! Phase gating elsewhere in the game uses the [`phase_is`] run condition,
//! e.g. shooting and spawning only run while `Playing`.

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::plugins::events::{EventBus, Subscription};
use crate::plugins::lifetime::LifetimeScheduler;
use crate::plugins::player::{Invincible, Player, WeaponLevel, PLAYER_START};
use crate::plugins::pooling::{ActorState, Detached, Pooled};
use crate::plugins::score::Score;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Playing,
    Paused,
    GameOver,
}

/// Scene the host is asked to present on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameScene {
    MainMenu,
    Gameplay,
}

/// Side effect of a phase transition, addressed to the host engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostDirective {
    SetTimeScale(f32),
    LoadScene(GameScene),
}

#[derive(Resource, Default)]
pub struct GameFlow {
    current: GamePhase,
    changes: EventBus<GamePhase>,
    directives: Vec<HostDirective>,
}

impl GameFlow {
    pub fn current(&self) -> GamePhase {
        self.current
    }

    /// Subscribe to phase changes. Callbacks fire synchronously inside
    /// `set_phase`, after the phase has been assigned.
    pub fn on_change(
        &mut self,
        callback: impl FnMut(&GamePhase) + Send + Sync + 'static,
    ) -> Subscription {
        self.changes.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, token: Subscription) -> bool {
        self.changes.unsubscribe(token)
    }

    /// Transition to `next`. Identity transitions are a no-op: no
    /// notification, no directives.
    pub fn set_phase(&mut self, next: GamePhase) {
        if next == self.current {
            return;
        }
        self.current = next;
        self.changes.publish(next);

        match next {
            GamePhase::MainMenu => {
                self.directives.push(HostDirective::SetTimeScale(1.0));
                self.directives
                    .push(HostDirective::LoadScene(GameScene::MainMenu));
            }
            GamePhase::Playing => {
                self.directives.push(HostDirective::SetTimeScale(1.0));
                self.directives
                    .push(HostDirective::LoadScene(GameScene::Gameplay));
            }
            GamePhase::Paused | GamePhase::GameOver => {
                self.directives.push(HostDirective::SetTimeScale(0.0));
            }
        }
    }

    /// Playing <-> Paused; a no-op from any other phase.
    pub fn toggle_pause(&mut self) {
        match self.current {
            GamePhase::Playing => self.set_phase(GamePhase::Paused),
            GamePhase::Paused => self.set_phase(GamePhase::Playing),
            _ => {}
        }
    }

    /// Re-enter Playing from any phase (GameOver included) and zero the
    /// score.
    pub fn restart(&mut self, score: &Score) {
        score.reset();
        if self.current == GamePhase::Playing {
            // No phase change to notify, but the host still gets a fresh
            // field.
            self.directives
                .push(HostDirective::LoadScene(GameScene::Gameplay));
        } else {
            self.set_phase(GamePhase::Playing);
        }
    }

    /// Drain directives accumulated since the last call.
    pub fn take_directives(&mut self) -> Vec<HostDirective> {
        std::mem::take(&mut self.directives)
    }
}

/// Run condition: gate a system on the current phase.
pub fn phase_is(phase: GamePhase) -> impl FnMut(Res<GameFlow>) -> bool + Clone {
    move |flow: Res<GameFlow>| flow.current() == phase
}

/// A transition asked the host to present this scene.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneRequested(pub GameScene);

/// Translate accumulated directives into engine effects.
pub fn apply_host_directives(
    mut flow: ResMut<GameFlow>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut scenes: MessageWriter<SceneRequested>,
) {
    for directive in flow.take_directives() {
        match directive {
            HostDirective::SetTimeScale(scale) => virtual_time.set_relative_speed(scale),
            HostDirective::LoadScene(scene) => {
                scenes.write(SceneRequested(scene));
            }
        }
    }
}

/// Our stand-in for a scene load: recycle every active pooled actor, drop
/// every detached one, and put the player back in its starting state.
pub fn reset_play_field(
    mut reader: MessageReader<SceneRequested>,
    mut commands: Commands,
    mut scheduler: ResMut<LifetimeScheduler>,
    mut q_pooled: Query<&mut ActorState, With<Pooled>>,
    q_detached: Query<Entity, With<Detached>>,
    mut q_player: Query<
        (Entity, &mut Transform, &mut WeaponLevel, &mut Visibility),
        With<Player>,
    >,
) {
    if reader.is_empty() {
        return;
    }
    reader.clear();

    for mut state in &mut q_pooled {
        if *state == ActorState::Active {
            *state = ActorState::PendingReturn;
        }
    }

    for entity in &q_detached {
        scheduler.cancel(entity);
        commands.entity(entity).despawn();
    }

    if let Ok((entity, mut tf, mut weapon, mut vis)) = q_player.single_mut() {
        tf.translation.x = PLAYER_START.x;
        tf.translation.y = PLAYER_START.y;
        *weapon = WeaponLevel::default();
        *vis = Visibility::Visible;
        commands.entity(entity).remove::<Invincible>();
    }
}

/// Keyboard glue: Enter starts, Escape pauses, R restarts after a game over.
fn phase_input_controls(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut flow: ResMut<GameFlow>,
    score: Res<Score>,
) {
    let Some(keys) = keys else {
        return;
    };
    match flow.current() {
        GamePhase::MainMenu => {
            if keys.just_pressed(KeyCode::Enter) {
                flow.set_phase(GamePhase::Playing);
            }
        }
        GamePhase::Playing | GamePhase::Paused => {
            if keys.just_pressed(KeyCode::Escape) {
                flow.toggle_pause();
            }
        }
        GamePhase::GameOver => {
            if keys.just_pressed(KeyCode::KeyR) {
                flow.restart(&score);
            }
        }
    }
}

fn update_scene_messages(mut msgs: ResMut<Messages<SceneRequested>>) {
    msgs.update();
}

pub fn plugin(app: &mut App) {
    app.init_resource::<GameFlow>();
    app.init_resource::<Messages<SceneRequested>>();

    app.add_systems(Update, phase_input_controls);
    app.add_systems(
        PostUpdate,
        (
            apply_host_directives,
            reset_play_field.after(apply_host_directives),
            update_scene_messages.after(reset_play_field),
        ),
    );
}
