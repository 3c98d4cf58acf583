//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;

use super::events::*;
use super::states::*;
use crate::world::LevelRegistry;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame and its Running/Paused sub-states)
/// - Global events (EnemyStateChanged, ObjectPlaced)
/// - Basic game flow systems
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()

            .add_event::<EnemyStateChanged>()
            .add_event::<ObjectPlaced>()

            // Leave Loading once the startup loaders have inserted their registries
            .add_systems(
                Update,
                finish_loading.run_if(in_state(GameState::Loading)),
            )

            // Escape pauses, F5 restarts the level
            .add_systems(
                Update,
                (handle_pause_input, handle_restart_input).run_if(in_state(GameState::InGame)),
            );
    }
}

/// Transition from Loading to InGame when level data is available.
fn finish_loading(
    levels: Option<Res<LevelRegistry>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if levels.is_some() {
        next_state.set(GameState::InGame);
    }
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<PlayState>>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            PlayState::Running => next_state.set(PlayState::Paused),
            PlayState::Paused => next_state.set(PlayState::Running),
        }
    }
}

/// Handle F5 to tear the level down and build it again.
fn handle_restart_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::F5) {
        info!("Restarting level");
        next_state.set(GameState::Loading);
    }
}
