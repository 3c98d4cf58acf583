//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. Enemy brains only
//! tick while `PlayState::Running`, so pausing also freezes any rage countdown.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` while data files are read
/// - Move to `InGame` once the level registry exists
/// - Returning to `Loading` tears the level down so it is rebuilt fresh
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Waiting for data files
    #[default]
    Loading,
    /// Level is built and the player is in it
    InGame,
}

/// Sub-states for gameplay - only active when GameState::InGame.
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    /// Normal gameplay - movement and enemy AI
    #[default]
    Running,
    /// Game is paused (world stays visible)
    Paused,
}
