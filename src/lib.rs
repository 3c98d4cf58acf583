//! Crypt Warden - a small first-person crypt crawl in Bevy.
//!
//! Ghouls patrol the crypt and chase the player on sight. A ghoul that closes
//! in during a chase flies into a brief rage before it attacks. A treasure
//! chest is hidden at one of several spots, chosen anew every time the level
//! is built.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events
//! - **Player**: First-person movement and camera; the target enemies hunt
//! - **Enemies**: Patrol/chase state machine, navigation, animation and voices
//! - **World**: Level data, construction and randomized object placement

pub mod core;
pub mod enemies;
pub mod player;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct CryptWardenPlugin;

impl Plugin for CryptWardenPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // World systems
            .add_plugins(world::WorldPlugin);
    }
}
