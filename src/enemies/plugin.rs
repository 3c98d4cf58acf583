//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai::{self, AiDebugConfig};
use super::animation;
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::navigation;
use crate::core::PlayState;

/// Enemy plugin - handles enemy data, AI, movement, and animations.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<EnemyRegistry>()
            .init_resource::<AiDebugConfig>()
            // Definitions must exist before the level spawns enemies
            .add_systems(Startup, load_enemy_definitions)
            // Brains decide, then agents move
            .add_systems(
                Update,
                (
                    ai::tick_enemy_brains,
                    navigation::drive_nav_agents,
                    ai::announce_detection,
                )
                    .chain()
                    .run_if(in_state(PlayState::Running)),
            )
            // Animation systems run after the brains have updated poses
            .add_systems(
                Update,
                (
                    animation::setup_enemy_animations,
                    animation::play_enemy_animations,
                )
                    .chain()
                    .after(ai::tick_enemy_brains)
                    .run_if(in_state(PlayState::Running)),
            )
            .add_systems(
                Update,
                (ai::toggle_ai_debug, ai::draw_sight_lines).chain(),
            );
    }
}
