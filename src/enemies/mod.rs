//! Enemies module - patrol/chase/rage/attack AI and the engine adapters it drives.

mod ai;
pub mod animation;
mod audio;
pub mod brain;
pub mod capabilities;
mod components;
pub mod data;
pub mod navigation;
mod plugin;
mod spawning;

pub use ai::AiDebugConfig;
pub use brain::{BrainConfig, EnemyBrain, EnemyState, EnemyStateKind, Patrol};
pub use components::*;
pub use data::EnemyRegistry;
pub use navigation::NavAgent;
pub use plugin::EnemyPlugin;
pub use spawning::spawn_enemy;
