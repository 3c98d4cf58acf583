//! World module - levels, environment and randomized object placement.

mod builder;
pub mod data;
mod error;
mod placement;
mod plugin;

pub use builder::LevelGeometry;
pub use data::{ron_files_in, CurrentLevel, LevelDefinition, LevelRegistry};
pub use error::DataLoadError;
pub use placement::{place_randomized_objects, Placement, RandomPlacement, SpawnPoints};
pub use plugin::WorldPlugin;
