//! Randomized object placement.
//!
//! A level lists a few candidate spots for objects like treasure chests. When
//! the level is built each such object picks one of them uniformly at random
//! and is moved there exactly once.

use bevy::prelude::*;
use rand::Rng;

use super::error::DataLoadError;
use crate::core::ObjectPlaced;

/// Position and orientation an object can be moved to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Placement {
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self { translation, rotation }
    }

    /// Copy position and rotation onto `transform`. Scale is left alone.
    pub fn apply(&self, transform: &mut Transform) {
        transform.translation = self.translation;
        transform.rotation = self.rotation;
    }
}

/// Ordered, non-empty set of candidate placements.
#[derive(Clone, Debug)]
pub struct SpawnPoints(Vec<Placement>);

impl SpawnPoints {
    pub fn new(object: &str, placements: Vec<Placement>) -> Result<Self, DataLoadError> {
        if placements.is_empty() {
            return Err(DataLoadError::EmptySpawnPoints {
                object: object.to_string(),
            });
        }
        Ok(Self(placements))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[Placement] {
        &self.0
    }

    /// Pick one candidate uniformly at random, returning its index too.
    pub fn choose(&self, rng: &mut impl Rng) -> (usize, &Placement) {
        let index = rng.gen_range(0..self.0.len());
        (index, &self.0[index])
    }
}

/// Object still waiting to be moved to one of its candidate spots.
#[derive(Component, Clone, Debug)]
pub struct RandomPlacement {
    pub object: String,
    pub candidates: SpawnPoints,
}

/// Move every pending object to a random candidate and reveal it.
///
/// The component is removed afterwards, so an object is placed once per level
/// build.
pub fn place_randomized_objects(
    mut commands: Commands,
    mut query: Query<(Entity, &RandomPlacement, &mut Transform, Option<&mut Visibility>)>,
    mut placed_events: EventWriter<ObjectPlaced>,
) {
    let mut rng = rand::thread_rng();

    for (entity, pending, mut transform, visibility) in query.iter_mut() {
        let (index, placement) = pending.candidates.choose(&mut rng);
        placement.apply(&mut transform);

        // Spawned hidden so it never shows at the origin for a frame
        if let Some(mut visibility) = visibility {
            *visibility = Visibility::Inherited;
        }

        commands.entity(entity).remove::<RandomPlacement>();
        placed_events.send(ObjectPlaced { object: entity, index });

        info!(
            "Placed {} at candidate {} of {}",
            pending.object,
            index,
            pending.candidates.len()
        );
    }
}
