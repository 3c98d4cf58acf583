//! Enemy spawning from definitions.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::animation::NeedsAnimationSetup;
use super::brain::{EnemyBrain, Patrol};
use super::components::{Enemy, EnemyPose, EnemyType, EnemyVoice};
use super::data::EnemyDefinition;
use super::navigation::NavAgent;

/// Spawn one enemy at `position` patrolling `waypoints`.
///
/// The brain is started before the entity exists so the agent already heads
/// for the first waypoint on the first frame. `extra` lets the caller tag the
/// entity (e.g. for level cleanup).
pub fn spawn_enemy(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    enemy_type: &str,
    definition: &EnemyDefinition,
    position: Vec3,
    waypoints: Vec<Vec3>,
    extra: impl Bundle,
) -> Entity {
    let mut agent = NavAgent::new(position, definition.stopping_distance);
    let brain = EnemyBrain::start(definition.tuning.clone(), Patrol::new(waypoints), &mut agent);
    let collider_config = definition.collider.clone().unwrap_or_default();
    // The transform sits at the feet; lift the capsule so it stands on them
    let body_center = Vec3::Y * (collider_config.half_height + collider_config.radius);
    let capsule = Collider::capsule_y(collider_config.half_height, collider_config.radius);

    let mut enemy = commands.spawn((
        Enemy,
        EnemyType(enemy_type.to_string()),
        brain,
        agent,
        EnemyPose::default(),
        EnemyVoice::default(),
        definition.sounds.load(asset_server),
        Transform::from_translation(position)
            .with_scale(Vec3::splat(definition.scale)),
        Visibility::default(),
        Collider::compound(vec![(body_center, Quat::IDENTITY, capsule)]),
        RigidBody::KinematicPositionBased,
    ));
    enemy.insert(extra);

    match &definition.model_path {
        Some(path) => {
            enemy.insert((SceneRoot(asset_server.load(path.clone())), NeedsAnimationSetup));
        }
        None => {
            let body = Capsule3d::new(collider_config.radius, collider_config.half_height * 2.0);
            enemy.with_children(|parent| {
                parent.spawn((
                    Mesh3d(meshes.add(body)),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: Color::srgb(0.35, 0.40, 0.30),
                        perceptual_roughness: 0.9,
                        ..default()
                    })),
                    Transform::from_translation(body_center),
                ));
            });
        }
    }

    let entity = enemy.id();
    info!("Spawned {} at {:?}", definition.name, position);
    entity
}
