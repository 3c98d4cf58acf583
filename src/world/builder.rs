//! Level construction from data definitions.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::data::{GlobalAmbientDef, LevelDefinition, LightDef, RandomObject, WallDef};
use super::placement::RandomPlacement;
use crate::enemies::data::EnemyRegistry;
use crate::enemies::spawn_enemy;

/// Marker for all level entities that should be cleaned up.
#[derive(Component)]
pub struct LevelGeometry;

/// Build a level from a level definition.
///
/// Returns the player start position.
pub fn build_level_from_data(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    level: &LevelDefinition,
    asset_server: &AssetServer,
    enemy_registry: &EnemyRegistry,
) -> Vec3 {
    setup_environment(commands, &level.global_ambient);

    let stone = materials.add(StandardMaterial {
        base_color: Color::srgb(0.28, 0.27, 0.26),
        perceptual_roughness: 0.9,
        ..default()
    });
    let stone_wall = materials.add(StandardMaterial {
        base_color: Color::srgb(0.32, 0.30, 0.28),
        perceptual_roughness: 0.8,
        ..default()
    });

    spawn_floor(commands, meshes, stone, level.floor_size);
    for wall in &level.walls {
        spawn_wall(commands, meshes, stone_wall.clone(), wall);
    }
    for light in &level.lights {
        spawn_light(commands, light);
    }

    for spawn in &level.enemies {
        match enemy_registry.resolve(&spawn.kind) {
            Ok(definition) => {
                spawn_enemy(
                    commands,
                    meshes,
                    materials,
                    asset_server,
                    &spawn.kind,
                    definition,
                    spawn.position,
                    spawn.waypoints.clone(),
                    LevelGeometry, // Enemies get cleaned up with the level
                );
            }
            Err(e) => error!("Skipping enemy spawn at {:?}: {}", spawn.position, e),
        }
    }

    let gilded = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.42, 0.18),
        perceptual_roughness: 0.4,
        metallic: 0.6,
        ..default()
    });
    for object in &level.objects {
        spawn_random_object(commands, meshes, gilded.clone(), asset_server, object);
    }

    level.player_start
}

/// Set up global ambient light and directional light.
fn setup_environment(commands: &mut Commands, ambient: &GlobalAmbientDef) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(ambient.color.0, ambient.color.1, ambient.color.2),
        brightness: ambient.brightness,
    });

    // Moonlight
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(0.7, 0.7, 0.75),
            illuminance: 2000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_3,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
        LevelGeometry,
    ));
}

fn spawn_floor(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    size: Vec2,
) {
    let depth = 0.5;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size.x, depth, size.y))),
        MeshMaterial3d(material),
        // Top face sits at y = 0
        Transform::from_xyz(0.0, -depth / 2.0, 0.0),
        Collider::cuboid(size.x / 2.0, depth / 2.0, size.y / 2.0),
        RigidBody::Fixed,
        LevelGeometry,
    ));
}

fn spawn_wall(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    wall: &WallDef,
) {
    let (width, height, depth) = wall.size;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(width, height, depth))),
        MeshMaterial3d(material),
        Transform::from_xyz(wall.center.0, wall.center.1, wall.center.2),
        Collider::cuboid(width / 2.0, height / 2.0, depth / 2.0),
        RigidBody::Fixed,
        LevelGeometry,
    ));
}

/// Spawn a point light.
fn spawn_light(commands: &mut Commands, light: &LightDef) {
    commands.spawn((
        PointLight {
            color: Color::srgb(light.color.0, light.color.1, light.color.2),
            intensity: light.intensity,
            range: light.range,
            shadows_enabled: light.shadows,
            ..default()
        },
        Transform::from_xyz(light.position.0, light.position.1, light.position.2),
        LevelGeometry,
    ));
}

/// Spawn an object hidden at the origin; `place_randomized_objects` moves it.
fn spawn_random_object(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    asset_server: &AssetServer,
    object: &RandomObject,
) {
    let size = object.size;
    let mut entity = commands.spawn((
        Name::new(object.name.clone()),
        RandomPlacement {
            object: object.name.clone(),
            candidates: object.spawn_points.clone(),
        },
        Transform::default(),
        Visibility::Hidden,
        LevelGeometry,
    ));

    if let Some(path) = &object.model_path {
        entity.insert(SceneRoot(asset_server.load(path.clone())));
    }

    // Body resting on the ground at the placement point
    let body_offset = Transform::from_xyz(0.0, size.y / 2.0, 0.0);
    let collider = Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0);
    entity.with_children(|parent| {
        if object.model_path.is_some() {
            parent.spawn((body_offset, collider, RigidBody::Fixed));
        } else {
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
                MeshMaterial3d(material),
                body_offset,
                collider,
                RigidBody::Fixed,
            ));
        }
    });
}
