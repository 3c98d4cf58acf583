//! Level data structures and RON loading.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::DataLoadError;
use super::placement::{Placement, SpawnPoints};

type Triple = (f32, f32, f32);

fn vec3(value: Triple) -> Vec3 {
    Vec3::new(value.0, value.1, value.2)
}

/// List the `.ron` files in a data directory.
pub fn ron_files_in(dir: &Path) -> Result<Vec<PathBuf>, DataLoadError> {
    if !dir.exists() {
        return Err(DataLoadError::FileNotFound(dir.display().to_string()));
    }

    let entries = fs::read_dir(dir).map_err(|e| DataLoadError::ReadError {
        path: dir.display().to_string(),
        details: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();
    Ok(files)
}

// === Environment ===

fn default_light_color() -> Triple {
    (1.0, 0.8, 0.6)
}

fn default_light_range() -> f32 {
    15.0
}

/// Point light definition.
#[derive(Debug, Clone, Deserialize)]
pub struct LightDef {
    pub position: Triple,
    pub intensity: f32,
    #[serde(default)]
    pub shadows: bool,
    #[serde(default = "default_light_color")]
    pub color: Triple,
    #[serde(default = "default_light_range")]
    pub range: f32,
}

/// Global ambient light settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalAmbientDef {
    pub color: Triple,
    pub brightness: f32,
}

impl Default for GlobalAmbientDef {
    fn default() -> Self {
        Self {
            color: (0.4, 0.4, 0.5),
            brightness: 30.0,
        }
    }
}

/// Axis-aligned wall block, given by center and full size.
#[derive(Debug, Clone, Deserialize)]
pub struct WallDef {
    pub center: Triple,
    pub size: Triple,
}

// === Spawns ===

/// Enemy spawn with its patrol route.
#[derive(Debug, Clone, Deserialize)]
pub struct EnemySpawnDef {
    /// Enemy type identifier (matches EnemyRegistry key)
    pub kind: String,
    pub position: Triple,
    #[serde(default)]
    pub waypoints: Vec<Triple>,
}

/// One spot a randomized object may end up at.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacementDef {
    pub position: Triple,
    /// Rotation around the vertical axis
    #[serde(default)]
    pub yaw_degrees: f32,
}

impl PlacementDef {
    pub fn to_placement(&self) -> Placement {
        Placement::new(
            vec3(self.position),
            Quat::from_rotation_y(self.yaw_degrees.to_radians()),
        )
    }
}

fn default_object_size() -> Triple {
    (1.0, 0.8, 0.6)
}

/// Object moved to one of several candidate spots when the level is built.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomObjectDef {
    pub name: String,
    /// glTF scene; a plain box is used when absent
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default = "default_object_size")]
    pub size: Triple,
    pub candidates: Vec<PlacementDef>,
}

// === Level Definition ===

fn default_floor_size() -> (f32, f32) {
    (30.0, 30.0)
}

/// Raw level definition as read from RON.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDefinitionRaw {
    pub name: String,
    #[serde(default = "default_floor_size")]
    pub floor_size: (f32, f32),
    #[serde(default)]
    pub global_ambient: GlobalAmbientDef,
    pub player_start: Triple,
    #[serde(default)]
    pub walls: Vec<WallDef>,
    #[serde(default)]
    pub lights: Vec<LightDef>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawnDef>,
    #[serde(default)]
    pub objects: Vec<RandomObjectDef>,
}

/// Enemy spawn resolved to world coordinates.
#[derive(Debug, Clone)]
pub struct EnemySpawn {
    pub kind: String,
    pub position: Vec3,
    pub waypoints: Vec<Vec3>,
}

/// Randomized object with a validated candidate list.
#[derive(Debug, Clone)]
pub struct RandomObject {
    pub name: String,
    pub model_path: Option<String>,
    pub size: Vec3,
    pub spawn_points: SpawnPoints,
}

/// Processed level definition.
#[derive(Debug, Clone)]
pub struct LevelDefinition {
    pub name: String,
    pub floor_size: Vec2,
    pub global_ambient: GlobalAmbientDef,
    pub player_start: Vec3,
    pub walls: Vec<WallDef>,
    pub lights: Vec<LightDef>,
    pub enemies: Vec<EnemySpawn>,
    pub objects: Vec<RandomObject>,
}

impl LevelDefinition {
    /// Create from raw definition, rejecting objects without candidates.
    pub fn from_raw(raw: LevelDefinitionRaw) -> Result<Self, DataLoadError> {
        let objects = raw
            .objects
            .into_iter()
            .map(|object| {
                let placements = object.candidates.iter().map(PlacementDef::to_placement).collect();
                Ok(RandomObject {
                    spawn_points: SpawnPoints::new(&object.name, placements)?,
                    name: object.name,
                    model_path: object.model_path,
                    size: vec3(object.size),
                })
            })
            .collect::<Result<Vec<_>, DataLoadError>>()?;

        let enemies = raw
            .enemies
            .into_iter()
            .map(|spawn| EnemySpawn {
                position: vec3(spawn.position),
                waypoints: spawn.waypoints.into_iter().map(vec3).collect(),
                kind: spawn.kind,
            })
            .collect();

        Ok(Self {
            name: raw.name,
            floor_size: Vec2::new(raw.floor_size.0, raw.floor_size.1),
            global_ambient: raw.global_ambient,
            player_start: vec3(raw.player_start),
            walls: raw.walls,
            lights: raw.lights,
            enemies,
            objects,
        })
    }

    /// Parse and resolve a level file's contents.
    pub fn parse(path: &str, contents: &str) -> Result<Self, DataLoadError> {
        let raw: LevelDefinitionRaw = ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })?;
        Self::from_raw(raw)
    }
}

/// Resource storing all loaded level definitions.
#[derive(Resource, Default)]
pub struct LevelRegistry {
    pub levels: HashMap<String, LevelDefinition>,
}

impl LevelRegistry {
    /// Get a level by name.
    pub fn get(&self, name: &str) -> Option<&LevelDefinition> {
        self.levels.get(name)
    }
}

/// Resource indicating which level to load.
#[derive(Resource)]
pub struct CurrentLevel {
    pub name: String,
}

impl Default for CurrentLevel {
    fn default() -> Self {
        Self {
            name: "crypt".to_string(),
        }
    }
}

/// Levels are registered under their file stem.
fn level_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn read_level(path: &Path) -> Result<(String, LevelDefinition), DataLoadError> {
    let display = path.display().to_string();
    let level_name = level_name(path);

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;

    Ok((level_name, LevelDefinition::parse(&display, &contents)?))
}

/// Load all level definitions from assets/data/levels/.
pub fn load_level_definitions(mut commands: Commands) {
    let mut registry = LevelRegistry::default();

    match ron_files_in(Path::new("assets/data/levels")) {
        Ok(files) => {
            for path in files {
                match read_level(&path) {
                    Ok((level_name, level)) => {
                        info!("Loaded level: {}", level_name);
                        registry.levels.insert(level_name, level);
                    }
                    Err(e) => error!("Skipping level: {}", e),
                }
            }
        }
        Err(e) => warn!("No levels loaded: {}", e),
    }

    info!("Loaded {} level(s)", registry.levels.len());
    commands.insert_resource(registry);
    commands.init_resource::<CurrentLevel>();
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRYPT: &str = r#"(
        name: "Test Crypt",
        player_start: (0.0, 1.0, 0.0),
        walls: [(center: (0.0, 1.5, -10.0), size: (20.0, 3.0, 0.5))],
        enemies: [
            (kind: "ghoul", position: (5.0, 0.0, 5.0), waypoints: [(5.0, 0.0, 5.0), (-5.0, 0.0, 5.0)]),
            (kind: "ghoul", position: (0.0, 0.0, 8.0)),
        ],
        objects: [
            (
                name: "chest",
                candidates: [
                    (position: (8.0, 0.0, -8.0), yaw_degrees: 90.0),
                    (position: (-8.0, 0.0, -8.0)),
                ],
            ),
        ],
    )"#;

    #[test]
    fn parses_level_with_defaults() {
        let level = LevelDefinition::parse("crypt.ron", CRYPT).unwrap();

        assert_eq!(level.name, "Test Crypt");
        assert_eq!(level.floor_size, Vec2::new(30.0, 30.0));
        assert_eq!(level.player_start, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(level.walls.len(), 1);
        assert!(level.lights.is_empty());

        assert_eq!(level.enemies.len(), 2);
        assert_eq!(level.enemies[0].waypoints.len(), 2);
        assert!(level.enemies[1].waypoints.is_empty());

        let chest = &level.objects[0];
        assert_eq!(chest.size, Vec3::new(1.0, 0.8, 0.6));
        assert_eq!(chest.spawn_points.len(), 2);
        assert_eq!(chest.spawn_points.as_slice()[1].rotation, Quat::IDENTITY);
    }

    #[test]
    fn yaw_becomes_rotation_about_up_axis() {
        let placement = PlacementDef {
            position: (1.0, 2.0, 3.0),
            yaw_degrees: 90.0,
        }
        .to_placement();

        assert_eq!(placement.translation, Vec3::new(1.0, 2.0, 3.0));
        let forward = placement.rotation * Vec3::NEG_Z;
        assert!(forward.distance(Vec3::NEG_X) < 1e-5);
    }

    #[test]
    fn object_without_candidates_fails_the_level() {
        let contents = r#"(
            name: "Bare",
            player_start: (0.0, 1.0, 0.0),
            objects: [(name: "chest", candidates: [])],
        )"#;

        let err = LevelDefinition::parse("bare.ron", contents).unwrap_err();
        assert!(matches!(err, DataLoadError::EmptySpawnPoints { object } if object == "chest"));
    }

    #[test]
    fn level_is_named_after_its_file() {
        assert_eq!(level_name(Path::new("assets/data/levels/crypt.ron")), "crypt");
        assert_eq!(level_name(Path::new("levels/crypt.level.ron")), "crypt.level");
    }

    #[test]
    fn missing_directory_is_reported() {
        let err = ron_files_in(Path::new("does/not/exist")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound(_)));
    }
}
