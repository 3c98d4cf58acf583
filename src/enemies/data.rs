//! Enemy data loading from RON files.

use bevy::prelude::*;
use bevy_kira_audio::prelude::AudioSource;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::brain::BrainConfig;
use super::components::EnemySounds;
use crate::world::{ron_files_in, DataLoadError};

/// Animation clip indices inside the enemy's glTF file.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct AnimationIndices {
    pub idle: u32,
    pub walk: u32,
    pub chase: Option<u32>, // Falls back to walk
    pub rage: Option<u32>,  // Falls back to attack
    pub attack: u32,
}

/// Audio clip paths per cue. Missing entries stay silent.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct SoundPaths {
    pub idle: Option<String>,
    pub walking: Option<String>,
    pub chasing: Option<String>,
    pub rage: Option<String>,
    pub attack: Option<String>,
}

impl SoundPaths {
    /// Start loading every configured clip.
    pub fn load(&self, asset_server: &AssetServer) -> EnemySounds {
        let load = |path: &Option<String>| -> Option<Handle<AudioSource>> {
            path.as_ref().map(|path| asset_server.load(path.clone()))
        };
        EnemySounds {
            idle: load(&self.idle),
            walking: load(&self.walking),
            chasing: load(&self.chasing),
            rage: load(&self.rage),
            attack: load(&self.attack),
        }
    }
}

/// Collider configuration for an enemy type.
#[derive(Deserialize, Clone, Debug)]
pub struct ColliderConfig {
    pub half_height: f32,
    pub radius: f32,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            half_height: 0.5,
            radius: 0.3,
        }
    }
}

fn default_stopping_distance() -> f32 {
    0.5
}

fn default_scale() -> f32 {
    1.0
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    /// glTF scene; a plain capsule body is used when absent
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub tuning: BrainConfig,
    /// Distance at which a waypoint counts as reached
    #[serde(default = "default_stopping_distance")]
    pub stopping_distance: f32,
    #[serde(default)]
    pub collider: Option<ColliderConfig>,
    #[serde(default)]
    pub animations: Option<AnimationIndices>,
    #[serde(default)]
    pub sounds: SoundPaths,
}

impl EnemyDefinition {
    /// Parse and validate a definition for the enemy type `kind`.
    pub fn parse(kind: &str, path: &str, contents: &str) -> Result<Self, DataLoadError> {
        let definition: Self = ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })?;

        definition.tuning.validate(kind)?;
        if !definition.stopping_distance.is_finite() || definition.stopping_distance < 0.0 {
            return Err(DataLoadError::InvalidTuning {
                enemy: kind.to_string(),
                field: "stopping_distance",
                value: definition.stopping_distance,
            });
        }

        Ok(definition)
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }

    /// Like [`get`](Self::get), but a missing type is an error.
    pub fn resolve(&self, enemy_type: &str) -> Result<&EnemyDefinition, DataLoadError> {
        self.get(enemy_type).ok_or_else(|| DataLoadError::UnknownEnemyType {
            kind: enemy_type.to_string(),
        })
    }
}

/// Read one definition file; the enemy type is the file stem.
fn read_definition(path: &Path) -> Result<(String, EnemyDefinition), DataLoadError> {
    let display = path.display().to_string();
    let kind = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;

    let definition = EnemyDefinition::parse(&kind, &display, &contents)?;
    Ok((kind, definition))
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let files = match ron_files_in(Path::new("assets/data/enemies")) {
        Ok(files) => files,
        Err(e) => {
            warn!("No enemy definitions loaded: {}", e);
            return;
        }
    };

    for path in files {
        match read_definition(&path) {
            Ok((enemy_type, definition)) => {
                info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                registry.definitions.insert(enemy_type, definition);
            }
            Err(e) => {
                error!("Skipping enemy definition: {}", e);
            }
        }
    }

    info!(
        "Loaded {} enemy definitions",
        registry.definitions.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const GHOUL: &str = r#"(
        name: "Ghoul",
        model_path: Some("models/enemies/ghoul.glb#Scene0"),
        tuning: (
            idle_time: 3.0,
            chase_speed: 5.0,
        ),
        animations: Some((idle: 0, walk: 1, attack: 2)),
        sounds: (
            rage: Some("sounds/ghoul_rage.ogg"),
        ),
    )"#;

    #[test]
    fn parses_definition_with_defaults() {
        let definition = EnemyDefinition::parse("ghoul", "ghoul.ron", GHOUL).unwrap();

        assert_eq!(definition.name, "Ghoul");
        assert_eq!(definition.model_path.as_deref(), Some("models/enemies/ghoul.glb#Scene0"));
        assert_eq!(definition.scale, 1.0);
        assert_eq!(definition.stopping_distance, 0.5);
        assert_eq!(definition.tuning.idle_time, 3.0);
        assert_eq!(definition.tuning.chase_speed, 5.0);
        assert_eq!(definition.tuning.sight_distance, BrainConfig::default().sight_distance);

        let indices = definition.animations.unwrap();
        assert_eq!(indices.chase, None);
        assert_eq!(indices.attack, 2);
        assert_eq!(definition.sounds.rage.as_deref(), Some("sounds/ghoul_rage.ogg"));
        assert_eq!(definition.sounds.idle, None);
    }

    #[test]
    fn rejects_negative_tuning() {
        let contents = r#"(
            name: "Broken",
            model_path: Some("broken.glb#Scene0"),
            tuning: (rage_duration: -1.0),
        )"#;

        let err = EnemyDefinition::parse("broken", "broken.ron", contents).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::InvalidTuning { field: "rage_duration", .. }
        ));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let err = EnemyDefinition::parse("bad", "bad.ron", "(name: ").unwrap_err();
        match err {
            DataLoadError::ParseError { path, .. } => assert_eq!(path, "bad.ron"),
            other => panic!("unexpected error: {other}"),
        }
    }

    fn asset_exists(path: &str) -> bool {
        let file = path.split('#').next().unwrap_or(path);
        Path::new("assets").join(file).exists()
    }

    #[test]
    fn shipped_definitions_only_reference_files_that_ship() {
        for path in ron_files_in(Path::new("assets/data/enemies")).unwrap() {
            let (kind, definition) = read_definition(&path).unwrap();
            let sounds = &definition.sounds;
            let referenced = [
                &definition.model_path,
                &sounds.idle,
                &sounds.walking,
                &sounds.chasing,
                &sounds.rage,
                &sounds.attack,
            ];

            for asset in referenced.into_iter().flatten() {
                assert!(asset_exists(asset), "{kind} references missing asset {asset}");
            }
        }
    }

    #[test]
    fn model_is_optional() {
        let definition =
            EnemyDefinition::parse("wisp", "wisp.ron", r#"(name: "Wisp")"#).unwrap();
        assert_eq!(definition.model_path, None);
    }

    #[test]
    fn unknown_type_is_an_error() {
        let registry = EnemyRegistry::default();
        let err = registry.resolve("lich").unwrap_err();
        assert!(matches!(err, DataLoadError::UnknownEnemyType { kind } if kind == "lich"));
    }
}
