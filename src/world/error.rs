//! Error types for game data loading.

use thiserror::Error;

/// Errors that can occur when loading level or enemy data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File or directory could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A randomized object was given nowhere to go.
    #[error("Object '{object}' has no candidate placements")]
    EmptySpawnPoints { object: String },

    /// A tuning value is negative or not a number.
    #[error("Invalid {field} for enemy '{enemy}': {value}")]
    InvalidTuning {
        enemy: String,
        field: &'static str,
        value: f32,
    },

    /// A level references an enemy type with no definition.
    #[error("Unknown enemy type '{kind}'")]
    UnknownEnemyType { kind: String },
}
