/// Error types for level construction, sessions and configuration.
///
/// Bad construction input is always an error, never silently patched.
/// Illegal moves are not errors: commands answer with `bool` / counts.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::location::Location;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("a level needs at least one player")]
    NoPlayers,
    #[error("at most two players are supported, got {0}")]
    TooManyPlayers(usize),
    #[error("a level needs at least one fruit")]
    NoFruits,
    #[error("map {width}x{height} is smaller than 3x3")]
    MapTooSmall { width: i32, height: i32 },
    #[error("not enough free cells: need {needed}, have {available}")]
    NotEnoughSpace { needed: usize, available: usize },
    #[error("player spawn {0} is outside the playable area")]
    InvalidSpawn(Location),
    #[error("unknown campaign level {level} (levels run 1..={max})")]
    UnknownLevel { level: usize, max: usize },
    #[error("layout row {row}: {reason}")]
    Layout { row: usize, reason: String },
}

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no active level (campaign finished)")]
    NoActiveLevel,
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("snapshot does not match the rebuilt level: {0}")]
    SnapshotMismatch(String),
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config.toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
