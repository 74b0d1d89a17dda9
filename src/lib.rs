//! Icebreak - simulation engine for a tile-based ice-breaking chase game
//!
//! Core modules:
//! - `domain`: grid, terrain, entities, A* pathfinding, AI profiles
//! - `sim`: levels, tick loop, builder, campaign, sessions, snapshots
//! - `config`: `config.toml` loading
//! - `error`: construction, session and config errors

pub mod config;
pub mod domain;
pub mod error;
pub mod sim;

pub use config::{GameConfig, Timing};
pub use error::{BuildError, ConfigError, SessionError};
pub use sim::{GameSession, Level, LevelBuilder};
