/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// ```toml
/// [timing]
/// cherry_teleport_ms = 20000
/// cactus_toggle_ms = 30000
/// campfire_relight_ms = 10000
/// time_limit_secs = 180
///
/// [session]
/// seed = 7
/// start_level = 1
/// players = 1
/// player_profile = "expert"   # hungry | fearful | expert
/// enemy_profile = "none"      # none | patrol | chase | smart_chase | ambush | territorial
/// tick_ms = 150
/// max_ticks = 6000
/// ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::ai::{EnemyProfile, PlayerProfile};
use crate::domain::fruit::FruitTiming;
use crate::error::ConfigError;

// ── Public Config Structs ──

#[derive(Clone, Debug, Default)]
pub struct GameConfig {
    pub timing: Timing,
    pub session: SessionConfig,
}

/// Hazard intervals and the level time limit. Carried by every level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub cherry_teleport_ms: u64,
    pub cactus_toggle_ms: u64,
    pub campfire_relight_ms: u64,
    pub time_limit_secs: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            cherry_teleport_ms: default_cherry_teleport(),
            cactus_toggle_ms: default_cactus_toggle(),
            campfire_relight_ms: default_campfire_relight(),
            time_limit_secs: default_time_limit(),
        }
    }
}

impl Timing {
    pub fn fruit_timing(&self) -> FruitTiming {
        FruitTiming {
            cherry_teleport_ms: self.cherry_teleport_ms,
            cactus_toggle_ms: self.cactus_toggle_ms,
        }
    }

    pub fn time_limit_ms(&self) -> u64 {
        self.time_limit_secs.saturating_mul(1000)
    }
}

/// Headless driver settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub seed: u64,
    pub start_level: usize,
    pub players: usize,
    pub player_profile: PlayerProfile,
    pub enemy_profile: Option<EnemyProfile>,
    pub tick_ms: u64,
    pub max_ticks: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let raw = TomlSession::default();
        SessionConfig {
            seed: raw.seed,
            start_level: raw.start_level,
            players: raw.players,
            player_profile: PlayerProfile::Expert,
            enemy_profile: None,
            tick_ms: raw.tick_ms,
            max_ticks: raw.max_ticks,
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    session: TomlSession,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_cherry_teleport")]
    cherry_teleport_ms: u64,
    #[serde(default = "default_cactus_toggle")]
    cactus_toggle_ms: u64,
    #[serde(default = "default_campfire_relight")]
    campfire_relight_ms: u64,
    #[serde(default = "default_time_limit")]
    time_limit_secs: u64,
}

#[derive(Deserialize, Debug)]
struct TomlSession {
    #[serde(default = "default_seed")]
    seed: u64,
    #[serde(default = "default_start_level")]
    start_level: usize,
    #[serde(default = "default_players")]
    players: usize,
    #[serde(default = "default_player_profile")]
    player_profile: String,
    #[serde(default = "default_enemy_profile")]
    enemy_profile: String,
    #[serde(default = "default_tick_ms")]
    tick_ms: u64,
    #[serde(default = "default_max_ticks")]
    max_ticks: u64,
}

// ── Defaults ──

fn default_cherry_teleport() -> u64 { 20_000 }
fn default_cactus_toggle() -> u64 { 30_000 }
fn default_campfire_relight() -> u64 { 10_000 }
fn default_time_limit() -> u64 { 180 }

fn default_seed() -> u64 { 7 }
fn default_start_level() -> usize { 1 }
fn default_players() -> usize { 1 }
fn default_player_profile() -> String { "expert".into() }
fn default_enemy_profile() -> String { "none".into() }
fn default_tick_ms() -> u64 { 150 }
fn default_max_ticks() -> u64 { 6_000 } // 15 minutes of play at 150 ms

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            cherry_teleport_ms: default_cherry_teleport(),
            cactus_toggle_ms: default_cactus_toggle(),
            campfire_relight_ms: default_campfire_relight(),
            time_limit_secs: default_time_limit(),
        }
    }
}

impl Default for TomlSession {
    fn default() -> Self {
        TomlSession {
            seed: default_seed(),
            start_level: default_start_level(),
            players: default_players(),
            player_profile: default_player_profile(),
            enemy_profile: default_enemy_profile(),
            tick_ms: default_tick_ms(),
            max_ticks: default_max_ticks(),
        }
    }
}

// ── Profile names ──

pub fn parse_player_profile(name: &str) -> Option<PlayerProfile> {
    match name.trim().to_ascii_lowercase().as_str() {
        "hungry" => Some(PlayerProfile::Hungry),
        "fearful" => Some(PlayerProfile::Fearful),
        "expert" => Some(PlayerProfile::Expert),
        _ => None,
    }
}

pub fn parse_enemy_profile(name: &str) -> Option<EnemyProfile> {
    match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "patrol" => Some(EnemyProfile::Patrol),
        "chase" => Some(EnemyProfile::Chase),
        "smart_chase" | "smartchase" => Some(EnemyProfile::SmartChase),
        "ambush" => Some(EnemyProfile::Ambush),
        "territorial" => Some(EnemyProfile::Territorial),
        _ => None,
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig::from_toml(toml_cfg)
    }

    /// Strict variant for a known path: errors instead of falling back.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        GameConfig::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(cfg))
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let player_profile = parse_player_profile(&cfg.session.player_profile).unwrap_or_else(|| {
            log::warn!(
                "unknown player_profile {:?}, using expert",
                cfg.session.player_profile
            );
            PlayerProfile::Expert
        });
        // "none" keeps each enemy's own movement
        let enemy_profile = match cfg.session.enemy_profile.trim() {
            "" | "none" => None,
            name => parse_enemy_profile(name).or_else(|| {
                log::warn!("unknown enemy_profile {name:?}, using built-in movement");
                None
            }),
        };

        GameConfig {
            timing: Timing {
                cherry_teleport_ms: cfg.timing.cherry_teleport_ms,
                cactus_toggle_ms: cfg.timing.cactus_toggle_ms,
                campfire_relight_ms: cfg.timing.campfire_relight_ms,
                time_limit_secs: cfg.timing.time_limit_secs,
            },
            session: SessionConfig {
                seed: cfg.session.seed,
                start_level: cfg.session.start_level,
                players: cfg.session.players,
                player_profile,
                enemy_profile,
                tick_ms: cfg.session.tick_ms.max(1),
                max_ticks: cfg.session.max_ticks,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        log::debug!("loaded {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        log::warn!("config.toml parse error: {e}");
                        log::warn!("using default settings");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    log::warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.timing, Timing::default());
        assert_eq!(cfg.timing.cherry_teleport_ms, 20_000);
        assert_eq!(cfg.timing.time_limit_ms(), 180_000);
        assert_eq!(cfg.session, SessionConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[timing]\ncactus_toggle_ms = 5000\n[session]\nplayers = 2\nplayer_profile = \"Fearful\"\n",
        )
        .unwrap();
        assert_eq!(cfg.timing.cactus_toggle_ms, 5_000);
        assert_eq!(cfg.timing.campfire_relight_ms, 10_000);
        assert_eq!(cfg.session.players, 2);
        assert_eq!(cfg.session.player_profile, PlayerProfile::Fearful);
        assert_eq!(cfg.session.seed, 7);
    }

    #[test]
    fn unknown_profile_names_fall_back() {
        let cfg = GameConfig::from_toml_str(
            "[session]\nplayer_profile = \"reckless\"\nenemy_profile = \"smart-chase\"\n",
        )
        .unwrap();
        assert_eq!(cfg.session.player_profile, PlayerProfile::Expert);
        assert_eq!(cfg.session.enemy_profile, Some(EnemyProfile::SmartChase));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            GameConfig::from_toml_str("[timing\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GameConfig::load_from(Path::new("/definitely/not/here/config.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
