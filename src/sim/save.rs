/// Session snapshots: capture and restore of a running campaign.
///
/// ## What is stored
///
///   Campaign position (level index, seed, player count, total score,
///   scores of completed levels) plus the dynamic state of the active level: level score, collected
///   counter, remaining time, wave index, players, fruits, enemies and
///   the ice layout.
///
/// ## Restore
///
///   The level is rebuilt from its campaign preset and seed, fast-forwarded
///   to the stored wave, and the stored records are written over it:
///
///   - players   → by index (position, facing, alive)
///   - fruits    → by name + location, falling back to the first unmatched
///                 fruit of the same name (fruits that moved)
///   - enemies   → by type, in order
///   - ice       → replaces the map's ice wholesale
///
///   Walls, hot tiles and campfires come from the preset. Fruit and enemy
///   timers restart at the restore clock. Anything that does not line up
///   with the rebuilt level is a `SnapshotMismatch`; the session is left
///   untouched in that case.

use serde::{Deserialize, Serialize};

use crate::domain::enemy::EnemyType;
use crate::domain::location::Location;
use crate::error::SessionError;
use super::level::Level;
use super::session::GameSession;
use super::timer::Countdown;

// ══════════════════════════════════════════════════════════════
// Public types
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// 1-based campaign level.
    pub level_index: usize,
    pub total_score: u32,
    /// Banked score per completed level; empty in older snapshots.
    #[serde(default)]
    pub level_scores: Vec<u32>,
    pub level_score: u32,
    pub collected: usize,
    pub remaining_ms: u64,
    pub wave: usize,
    pub seed: u64,
    pub player_count: usize,
    pub players: Vec<PlayerRecord>,
    pub fruits: Vec<FruitRecord>,
    pub enemies: Vec<EnemyRecord>,
    pub ice: Vec<Location>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub location: Location,
    pub facing: (i32, i32),
    pub alive: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FruitRecord {
    pub name: String,
    pub location: Location,
    pub collected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyRecord {
    pub enemy_type: EnemyType,
    pub location: Location,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(text)?)
    }
}

// ══════════════════════════════════════════════════════════════
// Capture
// ══════════════════════════════════════════════════════════════

pub fn capture(session: &GameSession) -> Result<SessionSnapshot, SessionError> {
    let level = session.level().ok_or(SessionError::NoActiveLevel)?;
    Ok(SessionSnapshot {
        level_index: session.level_index(),
        total_score: session.total_score(),
        level_scores: session.level_scores().to_vec(),
        level_score: level.score,
        collected: level.collected,
        remaining_ms: level.remaining_ms(),
        wave: level.wave,
        seed: session.seed(),
        player_count: level.players.len(),
        players: level
            .players
            .iter()
            .map(|p| PlayerRecord { location: p.location, facing: p.facing, alive: p.is_alive() })
            .collect(),
        fruits: level
            .fruits
            .iter()
            .map(|f| FruitRecord { name: f.name.clone(), location: f.location, collected: f.is_collected() })
            .collect(),
        enemies: level
            .enemies
            .iter()
            .map(|e| EnemyRecord { enemy_type: e.enemy_type(), location: e.location })
            .collect(),
        ice: level.map.ice_walls(),
    })
}

// ══════════════════════════════════════════════════════════════
// Restore
// ══════════════════════════════════════════════════════════════

/// Rebuild the snapshot's level at clock `now` and install it.
pub fn restore(session: &mut GameSession, snap: &SessionSnapshot, now: u64) -> Result<(), SessionError> {
    let mut level = session.build_level(snap.level_index, snap.player_count, snap.seed, now)?;

    if !level.skip_to_wave(snap.wave) {
        return Err(mismatch(format!("level {} has no wave {}", snap.level_index, snap.wave)));
    }
    apply_players(&mut level, snap)?;
    apply_fruits(&mut level, snap)?;
    apply_enemies(&mut level, snap)?;
    apply_ice(&mut level, snap)?;

    if snap.collected > level.total {
        return Err(mismatch(format!("{} collected of {} fruits", snap.collected, level.total)));
    }
    level.score = snap.level_score;
    level.collected = snap.collected;
    level.timer = Countdown::resumed(level.timing.time_limit_ms(), snap.remaining_ms, now);

    log::debug!(
        "restored level {} wave {} ({} ms left, score {})",
        snap.level_index,
        snap.wave,
        snap.remaining_ms,
        snap.level_score
    );
    session.install(snap, level);
    Ok(())
}

fn mismatch(reason: String) -> SessionError {
    SessionError::SnapshotMismatch(reason)
}

fn apply_players(level: &mut Level, snap: &SessionSnapshot) -> Result<(), SessionError> {
    if snap.players.len() != level.players.len() {
        return Err(mismatch(format!(
            "{} player records for {} players",
            snap.players.len(),
            level.players.len()
        )));
    }
    for (player, rec) in level.players.iter_mut().zip(&snap.players) {
        player.location = rec.location;
        player.facing = rec.facing;
        if !rec.alive {
            player.kill();
        }
    }
    Ok(())
}

fn apply_fruits(level: &mut Level, snap: &SessionSnapshot) -> Result<(), SessionError> {
    if snap.fruits.len() != level.fruits.len() {
        return Err(mismatch(format!(
            "{} fruit records for {} fruits",
            snap.fruits.len(),
            level.fruits.len()
        )));
    }
    let mut matched = vec![false; level.fruits.len()];
    // exact name + location matches are claimed before moved fruits
    let mut pending = vec![];
    for rec in &snap.fruits {
        let exact = (0..level.fruits.len())
            .find(|&i| !matched[i] && level.fruits[i].name == rec.name && level.fruits[i].location == rec.location);
        match exact {
            Some(i) => {
                matched[i] = true;
                if rec.collected {
                    level.fruits[i].mark_collected();
                }
            }
            None => pending.push(rec),
        }
    }
    for rec in pending {
        let Some(i) = (0..level.fruits.len()).find(|&i| !matched[i] && level.fruits[i].name == rec.name) else {
            return Err(mismatch(format!("no {} fruit for record at {}", rec.name, rec.location)));
        };
        matched[i] = true;
        level.fruits[i].location = rec.location;
        if rec.collected {
            level.fruits[i].mark_collected();
        }
    }
    Ok(())
}

fn apply_enemies(level: &mut Level, snap: &SessionSnapshot) -> Result<(), SessionError> {
    if snap.enemies.len() != level.enemies.len() {
        return Err(mismatch(format!(
            "{} enemy records for {} enemies",
            snap.enemies.len(),
            level.enemies.len()
        )));
    }
    let mut matched = vec![false; level.enemies.len()];
    for rec in &snap.enemies {
        let Some(i) = (0..level.enemies.len())
            .find(|&i| !matched[i] && level.enemies[i].enemy_type() == rec.enemy_type)
        else {
            return Err(mismatch(format!("no {:?} enemy for record at {}", rec.enemy_type, rec.location)));
        };
        matched[i] = true;
        level.enemies[i].location = rec.location;
    }
    Ok(())
}

fn apply_ice(level: &mut Level, snap: &SessionSnapshot) -> Result<(), SessionError> {
    for loc in level.map.ice_walls() {
        level.map.remove_ice_wall(loc);
    }
    for &loc in &snap.ice {
        if !level.map.in_bounds(loc) || level.map.has_wall(loc) {
            return Err(mismatch(format!("ice cell {loc} is not free terrain")));
        }
        level.map.add_ice_wall(loc);
    }
    Ok(())
}
