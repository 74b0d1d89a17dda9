/// GameSession: campaign progression around the active level.
///
/// ## Lifecycle
///
///   new ─→ level 1 (or `start_level`) active
///            │ level completed
///            ▼
///        advance_level ─→ next level, level score banked and recorded
///            │ after the last level
///            ▼
///        won, no active level
///
/// `restart_level` rebuilds the current level (its score is lost),
/// `reset_game` returns to the start level with a zero total and no
/// recorded levels. Only the active level is kept in full; completed
/// levels survive as their banked scores (`level_scores`).
///
/// Each campaign level gets its own seed derived from the session seed,
/// so a session replays identically for the same inputs.

use crate::config::{GameConfig, Timing};
use crate::domain::ai::{EnemyProfile, PlayerProfile};
use crate::domain::entity::Intent;
use crate::error::{BuildResult, SessionError};
use super::campaign::{self, LEVEL_COUNT};
use super::event::GameEvent;
use super::level::Level;
use super::save::{self, SessionSnapshot};

pub struct GameSession {
    level: Option<Level>,
    /// 1-based.
    level_index: usize,
    start_level: usize,
    total_score: u32,
    /// Banked score of each completed level, in play order.
    level_scores: Vec<u32>,
    won: bool,
    players: usize,
    seed: u64,
    timing: Timing,
    enemy_profile: Option<EnemyProfile>,
}

impl GameSession {
    pub fn new(players: usize, seed: u64, now: u64) -> Result<Self, SessionError> {
        Self::with_timing(players, seed, Timing::default(), 1, now)
    }

    pub fn with_timing(
        players: usize,
        seed: u64,
        timing: Timing,
        start_level: usize,
        now: u64,
    ) -> Result<Self, SessionError> {
        Self::start(players, seed, timing, start_level, None, now)
    }

    /// Session from a loaded `config.toml`.
    pub fn from_config(config: &GameConfig, now: u64) -> Result<Self, SessionError> {
        let s = &config.session;
        Self::start(s.players, s.seed, config.timing, s.start_level, s.enemy_profile, now)
    }

    fn start(
        players: usize,
        seed: u64,
        timing: Timing,
        start_level: usize,
        enemy_profile: Option<EnemyProfile>,
        now: u64,
    ) -> Result<Self, SessionError> {
        let mut session = GameSession {
            level: None,
            level_index: start_level,
            start_level,
            total_score: 0,
            level_scores: Vec::new(),
            won: false,
            players,
            seed,
            timing,
            enemy_profile,
        };
        session.level = Some(session.build_level(start_level, players, seed, now)?);
        log::info!("session started at level {start_level} ({players} players, seed {seed})");
        Ok(session)
    }

    pub(crate) fn build_level(&self, index: usize, players: usize, seed: u64, now: u64) -> BuildResult<Level> {
        campaign::builder(index, players, campaign::level_seed(seed, index))?
            .timing(self.timing)
            .enemy_profile(self.enemy_profile)
            .start_at(now)
            .build()
    }

    /// Adopt a restored level and the snapshot's campaign position.
    pub(crate) fn install(&mut self, snap: &SessionSnapshot, level: Level) {
        self.level = Some(level);
        self.level_index = snap.level_index;
        self.players = snap.player_count;
        self.seed = snap.seed;
        self.total_score = snap.total_score;
        self.level_scores = snap.level_scores.clone();
        self.won = false;
    }

    // ── Queries ──

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn level_mut(&mut self) -> Result<&mut Level, SessionError> {
        self.level.as_mut().ok_or(SessionError::NoActiveLevel)
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        LEVEL_COUNT
    }

    pub fn player_count(&self) -> usize {
        self.players
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Score banked from completed levels.
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    /// Scores of the completed levels, oldest first.
    pub fn level_scores(&self) -> &[u32] {
        &self.level_scores
    }

    /// Banked score plus the active level's score.
    pub fn combined_score(&self) -> u32 {
        self.total_score + self.level.as_ref().map_or(0, |l| l.score())
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    // ── Progression ──

    /// Bank the completed level and move on. Returns false if the active
    /// level is not completed yet.
    pub fn advance_level(&mut self, now: u64) -> Result<bool, SessionError> {
        let level = self.level.as_ref().ok_or(SessionError::NoActiveLevel)?;
        if !level.is_completed() {
            return Ok(false);
        }
        let banked = level.score();

        if self.level_index >= LEVEL_COUNT {
            self.total_score += banked;
            self.level_scores.push(banked);
            self.level = None;
            self.won = true;
            log::info!("campaign won with {} points", self.total_score);
            return Ok(true);
        }

        let next = self.build_level(self.level_index + 1, self.players, self.seed, now)?;
        self.total_score += banked;
        self.level_scores.push(banked);
        self.level_index += 1;
        self.level = Some(next);
        log::info!("advanced to level {} (total {})", self.level_index, self.total_score);
        Ok(true)
    }

    pub fn restart_level(&mut self, now: u64) -> Result<(), SessionError> {
        if self.level.is_none() {
            return Err(SessionError::NoActiveLevel);
        }
        self.level = Some(self.build_level(self.level_index, self.players, self.seed, now)?);
        log::debug!("restarted level {}", self.level_index);
        Ok(())
    }

    pub fn reset_game(&mut self, now: u64) -> Result<(), SessionError> {
        let level = self.build_level(self.start_level, self.players, self.seed, now)?;
        self.level = Some(level);
        self.level_index = self.start_level;
        self.total_score = 0;
        self.level_scores.clear();
        self.won = false;
        log::info!("session reset to level {}", self.start_level);
        Ok(())
    }

    // ── Forwarded commands ──

    /// Tick the active level. No level, no events.
    pub fn tick(&mut self, now: u64) -> Vec<GameEvent> {
        self.level.as_mut().map_or_else(Vec::new, |l| l.tick(now))
    }

    pub fn move_player1(&mut self, dx: i32, dy: i32) -> bool {
        self.level.as_mut().is_some_and(|l| l.move_player1(dx, dy))
    }

    pub fn move_player2(&mut self, dx: i32, dy: i32) -> bool {
        self.level.as_mut().is_some_and(|l| l.move_player2(dx, dy))
    }

    pub fn create_ice_line(&mut self, idx: usize, dx: i32, dy: i32) -> usize {
        self.level.as_mut().map_or(0, |l| l.create_ice_line(idx, dx, dy))
    }

    pub fn break_ice_line(&mut self, idx: usize, dx: i32, dy: i32) -> usize {
        self.level.as_mut().map_or(0, |l| l.break_ice_line(idx, dx, dy))
    }

    pub fn ice_action(&mut self, idx: usize) -> usize {
        self.level.as_mut().map_or(0, |l| l.ice_action(idx))
    }

    pub fn apply_intent(&mut self, idx: usize, intent: Intent) -> bool {
        self.level.as_mut().is_some_and(|l| l.apply_intent(idx, intent))
    }

    pub fn autopilot(&mut self, idx: usize, profile: PlayerProfile) -> bool {
        self.level.as_mut().is_some_and(|l| l.autopilot(idx, profile))
    }

    pub fn pause(&mut self, now: u64) -> bool {
        self.level.as_mut().is_some_and(|l| {
            l.advance_clock(now);
            l.pause()
        })
    }

    pub fn resume(&mut self, now: u64) -> bool {
        self.level.as_mut().is_some_and(|l| {
            l.advance_clock(now);
            l.resume()
        })
    }

    pub fn is_paused(&self) -> bool {
        self.level.as_ref().is_some_and(|l| l.is_paused())
    }

    // ── Persistence ──

    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        save::capture(self)
    }

    /// Replace the session state with `snap`, rebuilt at clock `now`.
    /// On error the session is unchanged.
    pub fn restore(&mut self, snap: &SessionSnapshot, now: u64) -> Result<(), SessionError> {
        save::restore(self, snap, now)
    }
}
