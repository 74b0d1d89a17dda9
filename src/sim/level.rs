/// Level: the complete state of one running level.
///
/// ## Ownership
///
///   - `map` owns terrain (walls, ice) and the obstacle overlays.
///   - `players`, `fruits`, `enemies` are plain vectors; indices are
///     stable for the level's lifetime (fruits are replaced wholesale
///     when a wave activates).
///   - `pending_waves` holds fruit groups not yet on the board.
///
/// ## Clock
///
/// All time values are caller-supplied milliseconds. `now` is the latest
/// value seen through `tick` / `advance_clock`; commands that need a
/// timestamp (extinguishing a fire, pausing) use it.
///
/// A level is terminal once `completed` or `game_over` is set. Restart
/// means building a new level.
///
/// Commands live in `step.rs`, read-only queries in `query.rs`.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::Timing;
use crate::domain::enemy::Enemy;
use crate::domain::entity::Player;
use crate::domain::fruit::Fruit;
use crate::domain::tile::TileMap;
use super::event::GameEvent;
use super::timer::Countdown;

pub const MAX_PLAYERS: usize = 2;

pub struct Level {
    pub(crate) map: TileMap,
    pub(crate) players: Vec<Player>,
    pub(crate) fruits: Vec<Fruit>,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) pending_waves: VecDeque<Vec<Fruit>>,
    /// 0 = the initial fruit set.
    pub(crate) wave: usize,
    pub(crate) score: u32,
    pub(crate) collected: usize,
    pub(crate) total: usize,
    pub(crate) completed: bool,
    pub(crate) game_over: bool,
    pub(crate) timer: Countdown,
    pub(crate) timing: Timing,
    pub(crate) now: u64,
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl Level {
    /// Empty level on `map`. The countdown starts at `now`.
    pub fn new(map: TileMap, timing: Timing, seed: u64, now: u64) -> Self {
        Level {
            map,
            players: Vec::new(),
            fruits: Vec::new(),
            enemies: Vec::new(),
            pending_waves: VecDeque::new(),
            wave: 0,
            score: 0,
            collected: 0,
            total: 0,
            completed: false,
            game_over: false,
            timer: Countdown::new(timing.time_limit_ms(), now),
            timing,
            now,
            seed,
            // offset keeps runtime draws apart from the builder's placement stream
            rng: Pcg32::seed_from_u64(seed.wrapping_add(1)),
            events: Vec::new(),
        }
    }

    // ── Population (used by builder / layout) ──

    /// Returns false once two players are present.
    pub fn add_player(&mut self, player: Player) -> bool {
        if self.players.len() >= MAX_PLAYERS {
            return false;
        }
        self.players.push(player);
        true
    }

    /// Fruits join the active wave and start their timers now.
    pub fn add_fruit(&mut self, mut fruit: Fruit) {
        fruit.attach(self.now);
        self.fruits.push(fruit);
        self.total += 1;
    }

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    /// Queue a fruit group behind the current one.
    pub fn add_wave(&mut self, fruits: Vec<Fruit>) {
        if !fruits.is_empty() {
            self.pending_waves.push_back(fruits);
        }
    }

    // ── Waves ──

    /// Replace the board's fruits with the next queued group.
    /// Returns false when no wave is left.
    pub(crate) fn activate_next_wave(&mut self) -> bool {
        let Some(next) = self.pending_waves.pop_front() else { return false };
        self.fruits.clear();
        self.collected = 0;
        self.total = 0;
        for fruit in next {
            self.add_fruit(fruit);
        }
        self.wave += 1;
        log::debug!("wave {} started with {} fruits", self.wave, self.total);
        self.events.push(GameEvent::WaveStarted { wave: self.wave, fruits: self.total });
        true
    }

    /// Fast-forward to `wave` without scoring (snapshot restore).
    pub(crate) fn skip_to_wave(&mut self, wave: usize) -> bool {
        while self.wave < wave {
            if !self.activate_next_wave() {
                return false;
            }
        }
        self.events.clear();
        self.wave == wave
    }

    // ── Terminal state ──

    pub fn is_terminal(&self) -> bool {
        self.completed || self.game_over
    }

    /// Record the clock. Never moves backwards.
    pub fn advance_clock(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    /// Drain pending events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
