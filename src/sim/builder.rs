/// Procedural level construction.
///
/// ## Placement order
///
///   1. Grid (+ optional perimeter walls)
///   2. Player spawns (explicit)
///   3. Candidate cells = every valid cell outside the spawn margins
///      (Chebyshev square of `safety_margin` around each spawn)
///   4. Ice walls → fruits (initial set, then each wave) → enemies →
///      hot tiles → campfires, each taking a uniformly random candidate
///
/// Every placed object consumes its cell, so nothing overlaps. The RNG is
/// a `Pcg32` seeded from `seed`: equal builders produce equal levels.
///
/// Reachability is not checked. The only permanent walls are the ones
/// callers put there, and ice can always be broken.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::Timing;
use crate::domain::ai::EnemyProfile;
use crate::domain::enemy::{Enemy, EnemyType};
use crate::domain::entity::{Flavor, Player};
use crate::domain::fruit::{Fruit, FruitType};
use crate::domain::location::Location;
use crate::domain::tile::TileMap;
use crate::error::{BuildError, BuildResult};
use super::level::{Level, MAX_PLAYERS};

pub const DEFAULT_SAFETY_MARGIN: i32 = 2;

#[derive(Clone, Debug)]
pub struct LevelBuilder {
    width: i32,
    height: i32,
    border: bool,
    players: Vec<(Flavor, Location)>,
    ice_walls: usize,
    fruits: Vec<(FruitType, usize)>,
    waves: Vec<Vec<(FruitType, usize)>>,
    enemies: Vec<(EnemyType, usize)>,
    hot_tiles: usize,
    campfires: usize,
    safety_margin: i32,
    seed: u64,
    enemy_profile: Option<EnemyProfile>,
    timing: Timing,
    start_ms: u64,
}

impl LevelBuilder {
    pub fn new(width: i32, height: i32) -> Self {
        LevelBuilder {
            width,
            height,
            border: true,
            players: vec![],
            ice_walls: 0,
            fruits: vec![],
            waves: vec![],
            enemies: vec![],
            hot_tiles: 0,
            campfires: 0,
            safety_margin: DEFAULT_SAFETY_MARGIN,
            seed: 0,
            enemy_profile: None,
            timing: Timing::default(),
            start_ms: 0,
        }
    }

    // ── Fluent setters ──

    pub fn dimensions(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn border(mut self, on: bool) -> Self {
        self.border = on;
        self
    }

    pub fn player(mut self, flavor: Flavor, spawn: Location) -> Self {
        self.players.push((flavor, spawn));
        self
    }

    pub fn ice_walls(mut self, count: usize) -> Self {
        self.ice_walls = count;
        self
    }

    /// Adds to the initial fruit set; repeated calls accumulate.
    pub fn fruits(mut self, fruit_type: FruitType, count: usize) -> Self {
        self.fruits.push((fruit_type, count));
        self
    }

    /// Queue a fruit wave that appears once the previous set is cleared.
    pub fn wave(mut self, group: &[(FruitType, usize)]) -> Self {
        self.waves.push(group.to_vec());
        self
    }

    pub fn enemies(mut self, enemy_type: EnemyType, count: usize) -> Self {
        self.enemies.push((enemy_type, count));
        self
    }

    pub fn hot_tiles(mut self, count: usize) -> Self {
        self.hot_tiles = count;
        self
    }

    pub fn campfires(mut self, count: usize) -> Self {
        self.campfires = count;
        self
    }

    pub fn safety_margin(mut self, margin: i32) -> Self {
        self.safety_margin = margin.max(0);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Drive every enemy with `profile` instead of its own movement.
    pub fn enemy_profile(mut self, profile: Option<EnemyProfile>) -> Self {
        self.enemy_profile = profile;
        self
    }

    pub fn timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn time_limit_secs(mut self, secs: u64) -> Self {
        self.timing.time_limit_secs = secs;
        self
    }

    /// Clock value the level's countdown and fruit timers start from.
    pub fn start_at(mut self, now: u64) -> Self {
        self.start_ms = now;
        self
    }

    // ── Build ──

    pub fn build(&self) -> BuildResult<Level> {
        self.validate()?;

        let mut map = TileMap::new(self.width, self.height);
        if self.border {
            map.add_border();
        }

        let spawns: Vec<Location> = self.players.iter().map(|(_, loc)| *loc).collect();
        for (i, &spawn) in spawns.iter().enumerate() {
            if !map.is_valid_position(spawn) || spawns[..i].contains(&spawn) {
                return Err(BuildError::InvalidSpawn(spawn));
            }
        }

        let mut candidates = self.candidate_cells(&map, &spawns);
        let needed = self.needed_cells();
        if needed > candidates.len() {
            return Err(BuildError::NotEnoughSpace { needed, available: candidates.len() });
        }

        let mut rng = Pcg32::seed_from_u64(self.seed);

        for _ in 0..self.ice_walls {
            map.add_ice_wall(take(&mut rng, &mut candidates));
        }
        let initial = place_fruits(&self.fruits, &mut rng, &mut candidates);
        let waves: Vec<Vec<Fruit>> = self
            .waves
            .iter()
            .map(|group| place_fruits(group, &mut rng, &mut candidates))
            .collect();
        let mut enemies = vec![];
        for &(enemy_type, count) in &self.enemies {
            for _ in 0..count {
                let enemy = Enemy::new(enemy_type, take(&mut rng, &mut candidates));
                enemies.push(match self.enemy_profile {
                    Some(profile) => enemy.with_profile(profile),
                    None => enemy,
                });
            }
        }
        for _ in 0..self.hot_tiles {
            map.add_hot_tile(take(&mut rng, &mut candidates));
        }
        for _ in 0..self.campfires {
            map.add_campfire(take(&mut rng, &mut candidates));
        }

        let mut level = Level::new(map, self.timing, self.seed, self.start_ms);
        for &(flavor, spawn) in &self.players {
            level.add_player(Player::new(flavor, spawn));
        }
        for fruit in initial {
            level.add_fruit(fruit);
        }
        for wave in waves {
            level.add_wave(wave);
        }
        for enemy in enemies {
            level.add_enemy(enemy);
        }

        log::debug!(
            "built {}x{} level (seed {}): {} ice, {} fruits, {} waves, {} enemies, {} free cells left",
            self.width,
            self.height,
            self.seed,
            self.ice_walls,
            level.total,
            level.pending_waves.len(),
            level.enemies.len(),
            candidates.len()
        );
        Ok(level)
    }

    fn validate(&self) -> BuildResult<()> {
        if self.width < 3 || self.height < 3 {
            return Err(BuildError::MapTooSmall { width: self.width, height: self.height });
        }
        if self.players.is_empty() {
            return Err(BuildError::NoPlayers);
        }
        if self.players.len() > MAX_PLAYERS {
            return Err(BuildError::TooManyPlayers(self.players.len()));
        }
        if count_of(&self.fruits) == 0 {
            return Err(BuildError::NoFruits);
        }
        Ok(())
    }

    fn needed_cells(&self) -> usize {
        self.ice_walls
            + count_of(&self.fruits)
            + self.waves.iter().map(|w| count_of(w)).sum::<usize>()
            + self.enemies.iter().map(|(_, n)| n).sum::<usize>()
            + self.hot_tiles
            + self.campfires
    }

    /// Valid cells outside every spawn's safety square, row-major.
    fn candidate_cells(&self, map: &TileMap, spawns: &[Location]) -> Vec<Location> {
        let mut out = vec![];
        for y in 0..self.height {
            for x in 0..self.width {
                let loc = Location::new(x, y);
                if map.is_valid_position(loc)
                    && spawns.iter().all(|s| s.chebyshev_distance_to(loc) > self.safety_margin)
                {
                    out.push(loc);
                }
            }
        }
        out
    }
}

fn count_of(group: &[(FruitType, usize)]) -> usize {
    group.iter().map(|(_, n)| n).sum()
}

/// Remove and return a uniformly random candidate.
fn take(rng: &mut Pcg32, candidates: &mut Vec<Location>) -> Location {
    let i = rng.random_range(0..candidates.len());
    candidates.swap_remove(i)
}

fn place_fruits(group: &[(FruitType, usize)], rng: &mut Pcg32, candidates: &mut Vec<Location>) -> Vec<Fruit> {
    let mut out = vec![];
    for &(fruit_type, count) in group {
        for _ in 0..count {
            out.push(Fruit::new(fruit_type, take(rng, candidates)));
        }
    }
    out
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
