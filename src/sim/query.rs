/// Read-only queries over a level.
///
/// Entity state leaves the level as small owned view structs; nothing
/// here hands out mutable access.

use serde::Serialize;

use crate::config::Timing;
use crate::domain::ai::AiView;
use crate::domain::enemy::{EnemyType, NarvalState};
use crate::domain::entity::Flavor;
use crate::domain::fruit::FruitType;
use crate::domain::location::Location;
use crate::domain::tile::{Cell, TileMap};
use super::level::Level;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerView {
    pub index: usize,
    pub flavor: Flavor,
    pub location: Location,
    pub facing: (i32, i32),
    pub alive: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FruitView {
    pub name: String,
    pub fruit_type: FruitType,
    pub location: Location,
    pub points: u32,
    pub collected: bool,
    pub spikes: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnemyView {
    pub name: String,
    pub enemy_type: EnemyType,
    pub location: Location,
    pub direction: (i32, i32),
    pub narval_state: Option<NarvalState>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CampfireView {
    pub location: Location,
    pub lit: bool,
    pub relight_in_ms: u64,
}

impl Level {
    // ── Map ──

    pub fn width(&self) -> i32 {
        self.map.width()
    }

    pub fn height(&self) -> i32 {
        self.map.height()
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn cells(&self) -> Vec<Vec<Cell>> {
        self.map.cells()
    }

    pub fn ice_cells(&self) -> Vec<Location> {
        self.map.ice_walls()
    }

    pub fn hot_tiles(&self) -> &[Location] {
        self.map.hot_tiles()
    }

    pub fn campfires(&self) -> Vec<CampfireView> {
        self.map
            .campfires()
            .iter()
            .map(|c| CampfireView {
                location: c.location,
                lit: c.lit,
                relight_in_ms: c.relight_remaining_ms(self.now, self.timing.campfire_relight_ms),
            })
            .collect()
    }

    // ── Entities ──

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, idx: usize) -> Option<PlayerView> {
        self.players.get(idx).map(|p| PlayerView {
            index: idx,
            flavor: p.flavor,
            location: p.location,
            facing: p.facing,
            alive: p.is_alive(),
        })
    }

    pub fn players(&self) -> Vec<PlayerView> {
        (0..self.players.len()).filter_map(|i| self.player(i)).collect()
    }

    pub fn fruits(&self) -> Vec<FruitView> {
        self.fruits
            .iter()
            .map(|f| FruitView {
                name: f.name.clone(),
                fruit_type: f.fruit_type(),
                location: f.location,
                points: f.points,
                collected: f.is_collected(),
                spikes: f.has_spikes(),
            })
            .collect()
    }

    pub fn enemies(&self) -> Vec<EnemyView> {
        self.enemies
            .iter()
            .map(|e| EnemyView {
                name: e.name.clone(),
                enemy_type: e.enemy_type(),
                location: e.location,
                direction: e.direction,
                narval_state: e.narval_state(),
            })
            .collect()
    }

    pub(crate) fn live_player_locations(&self) -> Vec<Location> {
        self.players.iter().filter(|p| p.is_alive()).map(|p| p.location).collect()
    }

    /// Snapshot handed to AI decision functions.
    pub fn ai_view(&self) -> AiView<'_> {
        AiView {
            map: &self.map,
            players: &self.players,
            enemies: &self.enemies,
            fruits: &self.fruits,
        }
    }

    // ── Progress ──

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn collected_count(&self) -> usize {
        self.collected
    }

    pub fn total_count(&self) -> usize {
        self.total
    }

    /// 0 for the initial fruit set.
    pub fn wave_index(&self) -> usize {
        self.wave
    }

    pub fn waves_remaining(&self) -> usize {
        self.pending_waves.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    // ── Clock ──

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn is_paused(&self) -> bool {
        self.timer.is_paused()
    }

    pub fn remaining_ms(&self) -> u64 {
        self.timer.remaining_ms(self.now)
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.timer.remaining_seconds(self.now)
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
