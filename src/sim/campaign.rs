/// Campaign presets: five procedurally built levels of rising difficulty.
///
/// ## Level table
///
///   lvl  size    ice  initial fruits          waves                      enemies                         hot  fire
///   1    13x11    8   Banana 6                -                          Troll                            0    0
///   2    15x13   14   Banana 4, Grapes 4      [Grapes 4]                 Troll, Maceta                    0    0
///   3    17x13   20   Grapes 4, Cherry 3      [Banana 5]                 Troll, Maceta, Calamar           3    0
///   4    17x15   26   Pineapple 3, Cherry 3   [Grapes 4, Cactus 1]       Maceta x2, Calamar, Narval       4    2
///   5    19x15   32   Cactus 2, Pineapple 4   [Cherry 4] [Banana 6]      Troll x2, Calamar, Narval x2     5    3
///
/// Perimeter walls are always on. Player 1 (Vanilla) spawns at (2, 2),
/// player 2 (Chocolate) at the opposite corner (w-3, h-3).

use crate::config::Timing;
use crate::domain::enemy::EnemyType;
use crate::domain::entity::Flavor;
use crate::domain::fruit::FruitType;
use crate::domain::location::Location;
use crate::error::{BuildError, BuildResult};
use super::builder::LevelBuilder;
use super::level::{Level, MAX_PLAYERS};

use EnemyType::*;
use FruitType::*;

pub const LEVEL_COUNT: usize = 5;

type Group = &'static [(FruitType, usize)];

struct Preset {
    width: i32,
    height: i32,
    ice: usize,
    fruits: Group,
    waves: &'static [Group],
    enemies: &'static [(EnemyType, usize)],
    hot_tiles: usize,
    campfires: usize,
}

const PRESETS: [Preset; LEVEL_COUNT] = [
    Preset {
        width: 13,
        height: 11,
        ice: 8,
        fruits: &[(Banana, 6)],
        waves: &[],
        enemies: &[(Troll, 1)],
        hot_tiles: 0,
        campfires: 0,
    },
    Preset {
        width: 15,
        height: 13,
        ice: 14,
        fruits: &[(Banana, 4), (Grapes, 4)],
        waves: &[&[(Grapes, 4)]],
        enemies: &[(Troll, 1), (Maceta, 1)],
        hot_tiles: 0,
        campfires: 0,
    },
    Preset {
        width: 17,
        height: 13,
        ice: 20,
        fruits: &[(Grapes, 4), (Cherry, 3)],
        waves: &[&[(Banana, 5)]],
        enemies: &[(Troll, 1), (Maceta, 1), (CalamarNaranja, 1)],
        hot_tiles: 3,
        campfires: 0,
    },
    Preset {
        width: 17,
        height: 15,
        ice: 26,
        fruits: &[(Pineapple, 3), (Cherry, 3)],
        waves: &[&[(Grapes, 4), (Cactus, 1)]],
        enemies: &[(Maceta, 2), (CalamarNaranja, 1), (Narval, 1)],
        hot_tiles: 4,
        campfires: 2,
    },
    Preset {
        width: 19,
        height: 15,
        ice: 32,
        fruits: &[(Cactus, 2), (Pineapple, 4)],
        waves: &[&[(Cherry, 4)], &[(Banana, 6)]],
        enemies: &[(Troll, 2), (CalamarNaranja, 1), (Narval, 2)],
        hot_tiles: 5,
        campfires: 3,
    },
];

/// Builder preloaded with campaign `level` (1-based) for `players`
/// players. Callers may adjust timing or enemy profiles before building.
pub fn builder(level: usize, players: usize, seed: u64) -> BuildResult<LevelBuilder> {
    let preset = level
        .checked_sub(1)
        .and_then(|i| PRESETS.get(i))
        .ok_or(BuildError::UnknownLevel { level, max: LEVEL_COUNT })?;
    if players == 0 {
        return Err(BuildError::NoPlayers);
    }
    if players > MAX_PLAYERS {
        return Err(BuildError::TooManyPlayers(players));
    }

    let (w, h) = (preset.width, preset.height);
    let mut b = LevelBuilder::new(w, h)
        .border(true)
        .seed(seed)
        .player(Flavor::Vanilla, Location::new(2, 2))
        .ice_walls(preset.ice)
        .hot_tiles(preset.hot_tiles)
        .campfires(preset.campfires);
    if players == 2 {
        b = b.player(Flavor::Chocolate, Location::new(w - 3, h - 3));
    }
    for &(fruit, n) in preset.fruits {
        b = b.fruits(fruit, n);
    }
    for wave in preset.waves {
        b = b.wave(wave);
    }
    for &(enemy, n) in preset.enemies {
        b = b.enemies(enemy, n);
    }
    Ok(b)
}

pub fn configure(level: usize, players: usize, seed: u64) -> BuildResult<Level> {
    builder(level, players, seed)?.build()
}

pub fn configure_with(level: usize, players: usize, seed: u64, timing: Timing) -> BuildResult<Level> {
    builder(level, players, seed)?.timing(timing).build()
}

/// Seed for campaign `level` derived from a session seed.
pub fn level_seed(seed: u64, level: usize) -> u64 {
    seed ^ (level as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
