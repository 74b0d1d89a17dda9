/// Hand-authored levels from character grids.
///
/// ## Tile legend:
///   '#' = Wall               '*' = Ice
///   '1' = Player 1 spawn     '2' = Player 2 spawn
///   'B' = Banana             'G' = Grapes
///   'C' = Cherry             'N' = Pineapple
///   'X' = Cactus             '^' = Hot tile
///   'F' = Campfire (lit)
///   'T' = Troll              'M' = Maceta
///   'K' = Calamar Naranja    'W' = Narval
///   '.' / ' ' = Empty
///
/// Rows must all have the same width. Player 1 gets Vanilla, player 2
/// Chocolate. Entities stand on empty cells. Unlike the builder, a layout
/// gets no border walls added for it.

use crate::config::Timing;
use crate::domain::enemy::{Enemy, EnemyType};
use crate::domain::entity::{Flavor, Player};
use crate::domain::fruit::{Fruit, FruitType};
use crate::domain::location::Location;
use crate::domain::tile::TileMap;
use crate::error::{BuildError, BuildResult};
use super::level::Level;

/// Build a level from `rows`. The clock starts at 0.
pub fn parse_layout(rows: &[&str], timing: Timing, seed: u64) -> BuildResult<Level> {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.chars().count());
    if width < 3 || height < 3 {
        return Err(BuildError::MapTooSmall { width: width as i32, height: height as i32 });
    }

    let mut map = TileMap::new(width as i32, height as i32);
    let mut spawns: [Option<Location>; 2] = [None, None];
    let mut fruits = vec![];
    let mut enemies = vec![];

    for (y, row) in rows.iter().enumerate() {
        if row.chars().count() != width {
            return Err(BuildError::Layout {
                row: y,
                reason: format!("width {} differs from first row width {width}", row.chars().count()),
            });
        }
        for (x, ch) in row.chars().enumerate() {
            let loc = Location::new(x as i32, y as i32);
            match ch {
                '#' => map.add_wall(loc),
                '*' => map.add_ice_wall(loc),
                '^' => map.add_hot_tile(loc),
                'F' => map.add_campfire(loc),
                '1' | '2' => {
                    let slot = if ch == '1' { 0 } else { 1 };
                    if spawns[slot].replace(loc).is_some() {
                        return Err(BuildError::Layout { row: y, reason: format!("duplicate player '{ch}'") });
                    }
                }
                'B' => fruits.push(Fruit::new(FruitType::Banana, loc)),
                'G' => fruits.push(Fruit::new(FruitType::Grapes, loc)),
                'C' => fruits.push(Fruit::new(FruitType::Cherry, loc)),
                'N' => fruits.push(Fruit::new(FruitType::Pineapple, loc)),
                'X' => fruits.push(Fruit::new(FruitType::Cactus, loc)),
                'T' => enemies.push(Enemy::new(EnemyType::Troll, loc)),
                'M' => enemies.push(Enemy::new(EnemyType::Maceta, loc)),
                'K' => enemies.push(Enemy::new(EnemyType::CalamarNaranja, loc)),
                'W' => enemies.push(Enemy::new(EnemyType::Narval, loc)),
                '.' | ' ' => {}
                other => {
                    return Err(BuildError::Layout { row: y, reason: format!("unknown tile '{other}'") });
                }
            }
        }
    }

    let players: Vec<Player> = match spawns {
        [Some(a), Some(b)] => vec![Player::new(Flavor::Vanilla, a), Player::new(Flavor::Chocolate, b)],
        [Some(a), None] => vec![Player::new(Flavor::Vanilla, a)],
        [None, Some(_)] => {
            return Err(BuildError::Layout { row: 0, reason: "player '2' without player '1'".into() });
        }
        [None, None] => return Err(BuildError::NoPlayers),
    };
    if fruits.is_empty() {
        return Err(BuildError::NoFruits);
    }

    let mut level = Level::new(map, timing, seed, 0);
    for p in players {
        level.add_player(p);
    }
    for f in fruits {
        level.add_fruit(f);
    }
    for e in enemies {
        level.add_enemy(e);
    }
    log::debug!(
        "layout {width}x{height}: {} players, {} fruits, {} enemies",
        level.players.len(),
        level.fruits.len(),
        level.enemies.len()
    );
    Ok(level)
}
