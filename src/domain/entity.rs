/// Shared entity capabilities and the player (ice cream).
///
/// Fruits and enemies live in their own modules as closed sum types;
/// the capabilities they share are expressed as two small traits.

use serde::{Deserialize, Serialize};

use super::location::Location;
use super::tile::TileMap;

/// Anything with a mutable grid position.
pub trait Movable {
    fn location(&self) -> Location;
    fn set_location(&mut self, loc: Location);

    /// Step by `dir` if the target is valid. No partial moves.
    fn try_step(&mut self, dir: (i32, i32), map: &TileMap) -> bool {
        let next = self.location().step(dir);
        if map.is_valid_position(next) {
            self.set_location(next);
            true
        } else {
            false
        }
    }
}

/// Can clear an ice cell it is adjacent to (or about to occupy).
pub trait IceBreaker: Movable {
    fn can_break_ice(&self) -> bool {
        true
    }

    fn break_ice_at(&self, map: &mut TileMap, loc: Location) -> bool {
        self.can_break_ice() && map.remove_ice_wall(loc)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Flavor {
    Vanilla,
    Chocolate,
    Strawberry,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub flavor: Flavor,
    pub location: Location,
    /// Last direction requested; ice lines are cast this way.
    pub facing: (i32, i32),
    alive: bool,
}

impl Player {
    pub fn new(flavor: Flavor, location: Location) -> Self {
        Player {
            flavor,
            location,
            facing: (0, 1),
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// One-way. Returns true if this call killed the player.
    pub fn kill(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }
}

impl Movable for Player {
    fn location(&self) -> Location {
        self.location
    }

    fn set_location(&mut self, loc: Location) {
        self.location = loc;
    }
}

impl IceBreaker for Player {}

/// A control decision: a move, or a facing change plus ice toggle.
///
/// `use_ice == false` → move by `(dx, dy)`.
/// `use_ice == true`  → face `(dx, dy)` and create/break an ice line.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Intent {
    pub dx: i32,
    pub dy: i32,
    pub use_ice: bool,
}

impl Intent {
    pub const IDLE: Intent = Intent { dx: 0, dy: 0, use_ice: false };

    pub fn step(dir: (i32, i32)) -> Self {
        Intent { dx: dir.0, dy: dir.1, use_ice: false }
    }

    pub fn ice(dir: (i32, i32)) -> Self {
        Intent { dx: dir.0, dy: dir.1, use_ice: true }
    }

    pub fn dir(&self) -> (i32, i32) {
        (self.dx, self.dy)
    }

    pub fn is_idle(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}
