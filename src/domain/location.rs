/// Grid coordinates.
///
/// `Location` is an immutable value: every "move" produces a new one.
/// Coordinates are signed so that offsets past the map edge stay
/// representable; bounds checks belong to `TileMap`.

use serde::{Deserialize, Serialize};

/// Unit cardinal vectors in scan order: up, down, left, right.
pub const CARDINALS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Location { x, y }
    }

    /// New location shifted by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Location {
        Location { x: self.x + dx, y: self.y + dy }
    }

    /// Shift by a direction vector.
    #[inline]
    pub fn step(self, dir: (i32, i32)) -> Location {
        self.offset(dir.0, dir.1)
    }

    pub fn distance_to(self, other: Location) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn manhattan_distance_to(self, other: Location) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Exactly one axis differs, and by exactly one cell.
    pub fn is_adjacent(self, other: Location) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        (dx == 1 && dy == 0) || (dx == 0 && dy == 1)
    }

    /// Chebyshev distance (square radius), used for spawn margins.
    pub fn chebyshev_distance_to(self, other: Location) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Unit step toward `other`, one component per axis (may be diagonal).
    pub fn signum_toward(self, other: Location) -> (i32, i32) {
        ((other.x - self.x).signum(), (other.y - self.y).signum())
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Is `(dx, dy)` one of the four unit cardinal vectors?
#[inline]
pub fn is_cardinal(dir: (i32, i32)) -> bool {
    matches!(dir, (0, -1) | (0, 1) | (-1, 0) | (1, 0))
}

/// The two vectors perpendicular to `dir`.
pub fn perpendiculars(dir: (i32, i32)) -> [(i32, i32); 2] {
    if dir.0 != 0 {
        [(0, -1), (0, 1)]
    } else {
        [(-1, 0), (1, 0)]
    }
}
