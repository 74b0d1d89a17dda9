/// Cell states and the tile map.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here.
///
/// The grid stores plain `Cell` values. Ice is a cell state, not an
/// object; `IceWall` is only a view built on demand.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::location::Location;
use super::obstacle::Campfire;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Wall, // Solid, indestructible
    Ice,  // Solid, breakable
}

impl Cell {
    /// Does this cell stop movement?
    pub fn is_solid(self) -> bool {
        matches!(self, Cell::Wall | Cell::Ice)
    }

    /// Can an ice breaker clear this cell?
    pub fn is_breakable(self) -> bool {
        matches!(self, Cell::Ice)
    }

    pub fn is_passable(self) -> bool {
        !self.is_solid()
    }
}

/// Ice at a location, materialized from the grid on query.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct IceWall {
    pub location: Location,
}

#[derive(Clone, Debug)]
pub struct TileMap {
    width: i32,
    height: i32,
    cells: Vec<Vec<Cell>>,
    hot_tiles: Vec<Location>,
    campfires: Vec<Campfire>,
}

// ── Construction / dimensions ──

impl TileMap {
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        TileMap {
            width: w,
            height: h,
            cells: vec![vec![Cell::Empty; w as usize]; h as usize],
            hot_tiles: vec![],
            campfires: vec![],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, loc: Location) -> bool {
        loc.x >= 0 && loc.y >= 0 && loc.x < self.width && loc.y < self.height
    }

    /// Ring the map with solid walls.
    pub fn add_border(&mut self) {
        for x in 0..self.width {
            self.add_wall(Location::new(x, 0));
            self.add_wall(Location::new(x, self.height - 1));
        }
        for y in 0..self.height {
            self.add_wall(Location::new(0, y));
            self.add_wall(Location::new(self.width - 1, y));
        }
    }
}

// ── Cell query / mutation API ──

impl TileMap {
    /// Cell state, `None` outside the grid.
    #[inline]
    pub fn cell_at(&self, loc: Location) -> Option<Cell> {
        if self.in_bounds(loc) {
            Some(self.cells[loc.y as usize][loc.x as usize])
        } else {
            None
        }
    }

    /// In bounds and empty.
    #[inline]
    pub fn is_valid_position(&self, loc: Location) -> bool {
        self.cell_at(loc) == Some(Cell::Empty)
    }

    #[inline]
    fn set_cell(&mut self, loc: Location, cell: Cell) {
        if self.in_bounds(loc) {
            self.cells[loc.y as usize][loc.x as usize] = cell;
        }
    }

    pub fn add_wall(&mut self, loc: Location) {
        self.set_cell(loc, Cell::Wall);
    }

    /// Turns an empty cell into ice. Walls are never overwritten.
    pub fn add_ice_wall(&mut self, loc: Location) {
        if self.cell_at(loc) == Some(Cell::Empty) {
            self.set_cell(loc, Cell::Ice);
        }
    }

    /// Clears ice. Returns whether there was ice to clear.
    pub fn remove_ice_wall(&mut self, loc: Location) -> bool {
        if self.has_ice_wall(loc) {
            self.set_cell(loc, Cell::Empty);
            true
        } else {
            false
        }
    }

    pub fn has_ice_wall(&self, loc: Location) -> bool {
        self.cell_at(loc) == Some(Cell::Ice)
    }

    pub fn has_wall(&self, loc: Location) -> bool {
        self.cell_at(loc) == Some(Cell::Wall)
    }

    pub fn ice_wall_at(&self, loc: Location) -> Option<IceWall> {
        self.has_ice_wall(loc).then_some(IceWall { location: loc })
    }

    /// Every ice cell, row-major.
    pub fn ice_walls(&self) -> Vec<Location> {
        self.locations_where(|c| c == Cell::Ice)
    }

    pub fn ice_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| **c == Cell::Ice).count()
    }

    /// Copy of the grid as rows (`cells[y][x]`).
    pub fn cells(&self) -> Vec<Vec<Cell>> {
        self.cells.clone()
    }

    fn locations_where(&self, pred: impl Fn(Cell) -> bool) -> Vec<Location> {
        let mut out = vec![];
        for (y, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if pred(*cell) {
                    out.push(Location::new(x as i32, y as i32));
                }
            }
        }
        out
    }

    /// Rejection-sample a valid cell not refused by `reject`.
    pub fn random_valid_location<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        attempts: u32,
        reject: impl Fn(Location) -> bool,
    ) -> Option<Location> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        for _ in 0..attempts {
            let loc = Location::new(
                rng.random_range(0..self.width),
                rng.random_range(0..self.height),
            );
            if self.is_valid_position(loc) && !reject(loc) {
                return Some(loc);
            }
        }
        None
    }
}

// ── Obstacle overlays ──

impl TileMap {
    pub fn add_hot_tile(&mut self, loc: Location) {
        if self.in_bounds(loc) && !self.hot_tiles.contains(&loc) {
            self.hot_tiles.push(loc);
        }
    }

    pub fn is_hot_tile(&self, loc: Location) -> bool {
        self.hot_tiles.contains(&loc)
    }

    pub fn hot_tiles(&self) -> &[Location] {
        &self.hot_tiles
    }

    pub fn add_campfire(&mut self, loc: Location) {
        if self.in_bounds(loc) && self.campfire_at(loc).is_none() {
            self.campfires.push(Campfire::new(loc));
        }
    }

    pub fn campfire_at(&self, loc: Location) -> Option<&Campfire> {
        self.campfires.iter().find(|c| c.location == loc)
    }

    pub fn campfire_at_mut(&mut self, loc: Location) -> Option<&mut Campfire> {
        self.campfires.iter_mut().find(|c| c.location == loc)
    }

    pub fn is_lit_campfire(&self, loc: Location) -> bool {
        self.campfire_at(loc).is_some_and(|c| c.lit)
    }

    pub fn campfires(&self) -> &[Campfire] {
        &self.campfires
    }

    /// Relight campfires whose timer ran out. Returns the relit locations.
    pub fn update_campfires(&mut self, now: u64, relight_ms: u64) -> Vec<Location> {
        self.campfires
            .iter_mut()
            .filter_map(|c| c.update(now, relight_ms).then_some(c.location))
            .collect()
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Helper: build a map from a string diagram.
    /// Legend:  '#'=Wall  '*'=Ice  anything else=Empty
    fn map_from(rows: &[&str]) -> TileMap {
        let mut map = TileMap::new(rows[0].len() as i32, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let loc = Location::new(x as i32, y as i32);
                match ch {
                    '#' => map.add_wall(loc),
                    '*' => map.add_ice_wall(loc),
                    _ => {}
                }
            }
        }
        map
    }

    #[test]
    fn validity_requires_bounds_and_empty() {
        let map = map_from(&[
            "#..",
            ".*.",
        ]);
        assert!(!map.is_valid_position(Location::new(0, 0))); // wall
        assert!(!map.is_valid_position(Location::new(1, 1))); // ice
        assert!(map.is_valid_position(Location::new(2, 1)));
        assert!(!map.is_valid_position(Location::new(-1, 0)));
        assert!(!map.is_valid_position(Location::new(3, 0)));
        assert_eq!(map.cell_at(Location::new(0, 5)), None);
    }

    #[test]
    fn cell_kinds() {
        assert!(Cell::Empty.is_passable() && !Cell::Empty.is_breakable());
        assert!(!Cell::Ice.is_passable() && Cell::Ice.is_breakable());
        assert!(!Cell::Wall.is_passable() && !Cell::Wall.is_breakable());
    }

    #[test]
    fn ice_round_trip_restores_validity() {
        let mut map = TileMap::new(4, 4);
        let loc = Location::new(2, 2);
        assert!(map.is_valid_position(loc));
        map.add_ice_wall(loc);
        assert!(!map.is_valid_position(loc));
        assert_eq!(map.ice_wall_at(loc), Some(IceWall { location: loc }));
        assert!(map.remove_ice_wall(loc));
        assert!(map.is_valid_position(loc));
        assert!(!map.remove_ice_wall(loc));
    }

    #[test]
    fn ice_never_replaces_walls() {
        let mut map = map_from(&["#"]);
        map.add_ice_wall(Location::new(0, 0));
        assert!(map.has_wall(Location::new(0, 0)));
        assert!(!map.remove_ice_wall(Location::new(0, 0)));
        assert!(map.has_wall(Location::new(0, 0)));
    }

    #[test]
    fn out_of_bounds_mutations_are_noops() {
        let mut map = TileMap::new(2, 2);
        map.add_wall(Location::new(5, 5));
        map.add_ice_wall(Location::new(-1, 0));
        map.add_hot_tile(Location::new(9, 9));
        map.add_campfire(Location::new(2, 0));
        assert_eq!(map.ice_count(), 0);
        assert!(map.hot_tiles().is_empty());
        assert!(map.campfires().is_empty());
    }

    #[test]
    fn border_rings_the_map() {
        let mut map = TileMap::new(4, 3);
        map.add_border();
        let rows = map.cells();
        assert!(rows[0].iter().all(|c| *c == Cell::Wall));
        assert!(rows[2].iter().all(|c| *c == Cell::Wall));
        assert_eq!(rows[1], vec![Cell::Wall, Cell::Empty, Cell::Empty, Cell::Wall]);
    }

    #[test]
    fn campfire_registry() {
        let mut map = TileMap::new(5, 5);
        let loc = Location::new(1, 1);
        map.add_campfire(loc);
        map.add_campfire(loc); // duplicate ignored
        assert_eq!(map.campfires().len(), 1);
        assert!(map.is_lit_campfire(loc));

        if let Some(c) = map.campfire_at_mut(loc) {
            c.extinguish(0);
        }
        assert!(!map.is_lit_campfire(loc));
        assert!(map.update_campfires(5_000, 10_000).is_empty());
        assert_eq!(map.update_campfires(10_000, 10_000), vec![loc]);
        assert!(map.is_lit_campfire(loc));
    }

    #[test]
    fn random_valid_location_skips_rejected_cells() {
        let map = map_from(&[
            "###",
            "#..",
            "###",
        ]);
        let mut rng = Pcg32::seed_from_u64(7);
        let only = Location::new(2, 1);
        let got = map.random_valid_location(&mut rng, 200, |l| l == Location::new(1, 1));
        assert_eq!(got, Some(only));

        let none = map.random_valid_location(&mut rng, 50, |_| true);
        assert_eq!(none, None);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Wall(i32, i32),
        Ice(i32, i32),
        Melt(i32, i32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-2..10i32, -2..10i32).prop_map(|(x, y)| Op::Wall(x, y)),
            (-2..10i32, -2..10i32).prop_map(|(x, y)| Op::Ice(x, y)),
            (-2..10i32, -2..10i32).prop_map(|(x, y)| Op::Melt(x, y)),
        ]
    }

    proptest! {
        #[test]
        fn validity_invariant_holds_after_any_mutation(ops in prop::collection::vec(op(), 0..60)) {
            let mut map = TileMap::new(8, 6);
            for op in ops {
                match op {
                    Op::Wall(x, y) => map.add_wall(Location::new(x, y)),
                    Op::Ice(x, y) => map.add_ice_wall(Location::new(x, y)),
                    Op::Melt(x, y) => { map.remove_ice_wall(Location::new(x, y)); }
                }
            }
            for y in -2..10 {
                for x in -2..10 {
                    let loc = Location::new(x, y);
                    let expected = x >= 0 && x < 8 && y >= 0 && y < 6
                        && map.cells()[y as usize][x as usize] == Cell::Empty;
                    prop_assert_eq!(map.is_valid_position(loc), expected);
                }
            }
        }
    }
}
