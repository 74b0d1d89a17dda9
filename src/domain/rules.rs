/// Player movement and ice-line rules — truth-table driven.
///
/// Pure functions over the tile map. They decide "what would happen"
/// and return a plan; `sim::step` applies it and emits events.
///
/// `occupied(loc)` is supplied by the caller and answers "is an enemy
/// or a player standing here?".
///
/// ### Move (player, one step)
/// ┌──────────────────────────────┬─────────┐
/// │ Condition                     │ Allow?  │
/// ├──────────────────────────────┼─────────┤
/// │ dir not a unit cardinal       │ DENY    │
/// │ dest out of bounds            │ DENY    │
/// │ dest Wall or Ice              │ DENY    │
/// │ Otherwise                     │ ALLOW   │
/// └──────────────────────────────┴─────────┘
///
/// Enemies, fruits, fires and cacti never block the step itself; their
/// effects resolve after the player arrives.
///
/// ### Create ice line (walk outward, checked per cell in order)
/// ┌──────────────────────────────┬──────────────────┐
/// │ Condition                     │ Result           │
/// ├──────────────────────────────┼──────────────────┤
/// │ out of bounds / Wall          │ STOP             │
/// │ cell already Ice              │ STOP             │
/// │ enemy or player on cell       │ STOP             │
/// │ cell is a hot tile            │ MELT, continue   │
/// │ Otherwise                     │ FREEZE, continue │
/// └──────────────────────────────┴──────────────────┘
///
/// ### Break ice line
/// ┌──────────────────────────────┬──────────────────────┐
/// │ Condition                     │ Result               │
/// ├──────────────────────────────┼──────────────────────┤
/// │ cell not Ice (or off map)     │ STOP                 │
/// │ enemy or player on cell       │ STOP                 │
/// │ lit campfire under the ice    │ BREAK + DOUSE, cont. │
/// │ Otherwise                     │ BREAK, continue      │
/// └──────────────────────────────┴──────────────────────┘

use super::location::{is_cardinal, Location};
use super::tile::{Cell, TileMap};

/// The cells an ice command touches, in order from the player outward.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinePlan {
    /// Frozen (create) or shattered (break) cells.
    pub cells: Vec<Location>,
    /// Hot tiles the line crossed; ice placed there melts at once.
    pub melted: Vec<Location>,
    /// Lit campfires uncovered by breaking.
    pub doused: Vec<Location>,
}

impl LinePlan {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.melted.is_empty()
    }
}

// ── Movement ──

/// Destination of a player step, or None when the move is denied.
pub fn player_step_target(map: &TileMap, from: Location, dir: (i32, i32)) -> Option<Location> {
    if !is_cardinal(dir) {
        return None;
    }
    let dest = from.step(dir);
    map.is_valid_position(dest).then_some(dest)
}

// ── Ice lines ──

pub fn plan_ice_line(
    map: &TileMap,
    origin: Location,
    dir: (i32, i32),
    occupied: impl Fn(Location) -> bool,
) -> LinePlan {
    let mut plan = LinePlan::default();
    if !is_cardinal(dir) {
        return plan;
    }
    let mut cur = origin.step(dir);
    while let Some(Cell::Empty) = map.cell_at(cur) {
        if occupied(cur) {
            break;
        }
        if map.is_hot_tile(cur) {
            plan.melted.push(cur);
        } else {
            plan.cells.push(cur);
        }
        cur = cur.step(dir);
    }
    plan
}

pub fn plan_break_line(
    map: &TileMap,
    origin: Location,
    dir: (i32, i32),
    occupied: impl Fn(Location) -> bool,
) -> LinePlan {
    let mut plan = LinePlan::default();
    if !is_cardinal(dir) {
        return plan;
    }
    let mut cur = origin.step(dir);
    while map.has_ice_wall(cur) && !occupied(cur) {
        plan.cells.push(cur);
        if map.is_lit_campfire(cur) {
            plan.doused.push(cur);
        }
        cur = cur.step(dir);
    }
    plan
}

/// Toggle rule used by `ice_action`: break when the facing cell holds
/// ice, otherwise create.
pub fn facing_holds_ice(map: &TileMap, origin: Location, facing: (i32, i32)) -> bool {
    map.has_ice_wall(origin.step(facing))
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: build a map from a string diagram.
    /// Legend:  '#'=Wall  '*'=Ice  '^'=Hot tile  'F'=Ice over a campfire
    ///          anything else=Empty
    fn map_from(rows: &[&str]) -> TileMap {
        let mut map = TileMap::new(rows[0].len() as i32, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let loc = Location::new(x as i32, y as i32);
                match ch {
                    '#' => map.add_wall(loc),
                    '*' => map.add_ice_wall(loc),
                    '^' => map.add_hot_tile(loc),
                    'F' => {
                        map.add_campfire(loc);
                        map.add_ice_wall(loc);
                    }
                    _ => {}
                }
            }
        }
        map
    }

    fn at(x: i32, y: i32) -> Location {
        Location::new(x, y)
    }

    // ── Movement ──

    #[test]
    fn step_allowed_onto_empty() {
        let map = map_from(&["..."]);
        assert_eq!(player_step_target(&map, at(0, 0), (1, 0)), Some(at(1, 0)));
    }

    #[test]
    fn step_denied_on_wall_ice_and_edge() {
        let map = map_from(&[".#*"]);
        assert_eq!(player_step_target(&map, at(0, 0), (1, 0)), None);
        assert_eq!(player_step_target(&map, at(0, 0), (-1, 0)), None);
        let map = map_from(&["..*"]);
        assert_eq!(player_step_target(&map, at(1, 0), (1, 0)), None);
    }

    #[test]
    fn step_denied_for_non_unit_vectors() {
        let map = TileMap::new(5, 5);
        assert_eq!(player_step_target(&map, at(2, 2), (1, 1)), None);
        assert_eq!(player_step_target(&map, at(2, 2), (2, 0)), None);
        assert_eq!(player_step_target(&map, at(2, 2), (0, 0)), None);
    }

    // ── Create ──

    #[test]
    fn create_runs_until_wall() {
        let map = map_from(&["#....#"]);
        let plan = plan_ice_line(&map, at(1, 0), (1, 0), |_| false);
        assert_eq!(plan.cells, vec![at(2, 0), at(3, 0), at(4, 0)]);
        assert!(plan.melted.is_empty());
    }

    #[test]
    fn create_stops_at_existing_ice() {
        let map = map_from(&["...*.."]);
        let plan = plan_ice_line(&map, at(0, 0), (1, 0), |_| false);
        assert_eq!(plan.cells, vec![at(1, 0), at(2, 0)]);
    }

    #[test]
    fn create_stops_at_occupant() {
        let map = map_from(&["......"]);
        let plan = plan_ice_line(&map, at(0, 0), (1, 0), |l| l == at(3, 0));
        assert_eq!(plan.cells, vec![at(1, 0), at(2, 0)]);
        let blocked = plan_ice_line(&map, at(0, 0), (1, 0), |l| l == at(1, 0));
        assert!(blocked.is_empty());
    }

    #[test]
    fn hot_tiles_melt_without_stopping_the_line() {
        let map = map_from(&[".^..#"]);
        let plan = plan_ice_line(&map, at(0, 0), (1, 0), |_| false);
        assert_eq!(plan.melted, vec![at(1, 0)]);
        assert_eq!(plan.cells, vec![at(2, 0), at(3, 0)]);
        assert_eq!(plan.len(), 2);
    }

    // ── Break ──

    #[test]
    fn break_clears_consecutive_ice_only() {
        let map = map_from(&[".***.*"]);
        let plan = plan_break_line(&map, at(0, 0), (1, 0), |_| false);
        assert_eq!(plan.cells, vec![at(1, 0), at(2, 0), at(3, 0)]);
    }

    #[test]
    fn break_with_no_adjacent_ice_is_empty() {
        let map = map_from(&["..**"]);
        assert!(plan_break_line(&map, at(0, 0), (1, 0), |_| false).is_empty());
        assert!(!facing_holds_ice(&map, at(0, 0), (1, 0)));
        assert!(facing_holds_ice(&map, at(1, 0), (1, 0)));
    }

    #[test]
    fn break_over_lit_campfire_douses_it() {
        let map = map_from(&[".*F*"]);
        let plan = plan_break_line(&map, at(0, 0), (1, 0), |_| false);
        assert_eq!(plan.cells.len(), 3);
        assert_eq!(plan.doused, vec![at(2, 0)]);
    }

    #[test]
    fn vertical_lines_work_too() {
        let map = map_from(&[
            ".",
            ".",
            ".",
            "#",
        ]);
        let plan = plan_ice_line(&map, at(0, 0), (0, 1), |_| false);
        assert_eq!(plan.cells, vec![at(0, 1), at(0, 2)]);
    }
}
