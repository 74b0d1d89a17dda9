/// Grid A* over 4-connected moves.
///
/// Manhattan heuristic, unit step cost. The ice-breaking variant may
/// route through ice at `ICE_BREAK_COST` per cell and tags those steps.
/// Ties on `f` go to the node pushed first.
///
/// Results are unit `(dx, dy)` steps from start to goal; an empty path
/// means "already there" or "unreachable" — callers that need to tell
/// them apart compare start and goal.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::location::{Location, CARDINALS};
use super::tile::{Cell, TileMap};

pub const STEP_COST: u32 = 1;
pub const ICE_BREAK_COST: u32 = 3;

/// One step of an ice-aware path.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PathStep {
    pub dx: i32,
    pub dy: i32,
    /// The destination of this step holds ice that must be broken first.
    pub breaks_ice: bool,
}

impl PathStep {
    pub fn dir(&self) -> (i32, i32) {
        (self.dx, self.dy)
    }
}

pub fn find_path(map: &TileMap, start: Location, goal: Location) -> Vec<(i32, i32)> {
    find_path_avoiding(map, start, goal, |_| false)
}

/// A* where `blocked` vetoes extra cells (enemies, fires). The goal is
/// never vetoed.
pub fn find_path_avoiding(
    map: &TileMap,
    start: Location,
    goal: Location,
    blocked: impl Fn(Location) -> bool,
) -> Vec<(i32, i32)> {
    search(map, start, goal, &blocked, false)
        .into_iter()
        .map(|s| s.dir())
        .collect()
}

pub fn find_path_breaking_ice(map: &TileMap, start: Location, goal: Location) -> Vec<PathStep> {
    search(map, start, goal, &|_: Location| false, true)
}

pub fn find_path_breaking_ice_avoiding(
    map: &TileMap,
    start: Location,
    goal: Location,
    blocked: impl Fn(Location) -> bool,
) -> Vec<PathStep> {
    search(map, start, goal, &blocked, true)
}

fn search(
    map: &TileMap,
    start: Location,
    goal: Location,
    blocked: &dyn Fn(Location) -> bool,
    break_ice: bool,
) -> Vec<PathStep> {
    if start == goal || !map.in_bounds(start) || !map.in_bounds(goal) {
        return vec![];
    }
    if step_cost(map, goal, break_ice).is_none() {
        return vec![];
    }

    let w = map.width() as usize;
    let cells = w * map.height() as usize;
    let index = |l: Location| l.y as usize * w + l.x as usize;
    let at = |i: usize| Location::new((i % w) as i32, (i / w) as i32);

    let mut g = vec![u32::MAX; cells];
    let mut parent: Vec<Option<usize>> = vec![None; cells];
    let mut closed = vec![false; cells];
    let mut open: BinaryHeap<Reverse<(u32, u64, usize)>> = BinaryHeap::new();
    let mut seq: u64 = 0;

    let s = index(start);
    let goal_idx = index(goal);
    g[s] = 0;
    open.push(Reverse((heuristic(start, goal), seq, s)));

    while let Some(Reverse((_, _, cur))) = open.pop() {
        if cur == goal_idx {
            return reconstruct(map, &parent, s, goal_idx, at);
        }
        if closed[cur] {
            continue;
        }
        closed[cur] = true;

        let here = at(cur);
        for dir in CARDINALS {
            let next = here.step(dir);
            if !map.in_bounds(next) {
                continue;
            }
            let ni = index(next);
            if closed[ni] || (next != goal && blocked(next)) {
                continue;
            }
            let Some(cost) = step_cost(map, next, break_ice) else { continue };
            let tentative = g[cur] + cost;
            if tentative < g[ni] {
                g[ni] = tentative;
                parent[ni] = Some(cur);
                seq += 1;
                open.push(Reverse((tentative + heuristic(next, goal), seq, ni)));
            }
        }
    }

    vec![]
}

fn step_cost(map: &TileMap, loc: Location, break_ice: bool) -> Option<u32> {
    let cell = map.cell_at(loc)?;
    if cell.is_passable() {
        Some(STEP_COST)
    } else if break_ice && cell.is_breakable() {
        Some(ICE_BREAK_COST)
    } else {
        None
    }
}

fn heuristic(a: Location, b: Location) -> u32 {
    a.manhattan_distance_to(b) as u32
}

fn reconstruct(
    map: &TileMap,
    parent: &[Option<usize>],
    start: usize,
    goal: usize,
    at: impl Fn(usize) -> Location,
) -> Vec<PathStep> {
    let mut steps = vec![];
    let mut cur = goal;
    while cur != start {
        let Some(prev) = parent[cur] else { return vec![] };
        let (to, from) = (at(cur), at(prev));
        steps.push(PathStep {
            dx: to.x - from.x,
            dy: to.y - from.y,
            breaks_ice: map.has_ice_wall(to),
        });
        cur = prev;
    }
    steps.reverse();
    steps
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
