/// Decision profiles for autonomous actors.
///
/// Profiles are plain enum values fed into stateless functions:
///
///   enemy:  `EnemyProfile::decide(view, enemy_idx) -> (dx, dy)`
///   player: `PlayerProfile::decide(view, player_idx) -> Intent`
///
/// Both read the same immutable `AiView` (map + entities) and lean on the
/// A* helpers in `pathfinding`. Their output goes back through the normal
/// command path, exactly like human input.
///
/// Threat distances are Euclidean. A cell is "safe" when every enemy is
/// at least `DANGER_RANGE` away.

use serde::{Deserialize, Serialize};

use super::enemy::{nearest, Enemy};
use super::entity::{IceBreaker, Intent, Player};
use super::fruit::Fruit;
use super::location::{Location, CARDINALS};
use super::pathfinding;
use super::tile::TileMap;

pub const DANGER_RANGE: f64 = 2.0;
pub const CRITICAL_RADIUS: f64 = 2.0;
/// Expert only blocks threats this close on a shared row/column.
pub const BLOCK_RANGE: i32 = 3;
pub const EXPERT_DANGER_WEIGHT: f64 = 4.0;
const DANGER_HORIZON: f64 = 5.0;

pub const AMBUSH_LOOKAHEAD: i32 = 4;
pub const AMBUSH_CLOSE_RANGE: i32 = 3;
pub const TERRITORY_RADIUS: f64 = 5.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum EnemyProfile {
    Patrol,
    Chase,
    SmartChase,
    Ambush,
    Territorial,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PlayerProfile {
    Hungry,
    Fearful,
    Expert,
}

/// Read-only slice of level state handed to decision functions.
#[derive(Clone, Copy)]
pub struct AiView<'a> {
    pub map: &'a TileMap,
    pub players: &'a [Player],
    pub enemies: &'a [Enemy],
    pub fruits: &'a [Fruit],
}

impl<'a> AiView<'a> {
    pub fn live_players(&self) -> Vec<Location> {
        self.players.iter().filter(|p| p.is_alive()).map(|p| p.location).collect()
    }

    pub fn enemy_at(&self, loc: Location) -> bool {
        self.enemies.iter().any(|e| e.location == loc)
    }

    /// Closest enemy distance from `loc`; infinity with no enemies.
    pub fn min_enemy_distance(&self, loc: Location) -> f64 {
        self.enemies
            .iter()
            .map(|e| loc.distance_to(e.location))
            .fold(f64::INFINITY, f64::min)
    }

    pub fn is_safe(&self, loc: Location) -> bool {
        self.min_enemy_distance(loc) >= DANGER_RANGE
    }

    /// Cells that kill a player on entry.
    pub fn is_hazard(&self, loc: Location) -> bool {
        self.map.is_lit_campfire(loc)
            || self.fruits.iter().any(|f| f.location == loc && f.is_lethal())
    }

    /// Uncollected fruits worth walking to.
    fn targets(&self) -> impl Iterator<Item = &'a Fruit> + 'a {
        self.fruits.iter().filter(|f| !f.is_collected() && !f.has_spikes())
    }

    fn can_enter(&self, loc: Location) -> bool {
        self.map.is_valid_position(loc) && !self.enemy_at(loc) && !self.is_hazard(loc)
    }
}

// ══════════════════════════════════════════════════════════════
// Enemy profiles
// ══════════════════════════════════════════════════════════════

impl EnemyProfile {
    pub fn decide(self, view: &AiView, enemy_idx: usize) -> (i32, i32) {
        let Some(me) = view.enemies.get(enemy_idx) else { return (0, 0) };
        let targets = view.live_players();
        match self {
            EnemyProfile::Patrol => patrol_direction(view, me),
            EnemyProfile::Chase => match nearest(me.location, &targets) {
                Some(t) => greedy_direction(view, me, t),
                None => (0, 0),
            },
            EnemyProfile::SmartChase => match nearest(me.location, &targets) {
                Some(t) => smart_chase(view, enemy_idx, t),
                None => (0, 0),
            },
            EnemyProfile::Ambush => {
                let Some(player) = view
                    .players
                    .iter()
                    .filter(|p| p.is_alive())
                    .min_by_key(|p| p.location.manhattan_distance_to(me.location))
                else {
                    return (0, 0);
                };
                if me.location.manhattan_distance_to(player.location) <= AMBUSH_CLOSE_RANGE {
                    return smart_chase(view, enemy_idx, player.location);
                }
                let spot = ambush_spot(view.map, player);
                first_enemy_step(view, enemy_idx, spot)
                    .unwrap_or_else(|| smart_chase(view, enemy_idx, player.location))
            }
            EnemyProfile::Territorial => {
                let intruder = targets
                    .iter()
                    .copied()
                    .filter(|t| t.distance_to(me.spawn) <= TERRITORY_RADIUS)
                    .min_by(|a, b| me.location.distance_to(*a).total_cmp(&me.location.distance_to(*b)));
                match intruder {
                    Some(t) => smart_chase(view, enemy_idx, t),
                    None if me.location != me.spawn => {
                        first_enemy_step(view, enemy_idx, me.spawn).unwrap_or((0, 0))
                    }
                    None => (0, 0),
                }
            }
        }
    }
}

/// Keep going; when blocked take a perpendicular, then reverse.
fn patrol_direction(view: &AiView, me: &Enemy) -> (i32, i32) {
    let dir = if me.direction == (0, 0) { (1, 0) } else { me.direction };
    let [a, b] = super::location::perpendiculars(dir);
    [dir, a, b, (-dir.0, -dir.1)]
        .into_iter()
        .find(|d| view.map.is_valid_position(me.location.step(*d)))
        .unwrap_or((0, 0))
}

fn greedy_direction(view: &AiView, me: &Enemy, target: Location) -> (i32, i32) {
    let (sx, sy) = me.location.signum_toward(target);
    [(sx, 0), (0, sy)]
        .into_iter()
        .filter(|d| *d != (0, 0))
        .find(|d| {
            let next = me.location.step(*d);
            view.map.is_valid_position(next) || (me.can_break_ice() && view.map.has_ice_wall(next))
        })
        .unwrap_or((0, 0))
}

fn smart_chase(view: &AiView, enemy_idx: usize, target: Location) -> (i32, i32) {
    first_enemy_step(view, enemy_idx, target)
        .unwrap_or_else(|| greedy_direction(view, &view.enemies[enemy_idx], target))
}

/// First A* step for an enemy, routing around the other enemies.
fn first_enemy_step(view: &AiView, enemy_idx: usize, goal: Location) -> Option<(i32, i32)> {
    let me = &view.enemies[enemy_idx];
    let others = |l: Location| {
        view.enemies
            .iter()
            .enumerate()
            .any(|(i, e)| i != enemy_idx && e.location == l)
    };
    if me.can_break_ice() {
        pathfinding::find_path_breaking_ice_avoiding(view.map, me.location, goal, others)
            .first()
            .map(|s| s.dir())
    } else {
        pathfinding::find_path_avoiding(view.map, me.location, goal, others)
            .first()
            .copied()
    }
}

/// The cell `AMBUSH_LOOKAHEAD` steps ahead of the player's facing, pulled
/// back toward the player until it is enterable.
fn ambush_spot(map: &TileMap, player: &Player) -> Location {
    let (fx, fy) = player.facing;
    (0..=AMBUSH_LOOKAHEAD)
        .rev()
        .map(|k| player.location.offset(fx * k, fy * k))
        .find(|l| map.is_valid_position(*l))
        .unwrap_or(player.location)
}

// ══════════════════════════════════════════════════════════════
// Player profiles
// ══════════════════════════════════════════════════════════════

impl PlayerProfile {
    pub fn decide(self, view: &AiView, player_idx: usize) -> Intent {
        let Some(me) = view.players.get(player_idx) else { return Intent::IDLE };
        if !me.is_alive() {
            return Intent::IDLE;
        }
        match self {
            PlayerProfile::Hungry => hungry(view, me.location),
            PlayerProfile::Fearful => fearful(view, me.location),
            PlayerProfile::Expert => expert(view, me.location),
        }
    }
}

/// Shortest walk to any target fruit; fall back to digging through ice.
fn hungry(view: &AiView, here: Location) -> Intent {
    let blocked = |l: Location| view.enemy_at(l) || view.is_hazard(l);
    let best = view
        .targets()
        .map(|f| pathfinding::find_path_avoiding(view.map, here, f.location, blocked))
        .filter(|p| !p.is_empty())
        .min_by_key(|p| p.len());
    match best {
        Some(path) => Intent::step(path[0]),
        None => dig_toward_fruit(view, here, |_| 0.0),
    }
}

fn fearful(view: &AiView, here: Location) -> Intent {
    let threatened = view
        .enemies
        .iter()
        .any(|e| here.distance_to(e.location) <= CRITICAL_RADIUS);
    if threatened {
        return flee_or_wall(view, here);
    }

    // Seek the fruit farthest from every enemy.
    let blocked = |l: Location| view.enemy_at(l) || view.is_hazard(l);
    let mut candidates: Vec<&Fruit> = view.targets().collect();
    candidates.sort_by(|a, b| {
        view.min_enemy_distance(b.location)
            .total_cmp(&view.min_enemy_distance(a.location))
    });
    for fruit in candidates {
        let path = pathfinding::find_path_avoiding(view.map, here, fruit.location, blocked);
        if let Some(first) = path.first() {
            return Intent::step(*first);
        }
    }
    dig_toward_fruit(view, here, |l| -view.min_enemy_distance(l))
}

fn expert(view: &AiView, here: Location) -> Intent {
    if let Some(dir) = blockable_threat(view, here) {
        return Intent::ice(dir);
    }

    let blocked = |l: Location| view.enemy_at(l) || view.is_hazard(l);
    let best = view
        .targets()
        .filter_map(|f| {
            let path = pathfinding::find_path_avoiding(view.map, here, f.location, blocked);
            (!path.is_empty()).then(|| {
                let score = path.len() as f64 + EXPERT_DANGER_WEIGHT * danger(view, f.location);
                (score, f.location, path[0])
            })
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));

    let Some((_, goal, first)) = best else {
        return dig_toward_fruit(view, here, |l| danger(view, l));
    };

    let next = here.step(first);
    let retreating = view.min_enemy_distance(next) > view.min_enemy_distance(here);
    if view.is_safe(next) || (!view.is_safe(here) && retreating) {
        return Intent::step(first);
    }

    // The path leads into danger: take the safe neighbour that keeps
    // closest to the goal, or hold still.
    CARDINALS
        .into_iter()
        .map(|d| (d, here.step(d)))
        .filter(|(_, l)| view.can_enter(*l) && view.is_safe(*l))
        .min_by_key(|(_, l)| l.manhattan_distance_to(goal))
        .map(|(d, _)| Intent::step(d))
        .unwrap_or_else(|| {
            if view.is_safe(here) { Intent::IDLE } else { flee_or_wall(view, here) }
        })
}

/// Step to the neighbour maximising distance from the closest enemy;
/// when cornered, raise ice toward the nearest threat.
fn flee_or_wall(view: &AiView, here: Location) -> Intent {
    let current = view.min_enemy_distance(here);
    let best = CARDINALS
        .into_iter()
        .filter(|d| view.can_enter(here.step(*d)))
        .max_by(|a, b| {
            view.min_enemy_distance(here.step(*a))
                .total_cmp(&view.min_enemy_distance(here.step(*b)))
        });

    if let Some(dir) = best {
        if view.min_enemy_distance(here.step(dir)) > current {
            return Intent::step(dir);
        }
    }

    let threat = view
        .enemies
        .iter()
        .map(|e| e.location)
        .min_by(|a, b| here.distance_to(*a).total_cmp(&here.distance_to(*b)));
    if let Some(t) = threat {
        let dx = t.x - here.x;
        let dy = t.y - here.y;
        let dir = if dx.abs() >= dy.abs() { (dx.signum(), 0) } else { (0, dy.signum()) };
        let wall_cell = here.step(dir);
        if dir != (0, 0) && view.map.is_valid_position(wall_cell) && !view.enemy_at(wall_cell) {
            return Intent::ice(dir);
        }
    }

    best.map(Intent::step).unwrap_or(Intent::IDLE)
}

/// An enemy within `BLOCK_RANGE` on a clear straight line, with an empty
/// cell between us to freeze.
fn blockable_threat(view: &AiView, here: Location) -> Option<(i32, i32)> {
    view.enemies.iter().find_map(|e| {
        let dx = e.location.x - here.x;
        let dy = e.location.y - here.y;
        let (dir, dist) = match (dx, dy) {
            (0, 0) => return None,
            (_, 0) => ((dx.signum(), 0), dx.abs()),
            (0, _) => ((0, dy.signum()), dy.abs()),
            _ => return None,
        };
        if dist < 2 || dist > BLOCK_RANGE {
            return None;
        }
        let clear = (1..dist).all(|k| view.map.is_valid_position(here.offset(dir.0 * k, dir.1 * k)));
        clear.then_some(dir)
    })
}

/// Sum of how far each enemy intrudes into `DANGER_HORIZON` around `loc`.
fn danger(view: &AiView, loc: Location) -> f64 {
    view.enemies
        .iter()
        .map(|e| (DANGER_HORIZON - loc.distance_to(e.location)).max(0.0))
        .sum()
}

/// No walkable route: follow the cheapest ice-breaking route instead.
/// `bias` is added to the path cost of each candidate fruit.
fn dig_toward_fruit(view: &AiView, here: Location, bias: impl Fn(Location) -> f64) -> Intent {
    let blocked = |l: Location| view.enemy_at(l) || view.is_hazard(l);
    let best = view
        .targets()
        .filter_map(|f| {
            let path = pathfinding::find_path_breaking_ice_avoiding(view.map, here, f.location, blocked);
            let first = *path.first()?;
            let cost: u32 = path
                .iter()
                .map(|s| if s.breaks_ice { pathfinding::ICE_BREAK_COST } else { pathfinding::STEP_COST })
                .sum();
            Some((cost as f64 + bias(f.location), first))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));
    match best {
        Some((_, step)) if step.breaks_ice => Intent::ice(step.dir()),
        Some((_, step)) => Intent::step(step.dir()),
        None => Intent::IDLE,
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
