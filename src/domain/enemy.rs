/// Enemies: four movement state machines behind one dispatch surface.
///
///   - Troll — patrols straight, turns by a fixed preference when blocked.
///   - Maceta — greedy chase, horizontal first, never diagonal.
///   - CalamarNaranja — random walk; inside detection range it chases and
///     smashes ice in its way.
///   - Narval — patrols until a player lines up on its row/column, then
///     charges two cells per tick, breaking ice, aborting on walls.
///
/// Every variant goes through `Enemy::step`, which reports what happened
/// (`EnemyStep`) so the level can emit events without type tests.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ai::EnemyProfile;
use super::entity::{IceBreaker, Movable};
use super::location::{perpendiculars, Location, CARDINALS};
use super::tile::{Cell, TileMap};

pub const CALAMAR_DETECTION_RANGE: f64 = 7.0;
pub const CALAMAR_HOLD_TICKS: u32 = 5;
pub const NARVAL_DETECTION_RANGE: i32 = 10;
pub const NARVAL_MAX_CHARGE_STEPS: u32 = 8;
pub const NARVAL_CHARGE_SPEED: u32 = 2;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum EnemyType {
    Troll,
    Maceta,
    CalamarNaranja,
    Narval,
}

impl EnemyType {
    pub const ALL: [EnemyType; 4] = [
        EnemyType::Troll,
        EnemyType::Maceta,
        EnemyType::CalamarNaranja,
        EnemyType::Narval,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnemyType::Troll => "Troll",
            EnemyType::Maceta => "Maceta",
            EnemyType::CalamarNaranja => "Calamar Naranja",
            EnemyType::Narval => "Narval",
        }
    }

    /// Cells per tick outside of a charge.
    pub fn speed(self) -> u32 {
        1
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum NarvalState {
    Patrolling,
    Charging,
    BreakingIce,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EnemyKind {
    Troll,
    Maceta,
    CalamarNaranja { hold_ticks: u32, chasing: bool },
    Narval { state: NarvalState, charge_dir: (i32, i32), steps_remaining: u32 },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ChargeChange {
    Started { dir: (i32, i32), steps: u32 },
    Aborted,
    Finished,
}

/// Outcome of one enemy step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnemyStep {
    pub moved: bool,
    pub broken_ice: Vec<Location>,
    pub charge: Option<ChargeChange>,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub name: String,
    pub location: Location,
    pub spawn: Location,
    pub speed: u32,
    pub direction: (i32, i32),
    pub kind: EnemyKind,
    /// When set, this decision profile drives the enemy instead of its own
    /// state machine.
    pub profile: Option<EnemyProfile>,
}

impl Enemy {
    pub fn new(enemy_type: EnemyType, location: Location) -> Self {
        let (kind, direction) = match enemy_type {
            EnemyType::Troll => (EnemyKind::Troll, (1, 0)),
            EnemyType::Maceta => (EnemyKind::Maceta, (0, 0)),
            EnemyType::CalamarNaranja => (
                EnemyKind::CalamarNaranja { hold_ticks: 0, chasing: false },
                (0, 0),
            ),
            EnemyType::Narval => (
                EnemyKind::Narval {
                    state: NarvalState::Patrolling,
                    charge_dir: (0, 0),
                    steps_remaining: 0,
                },
                (1, 0),
            ),
        };
        Enemy {
            name: enemy_type.name().to_string(),
            location,
            spawn: location,
            speed: enemy_type.speed(),
            direction,
            kind,
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: EnemyProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn enemy_type(&self) -> EnemyType {
        match self.kind {
            EnemyKind::Troll => EnemyType::Troll,
            EnemyKind::Maceta => EnemyType::Maceta,
            EnemyKind::CalamarNaranja { .. } => EnemyType::CalamarNaranja,
            EnemyKind::Narval { .. } => EnemyType::Narval,
        }
    }

    pub fn narval_state(&self) -> Option<NarvalState> {
        match self.kind {
            EnemyKind::Narval { state, .. } => Some(state),
            _ => None,
        }
    }

    /// Attempt one step. True if the enemy ended up somewhere else.
    pub fn try_move<R: Rng + ?Sized>(
        &mut self,
        targets: &[Location],
        map: &mut TileMap,
        rng: &mut R,
    ) -> bool {
        self.step(targets, map, rng).moved
    }

    /// Run the kind's state machine for one tick.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        targets: &[Location],
        map: &mut TileMap,
        rng: &mut R,
    ) -> EnemyStep {
        self.step_among(targets, &[], map, rng)
    }

    /// `step` with the cells other enemies hold. Only multi-cell moves
    /// (Narval charges) look at `others`; a charge halts in front of one
    /// and stops on a target's cell.
    pub fn step_among<R: Rng + ?Sized>(
        &mut self,
        targets: &[Location],
        others: &[Location],
        map: &mut TileMap,
        rng: &mut R,
    ) -> EnemyStep {
        let target = nearest(self.location, targets);
        match self.kind {
            EnemyKind::Troll => self.step_troll(map),
            EnemyKind::Maceta => self.step_maceta(target, map),
            EnemyKind::CalamarNaranja { .. } => self.step_calamar(target, map, rng),
            EnemyKind::Narval { .. } => self.step_narval(targets, others, map),
        }
    }

    /// Step in a direction chosen by an AI profile. Ice breakers smash ice
    /// in the way; everyone else needs an empty cell.
    pub fn follow(&mut self, dir: (i32, i32), map: &mut TileMap) -> EnemyStep {
        let mut out = EnemyStep::default();
        if dir == (0, 0) {
            return out;
        }
        self.direction = dir;
        let next = self.location.step(dir);
        if map.has_ice_wall(next) && self.break_ice_at(map, next) {
            out.broken_ice.push(next);
        }
        out.moved = self.try_step(dir, map);
        out
    }

    // ── Collision hooks ──

    /// Called by the level after this enemy's move was reverted because
    /// another enemy already held the cell.
    pub fn change_direction_on_enemy_collision<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match &mut self.kind {
            EnemyKind::Troll => {
                self.direction = (-self.direction.0, -self.direction.1);
            }
            EnemyKind::Maceta => {
                self.direction = random_cardinal(rng);
            }
            EnemyKind::CalamarNaranja { hold_ticks, .. } => {
                *hold_ticks = 0;
                self.direction = random_cardinal(rng);
            }
            EnemyKind::Narval { state, charge_dir, steps_remaining } => {
                let heading = if *state == NarvalState::Patrolling { self.direction } else { *charge_dir };
                *state = NarvalState::Patrolling;
                *steps_remaining = 0;
                self.direction = (-heading.0, -heading.1);
            }
        }
    }

    pub fn change_direction_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.direction = random_cardinal(rng);
        if let EnemyKind::CalamarNaranja { hold_ticks, .. } = &mut self.kind {
            *hold_ticks = 0;
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Per-kind state machines
// ══════════════════════════════════════════════════════════════

impl Enemy {
    fn step_troll(&mut self, map: &TileMap) -> EnemyStep {
        if self.direction != (0, 0) && self.try_step(self.direction, map) {
            return EnemyStep { moved: true, ..EnemyStep::default() };
        }
        self.direction = troll_turn(map, self.location, self.direction);
        EnemyStep::default()
    }

    fn step_maceta(&mut self, target: Option<Location>, map: &TileMap) -> EnemyStep {
        let Some(t) = target else { return EnemyStep::default() };
        let (sx, sy) = self.location.signum_toward(t);
        for dir in [(sx, 0), (0, sy)] {
            if dir != (0, 0) && self.try_step(dir, map) {
                self.direction = dir;
                return EnemyStep { moved: true, ..EnemyStep::default() };
            }
        }
        EnemyStep::default()
    }

    fn step_calamar<R: Rng + ?Sized>(
        &mut self,
        target: Option<Location>,
        map: &mut TileMap,
        rng: &mut R,
    ) -> EnemyStep {
        let here = self.location;
        let in_range = target.filter(|t| here.distance_to(*t) <= CALAMAR_DETECTION_RANGE);
        let mut out = EnemyStep::default();

        if let Some(t) = in_range {
            if let EnemyKind::CalamarNaranja { chasing, hold_ticks } = &mut self.kind {
                *chasing = true;
                *hold_ticks = 0;
            }
            let (sx, sy) = here.signum_toward(t);
            for dir in [(sx, 0), (0, sy)] {
                if dir == (0, 0) {
                    continue;
                }
                let next = here.step(dir);
                if map.has_ice_wall(next) {
                    // smash and occupy in one action
                    map.remove_ice_wall(next);
                    out.broken_ice.push(next);
                }
                if self.try_step(dir, map) {
                    self.direction = dir;
                    out.moved = true;
                    return out;
                }
            }
            return out;
        }

        let reroll = match &mut self.kind {
            EnemyKind::CalamarNaranja { chasing, hold_ticks } => {
                *chasing = false;
                self.direction == (0, 0) || *hold_ticks >= CALAMAR_HOLD_TICKS
            }
            _ => false,
        };
        if reroll {
            self.change_direction_randomly(rng);
        }

        if self.try_step(self.direction, map) {
            if let EnemyKind::CalamarNaranja { hold_ticks, .. } = &mut self.kind {
                *hold_ticks += 1;
            }
            out.moved = true;
        } else {
            self.change_direction_randomly(rng);
        }
        out
    }

    fn step_narval(&mut self, targets: &[Location], others: &[Location], map: &mut TileMap) -> EnemyStep {
        let mut out = EnemyStep::default();
        let EnemyKind::Narval { state, .. } = self.kind else { return out };
        let target = nearest(self.location, targets);

        if state == NarvalState::Patrolling {
            if let Some((dir, dist)) = target.and_then(|t| aligned(self.location, t)) {
                let steps = (dist as u32).min(NARVAL_MAX_CHARGE_STEPS);
                self.kind = EnemyKind::Narval {
                    state: NarvalState::Charging,
                    charge_dir: dir,
                    steps_remaining: steps,
                };
                self.direction = dir;
                out.charge = Some(ChargeChange::Started { dir, steps });
                log::debug!("{} at {} charging {:?} for {} cells", self.name, self.location, dir, steps);
            } else {
                if self.direction == (0, 0) || !self.try_step(self.direction, map) {
                    self.direction = narval_turn(map, self.location, self.direction);
                    return out;
                }
                out.moved = true;
                return out;
            }
        }

        self.run_charge(targets, others, map, &mut out);
        out
    }

    /// Advance an active charge by up to `NARVAL_CHARGE_SPEED` cells.
    /// The charge ends in front of another enemy; entering a target's
    /// cell ends this tick's movement there.
    fn run_charge(&mut self, targets: &[Location], others: &[Location], map: &mut TileMap, out: &mut EnemyStep) {
        let start = self.location;
        let EnemyKind::Narval { state, charge_dir, steps_remaining } = &mut self.kind else { return };
        let dir = *charge_dir;
        let mut cells = 0;

        while cells < NARVAL_CHARGE_SPEED && *steps_remaining > 0 {
            let next = self.location.step(dir);
            if others.contains(&next) {
                *steps_remaining = 0;
                break;
            }
            match map.cell_at(next) {
                Some(Cell::Empty) => {
                    *state = NarvalState::Charging;
                }
                Some(Cell::Ice) => {
                    *state = NarvalState::BreakingIce;
                    map.remove_ice_wall(next);
                    out.broken_ice.push(next);
                }
                Some(Cell::Wall) | None => {
                    *state = NarvalState::Patrolling;
                    *steps_remaining = 0;
                    self.location = start;
                    self.direction = narval_turn(map, start, dir);
                    out.moved = false;
                    out.charge = Some(ChargeChange::Aborted);
                    return;
                }
            }
            self.location = next;
            *steps_remaining -= 1;
            cells += 1;
            if targets.contains(&next) {
                break;
            }
        }

        out.moved = self.location != start;
        if *steps_remaining == 0 {
            *state = NarvalState::Patrolling;
            self.direction = dir;
            if out.charge.is_none() {
                out.charge = Some(ChargeChange::Finished);
            }
        }
    }
}

impl Movable for Enemy {
    fn location(&self) -> Location {
        self.location
    }

    fn set_location(&mut self, loc: Location) {
        self.location = loc;
    }
}

impl IceBreaker for Enemy {
    fn can_break_ice(&self) -> bool {
        matches!(self.kind, EnemyKind::CalamarNaranja { .. } | EnemyKind::Narval { .. })
    }
}

// ══════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════

/// Closest target by Euclidean distance.
pub fn nearest(from: Location, targets: &[Location]) -> Option<Location> {
    targets
        .iter()
        .copied()
        .min_by(|a, b| from.distance_to(*a).total_cmp(&from.distance_to(*b)))
}

fn random_cardinal<R: Rng + ?Sized>(rng: &mut R) -> (i32, i32) {
    CARDINALS[rng.random_range(0..CARDINALS.len())]
}

/// Troll preference: perpendicular axis first, then the blocked axis.
fn troll_turn(map: &TileMap, loc: Location, blocked: (i32, i32)) -> (i32, i32) {
    let order: [(i32, i32); 4] = if blocked.1 == 0 {
        [(0, -1), (0, 1), (-1, 0), (1, 0)]
    } else {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
    };
    order
        .into_iter()
        .find(|d| map.is_valid_position(loc.step(*d)))
        .unwrap_or((0, 0))
}

/// Narval preference: reverse first, then perpendicular.
fn narval_turn(map: &TileMap, loc: Location, blocked: (i32, i32)) -> (i32, i32) {
    if blocked == (0, 0) {
        return troll_turn(map, loc, blocked);
    }
    let back = (-blocked.0, -blocked.1);
    let [a, b] = perpendiculars(blocked);
    [back, a, b]
        .into_iter()
        .find(|d| map.is_valid_position(loc.step(*d)))
        .unwrap_or((0, 0))
}

/// Same row or column, nonzero offset, within Narval range.
/// Returns the unit direction toward the target and the cell distance.
fn aligned(from: Location, target: Location) -> Option<((i32, i32), i32)> {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    if dy == 0 && dx != 0 && dx.abs() <= NARVAL_DETECTION_RANGE {
        Some(((dx.signum(), 0), dx.abs()))
    } else if dx == 0 && dy != 0 && dy.abs() <= NARVAL_DETECTION_RANGE {
        Some(((0, dy.signum()), dy.abs()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(3)
    }

    // ── Troll ──

    #[test]
    fn troll_walks_until_blocked_then_turns_up() {
        let mut map = map_from(&[
            "#####",
            "#...#",
            "#...#",
            "#####",
        ]);
        let mut t = Enemy::new(EnemyType::Troll, Location::new(1, 2));
        let mut r = rng();
        assert!(t.try_move(&[], &mut map, &mut r));
        assert!(t.try_move(&[], &mut map, &mut r));
        assert_eq!(t.location, Location::new(3, 2));
        // blocked horizontally: prefers up
        assert!(!t.try_move(&[], &mut map, &mut r));
        assert_eq!(t.direction, (0, -1));
        assert!(t.try_move(&[], &mut map, &mut r));
        assert_eq!(t.location, Location::new(3, 1));
        // blocked vertically: prefers left
        assert!(!t.try_move(&[], &mut map, &mut r));
        assert_eq!(t.direction, (-1, 0));
    }

    #[test]
    fn troll_boxed_in_stops() {
        let mut map = map_from(&[
            "###",
            "#.#",
            "###",
        ]);
        let mut t = Enemy::new(EnemyType::Troll, Location::new(1, 1));
        let mut r = rng();
        assert!(!t.try_move(&[], &mut map, &mut r));
        assert_eq!(t.direction, (0, 0));
        assert!(!t.try_move(&[], &mut map, &mut r));
    }

    // ── Maceta ──

    #[test]
    fn maceta_prefers_horizontal_then_vertical() {
        let mut map = map_from(&[
            ".....",
            ".#...",
            ".....",
        ]);
        let mut m = Enemy::new(EnemyType::Maceta, Location::new(0, 1));
        let mut r = rng();
        let player = Location::new(4, 2);
        // (1,1) is a wall → falls back to vertical
        assert!(m.try_move(&[player], &mut map, &mut r));
        assert_eq!(m.location, Location::new(0, 2));
        assert!(m.try_move(&[player], &mut map, &mut r));
        assert_eq!(m.location, Location::new(1, 2));
        assert_eq!(m.direction, (1, 0));
    }

    #[test]
    fn maceta_never_moves_diagonally_or_without_target() {
        let mut map = TileMap::new(5, 5);
        let mut m = Enemy::new(EnemyType::Maceta, Location::new(0, 0));
        let mut r = rng();
        assert!(!m.try_move(&[], &mut map, &mut r));
        m.try_move(&[Location::new(3, 3)], &mut map, &mut r);
        assert!(m.location.is_adjacent(Location::new(0, 0)));
    }

    // ── Calamar ──

    #[test]
    fn calamar_chases_through_ice_in_range() {
        let mut map = map_from(&[
            "......",
            ".K*..P",
            "......",
        ]);
        let mut c = Enemy::new(EnemyType::CalamarNaranja, Location::new(1, 1));
        let mut r = rng();
        let step = c.step(&[Location::new(5, 1)], &mut map, &mut r);
        assert!(step.moved);
        assert_eq!(step.broken_ice, vec![Location::new(2, 1)]);
        assert_eq!(c.location, Location::new(2, 1));
        assert!(!map.has_ice_wall(Location::new(2, 1)));
        assert!(matches!(c.kind, EnemyKind::CalamarNaranja { chasing: true, .. }));
    }

    #[test]
    fn calamar_wanders_out_of_range_and_rerolls_after_hold() {
        let mut map = TileMap::new(40, 40);
        let mut c = Enemy::new(EnemyType::CalamarNaranja, Location::new(20, 20));
        let mut r = rng();
        let far = Location::new(0, 0);
        assert!(c.try_move(&[far], &mut map, &mut r));
        let first = c.direction;
        for _ in 0..4 {
            assert!(c.try_move(&[far], &mut map, &mut r));
            assert_eq!(c.direction, first);
        }
        assert!(matches!(c.kind, EnemyKind::CalamarNaranja { hold_ticks: 5, chasing: false }));
        c.try_move(&[far], &mut map, &mut r);
        assert!(matches!(c.kind, EnemyKind::CalamarNaranja { hold_ticks: 1, .. }));
    }

    // ── Narval ──

    #[test]
    fn narval_charges_two_cells_per_tick() {
        let mut map = TileMap::new(12, 3);
        let mut n = Enemy::new(EnemyType::Narval, Location::new(0, 1));
        let mut r = rng();
        let player = Location::new(5, 1);
        let step = n.step(&[player], &mut map, &mut r);
        assert_eq!(step.charge, Some(ChargeChange::Started { dir: (1, 0), steps: 5 }));
        assert_eq!(n.location, Location::new(2, 1));
        assert_eq!(n.narval_state(), Some(NarvalState::Charging));

        n.step(&[player], &mut map, &mut r);
        assert_eq!(n.location, Location::new(4, 1));
        let step = n.step(&[player], &mut map, &mut r);
        assert_eq!(n.location, Location::new(5, 1));
        assert_eq!(step.charge, Some(ChargeChange::Finished));
        assert_eq!(n.narval_state(), Some(NarvalState::Patrolling));
    }

    #[test]
    fn narval_charge_stops_on_the_player_it_reaches() {
        let mut map = TileMap::new(10, 3);
        let mut n = Enemy::new(EnemyType::Narval, Location::new(1, 1));
        let mut r = rng();
        n.step(&[Location::new(5, 1)], &mut map, &mut r);
        assert_eq!(n.location, Location::new(3, 1));

        // player stepped into the charge lane one cell closer
        let step = n.step(&[Location::new(4, 1)], &mut map, &mut r);
        assert_eq!(n.location, Location::new(4, 1));
        assert!(step.moved);
        assert_eq!(n.narval_state(), Some(NarvalState::Charging));
    }

    #[test]
    fn narval_charge_halts_before_another_enemy() {
        let mut map = TileMap::new(10, 3);
        let mut n = Enemy::new(EnemyType::Narval, Location::new(1, 1));
        let mut r = rng();
        let player = [Location::new(7, 1)];
        let step = n.step_among(&player, &[Location::new(3, 1)], &mut map, &mut r);
        assert_eq!(n.location, Location::new(2, 1));
        assert!(step.moved);
        assert_eq!(step.charge, Some(ChargeChange::Started { dir: (1, 0), steps: 6 }));
        assert_eq!(n.narval_state(), Some(NarvalState::Patrolling));
    }

    #[test]
    fn narval_charge_is_capped() {
        let mut map = TileMap::new(20, 1);
        let mut n = Enemy::new(EnemyType::Narval, Location::new(0, 0));
        let mut r = rng();
        let step = n.step(&[Location::new(10, 0)], &mut map, &mut r);
        assert_eq!(step.charge, Some(ChargeChange::Started { dir: (1, 0), steps: NARVAL_MAX_CHARGE_STEPS }));
    }

    #[test]
    fn narval_breaks_ice_while_charging() {
        let mut map = map_from(&[
            ".*.....",
        ]);
        let mut n = Enemy::new(EnemyType::Narval, Location::new(0, 0));
        let mut r = rng();
        let step = n.step(&[Location::new(6, 0)], &mut map, &mut r);
        assert_eq!(step.broken_ice, vec![Location::new(1, 0)]);
        assert_eq!(n.location, Location::new(2, 0));
        assert_eq!(n.narval_state(), Some(NarvalState::Charging));
    }

    #[test]
    fn narval_aborts_on_wall_and_reverts() {
        let mut map = map_from(&[
            "...#...",
            ".......",
        ]);
        let mut n = Enemy::new(EnemyType::Narval, Location::new(0, 0));
        let mut r = rng();
        let player = Location::new(5, 0);
        n.step(&[player], &mut map, &mut r); // (0,0) → (2,0)
        assert_eq!(n.location, Location::new(2, 0));
        let step = n.step(&[player], &mut map, &mut r);
        assert_eq!(step.charge, Some(ChargeChange::Aborted));
        assert!(!step.moved);
        assert_eq!(n.location, Location::new(2, 0));
        assert_eq!(n.narval_state(), Some(NarvalState::Patrolling));
        assert_eq!(n.direction, (-1, 0)); // inverted
    }

    #[test]
    fn narval_ignores_unaligned_or_distant_players() {
        let mut map = TileMap::new(30, 3);
        let mut n = Enemy::new(EnemyType::Narval, Location::new(0, 1));
        let mut r = rng();
        let step = n.step(&[Location::new(20, 1), Location::new(3, 2)], &mut map, &mut r);
        assert_eq!(step.charge, None);
        assert_eq!(n.location, Location::new(1, 1)); // plain patrol step
    }

    // ── Hooks ──

    #[test]
    fn collision_hook_reverses_troll_and_cancels_charge() {
        let mut r = rng();
        let mut t = Enemy::new(EnemyType::Troll, Location::new(0, 0));
        t.change_direction_on_enemy_collision(&mut r);
        assert_eq!(t.direction, (-1, 0));

        let mut n = Enemy::new(EnemyType::Narval, Location::new(0, 0));
        n.kind = EnemyKind::Narval {
            state: NarvalState::Charging,
            charge_dir: (0, 1),
            steps_remaining: 4,
        };
        n.change_direction_on_enemy_collision(&mut r);
        assert_eq!(n.narval_state(), Some(NarvalState::Patrolling));
        assert_eq!(n.direction, (0, -1));
    }

    #[test]
    fn follow_breaks_ice_only_for_breakers() {
        let mut map = map_from(&[".*."]);
        let mut t = Enemy::new(EnemyType::Troll, Location::new(0, 0));
        assert!(!t.follow((1, 0), &mut map).moved);
        assert!(map.has_ice_wall(Location::new(1, 0)));

        let mut c = Enemy::new(EnemyType::CalamarNaranja, Location::new(0, 0));
        let step = c.follow((1, 0), &mut map);
        assert!(step.moved);
        assert_eq!(step.broken_ice, vec![Location::new(1, 0)]);
    }
}
