/// Fruits: the pickups that drive level completion.
///
/// One struct, one closed `FruitKind` carrying per-kind state:
///   - Banana, Grapes — static.
///   - Cherry — teleports to a random valid cell on a fixed interval.
///   - Pineapple — random walk, re-rolls when blocked or on a 20% coin.
///   - Cactus — toggles spikes on a fixed interval; spiked = lethal.
///
/// Map-aware kinds (Cherry, Pineapple) only move once `attach` has been
/// called; the map itself is passed into `update` each tick.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Movable;
use super::location::{Location, CARDINALS};
use super::tile::TileMap;

pub const CHERRY_TELEPORT_ATTEMPTS: u32 = 100;
pub const PINEAPPLE_REROLL_CHANCE: f64 = 0.2;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum FruitType {
    Banana,
    Grapes,
    Cherry,
    Pineapple,
    Cactus,
}

impl FruitType {
    pub const ALL: [FruitType; 5] = [
        FruitType::Banana,
        FruitType::Grapes,
        FruitType::Cherry,
        FruitType::Pineapple,
        FruitType::Cactus,
    ];

    pub fn points(self) -> u32 {
        match self {
            FruitType::Banana => 100,
            FruitType::Grapes => 50,
            FruitType::Cherry => 150,
            FruitType::Pineapple => 200,
            FruitType::Cactus => 250,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FruitType::Banana => "Banana",
            FruitType::Grapes => "Grapes",
            FruitType::Cherry => "Cherry",
            FruitType::Pineapple => "Pineapple",
            FruitType::Cactus => "Cactus",
        }
    }

    pub fn can_move(self) -> bool {
        matches!(self, FruitType::Cherry | FruitType::Pineapple)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FruitKind {
    Banana,
    Grapes,
    Cherry { last_teleport: u64 },
    Pineapple { dir: (i32, i32) },
    Cactus { spikes: bool, last_toggle: u64 },
}

/// What a fruit did during `update`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FruitChange {
    Moved { from: Location, to: Location },
    Teleported { from: Location, to: Location },
    SpikesToggled { spikes: bool },
}

/// Interval settings the fruits need; a slice of `config::Timing`.
#[derive(Clone, Copy, Debug)]
pub struct FruitTiming {
    pub cherry_teleport_ms: u64,
    pub cactus_toggle_ms: u64,
}

#[derive(Clone, Debug)]
pub struct Fruit {
    pub name: String,
    pub location: Location,
    pub points: u32,
    pub kind: FruitKind,
    collected: bool,
    attached: bool,
}

impl Fruit {
    pub fn new(fruit_type: FruitType, location: Location) -> Self {
        let kind = match fruit_type {
            FruitType::Banana => FruitKind::Banana,
            FruitType::Grapes => FruitKind::Grapes,
            FruitType::Cherry => FruitKind::Cherry { last_teleport: 0 },
            FruitType::Pineapple => FruitKind::Pineapple { dir: (0, 0) },
            FruitType::Cactus => FruitKind::Cactus { spikes: false, last_toggle: 0 },
        };
        Fruit {
            name: fruit_type.name().to_string(),
            location,
            points: fruit_type.points(),
            kind,
            collected: false,
            attached: false,
        }
    }

    pub fn fruit_type(&self) -> FruitType {
        match self.kind {
            FruitKind::Banana => FruitType::Banana,
            FruitKind::Grapes => FruitType::Grapes,
            FruitKind::Cherry { .. } => FruitType::Cherry,
            FruitKind::Pineapple { .. } => FruitType::Pineapple,
            FruitKind::Cactus { .. } => FruitType::Cactus,
        }
    }

    pub fn can_move(&self) -> bool {
        self.fruit_type().can_move()
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    pub fn has_spikes(&self) -> bool {
        matches!(self.kind, FruitKind::Cactus { spikes: true, .. })
    }

    /// Spiked and still on the board.
    pub fn is_lethal(&self) -> bool {
        !self.collected && self.has_spikes()
    }

    /// Award points once. Later calls return 0.
    pub fn collect(&mut self) -> u32 {
        if self.collected {
            return 0;
        }
        self.collected = true;
        self.points
    }

    /// Mark collected without scoring (snapshot restore).
    pub fn mark_collected(&mut self) {
        self.collected = true;
    }

    /// Bind to the level's map and start the kind's timers at `now`.
    pub fn attach(&mut self, now: u64) {
        self.attached = true;
        match &mut self.kind {
            FruitKind::Cherry { last_teleport } => *last_teleport = now,
            FruitKind::Cactus { last_toggle, .. } => *last_toggle = now,
            _ => {}
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Advance time-based and movement behaviour by one tick.
    ///
    /// `occupied` refuses cells held by other entities.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        map: &TileMap,
        now: u64,
        timing: FruitTiming,
        occupied: impl Fn(Location) -> bool,
        rng: &mut R,
    ) -> Option<FruitChange> {
        if self.collected {
            return None;
        }
        let here = self.location;
        match &mut self.kind {
            FruitKind::Banana | FruitKind::Grapes => None,
            FruitKind::Cactus { spikes, last_toggle } => {
                if now.saturating_sub(*last_toggle) >= timing.cactus_toggle_ms {
                    *spikes = !*spikes;
                    *last_toggle = now;
                    Some(FruitChange::SpikesToggled { spikes: *spikes })
                } else {
                    None
                }
            }
            FruitKind::Cherry { last_teleport } => {
                if !self.attached || now.saturating_sub(*last_teleport) < timing.cherry_teleport_ms {
                    return None;
                }
                *last_teleport = now;
                let target = map.random_valid_location(rng, CHERRY_TELEPORT_ATTEMPTS, |l| {
                    l == here || occupied(l)
                })?;
                self.location = target;
                Some(FruitChange::Teleported { from: here, to: target })
            }
            FruitKind::Pineapple { dir } => {
                if !self.attached {
                    return None;
                }
                if *dir == (0, 0) {
                    *dir = CARDINALS[rng.random_range(0..CARDINALS.len())];
                }
                let next = here.step(*dir);
                if map.is_valid_position(next) && !occupied(next) {
                    if rng.random_bool(PINEAPPLE_REROLL_CHANCE) {
                        *dir = CARDINALS[rng.random_range(0..CARDINALS.len())];
                    }
                    self.location = next;
                    Some(FruitChange::Moved { from: here, to: next })
                } else {
                    *dir = CARDINALS[rng.random_range(0..CARDINALS.len())];
                    None
                }
            }
        }
    }
}

impl Movable for Fruit {
    fn location(&self) -> Location {
        self.location
    }

    fn set_location(&mut self, loc: Location) {
        self.location = loc;
    }
}
