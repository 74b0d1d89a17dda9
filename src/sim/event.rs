/// Events emitted while the level changes.
/// Hosts drain these for animation, sound or logging.

use serde::Serialize;

use crate::domain::enemy::ChargeChange;
use crate::domain::location::Location;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum DeathCause {
    Enemy,
    Campfire,
    Cactus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum GameEvent {
    FruitCollected { player: usize, name: String, location: Location, points: u32 },
    PlayerKilled { player: usize, location: Location, cause: DeathCause },
    IceCreated { location: Location },
    IceBroken { location: Location },
    IceMelted { location: Location },
    CampfireExtinguished { location: Location },
    CampfireRelit { location: Location },
    CherryTeleported { from: Location, to: Location },
    FruitMoved { from: Location, to: Location },
    CactusToggled { location: Location, spikes: bool },
    NarvalCharge { enemy: usize, change: ChargeChange },
    WaveStarted { wave: usize, fruits: usize },
    LevelCompleted { score: u32 },
    TimeUp,
    GameOver,
}
