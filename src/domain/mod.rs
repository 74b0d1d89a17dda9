//! Game rules that know nothing about levels or sessions: grid, terrain,
//! entities, pathfinding and the AI profiles built on top of them.

pub mod ai;
pub mod enemy;
pub mod entity;
pub mod fruit;
pub mod location;
pub mod obstacle;
pub mod pathfinding;
pub mod rules;
pub mod tile;

pub use ai::{AiView, EnemyProfile, PlayerProfile};
pub use enemy::{Enemy, EnemyType, NarvalState};
pub use entity::{Flavor, Intent, Player};
pub use fruit::{Fruit, FruitType};
pub use location::Location;
pub use obstacle::Campfire;
pub use tile::{Cell, TileMap};
