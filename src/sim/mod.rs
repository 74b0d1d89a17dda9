//! Level simulation: state, tick, construction, campaign and sessions.
//!
//! Time is always supplied by the caller in milliseconds. Randomness comes
//! from per-level seeded generators, so equal inputs replay identically.

pub mod builder;
pub mod campaign;
pub mod event;
pub mod layout;
pub mod level;
pub mod query;
pub mod save;
pub mod session;
pub mod step;
pub mod timer;

pub use builder::LevelBuilder;
pub use event::{DeathCause, GameEvent};
pub use layout::parse_layout;
pub use level::Level;
pub use query::{CampfireView, EnemyView, FruitView, PlayerView};
pub use save::SessionSnapshot;
pub use session::GameSession;
pub use timer::Countdown;
