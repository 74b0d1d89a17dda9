/// Map overlays that are not cell states: hot tiles and campfires.
///
/// Hot tiles are permanent and stateless (ice placed on them melts).
/// Campfires burn a player standing on them while lit; breaking ice that
/// covers a lit campfire puts it out until the relight delay elapses.

use serde::{Deserialize, Serialize};

use super::location::Location;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campfire {
    pub location: Location,
    pub lit: bool,
    /// Clock value (ms) when the fire was put out; `None` while lit.
    pub extinguished_at: Option<u64>,
}

impl Campfire {
    pub fn new(location: Location) -> Self {
        Campfire { location, lit: true, extinguished_at: None }
    }

    pub fn extinguish(&mut self, now: u64) {
        if self.lit {
            self.lit = false;
            self.extinguished_at = Some(now);
        }
    }

    /// Relight once `relight_ms` has passed. Returns true on the tick it relights.
    pub fn update(&mut self, now: u64, relight_ms: u64) -> bool {
        match self.extinguished_at {
            Some(at) if !self.lit && now.saturating_sub(at) >= relight_ms => {
                self.lit = true;
                self.extinguished_at = None;
                true
            }
            _ => false,
        }
    }

    /// Milliseconds until relight; 0 while lit.
    pub fn relight_remaining_ms(&self, now: u64, relight_ms: u64) -> u64 {
        match self.extinguished_at {
            Some(at) if !self.lit => relight_ms.saturating_sub(now.saturating_sub(at)),
            _ => 0,
        }
    }
}
