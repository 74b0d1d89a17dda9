/// Level countdown.
///
/// Pull-based: nothing runs in the background; every query takes the
/// current clock value. Time spent paused does not count.
///
///   running ──pause──▶ paused ──resume──▶ running
///      │                                     │
///      └──────── elapsed ≥ limit ───────────▶ expired (terminal)

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    limit_ms: u64,
    started_at: u64,
    /// Elapsed time carried in from a restored snapshot.
    carried_ms: u64,
    paused_total: u64,
    paused_at: Option<u64>,
    expired: bool,
}

impl Countdown {
    pub fn new(limit_ms: u64, now: u64) -> Self {
        Countdown {
            limit_ms,
            started_at: now,
            carried_ms: 0,
            paused_total: 0,
            paused_at: None,
            expired: false,
        }
    }

    /// A countdown that already has `remaining_ms` left at `now`.
    pub fn resumed(limit_ms: u64, remaining_ms: u64, now: u64) -> Self {
        let mut t = Countdown::new(limit_ms, now);
        t.carried_ms = limit_ms.saturating_sub(remaining_ms);
        t
    }

    pub fn limit_ms(&self) -> u64 {
        self.limit_ms
    }

    /// Active (unpaused) time since start.
    pub fn elapsed_ms(&self, now: u64) -> u64 {
        let end = self.paused_at.unwrap_or(now).max(self.started_at);
        let running = (end - self.started_at).saturating_sub(self.paused_total);
        self.carried_ms + running
    }

    pub fn remaining_ms(&self, now: u64) -> u64 {
        if self.expired {
            return 0;
        }
        self.limit_ms.saturating_sub(self.elapsed_ms(now))
    }

    /// Rounded up, so 0 appears exactly when the limit is reached.
    pub fn remaining_seconds(&self, now: u64) -> u64 {
        self.remaining_ms(now).div_ceil(1000)
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Returns false when already paused or expired.
    pub fn pause(&mut self, now: u64) -> bool {
        if self.expired || self.paused_at.is_some() {
            return false;
        }
        self.paused_at = Some(now.max(self.started_at));
        true
    }

    pub fn resume(&mut self, now: u64) -> bool {
        let Some(at) = self.paused_at.take() else { return false };
        self.paused_total += now.max(at) - at;
        true
    }

    /// Latch expiry. True only on the call that expires the timer.
    pub fn update(&mut self, now: u64) -> bool {
        if self.expired || self.is_paused() {
            return false;
        }
        if self.elapsed_ms(now) >= self.limit_ms {
            self.expired = true;
            return true;
        }
        false
    }
}
