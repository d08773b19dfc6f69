//! Fixed-interval periodic ticks for a polled loop.
//!
//! The host calls `due(now)` whenever it wakes up (every egui frame, say) and
//! runs the returned number of ticks. A long stall does not replay every
//! missed tick: at most `MAX_CATCH_UP` run and the schedule re-anchors on
//! `now`.

use std::time::{Duration, Instant};

/// Ticks replayed after a stall, at most.
pub const MAX_CATCH_UP: u32 = 4;

#[derive(Debug, Clone)]
pub struct Cadence {
    interval: Duration,
    next_due: Instant,
}

impl Cadence {
    /// First tick falls one `interval` after `start`. `interval` must be non-zero.
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            next_due: start + interval,
        }
    }

    /// Restart the schedule from `start`.
    pub fn rearm(&mut self, start: Instant) {
        self.next_due = start + self.interval;
    }

    /// Number of ticks that came due by `now`, consuming them.
    pub fn due(&mut self, now: Instant) -> u32 {
        if now < self.next_due {
            return 0;
        }
        let behind = now.duration_since(self.next_due);
        let missed = behind.as_nanos() / self.interval.as_nanos().max(1) + 1;
        if missed > u128::from(MAX_CATCH_UP) {
            log::debug!("Cadence {:?} fell {} ticks behind, re-anchoring", self.interval, missed);
            self.rearm(now);
            return MAX_CATCH_UP;
        }
        let ticks = missed as u32;
        self.next_due += self.interval * ticks;
        ticks
    }

    /// Time until the next tick (zero if already due).
    pub fn until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}
