//! Simulated Clock
//!
//! One tick advances one simulated minute; sixty ticks roll the hour over,
//! which is the signal to create a new block.
//!
//! State machine:
//!   Running ──set_paused(true)──▶ Paused
//!   Paused  ──set_paused(false)─▶ Running
//! Ticks are ignored while paused.

use std::fmt;

use crate::config::ClockConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Running,
    Paused,
}

#[derive(Debug, Clone)]
pub struct Clock {
    hour: u8,
    minute: u8,
    state: ClockState,
    initial_hour: u8,
    initial_minute: u8,
}

impl Clock {
    /// Running, at the configured initial time.
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            hour: config.initial_hour % 24,
            minute: config.initial_minute % 60,
            state: ClockState::Running,
            initial_hour: config.initial_hour % 24,
            initial_minute: config.initial_minute % 60,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn is_paused(&self) -> bool {
        self.state == ClockState::Paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.state = if paused {
            ClockState::Paused
        } else {
            ClockState::Running
        };
    }

    /// Advance one minute. Returns `true` exactly when the hour rolled over.
    pub fn tick(&mut self) -> bool {
        if self.is_paused() {
            return false;
        }
        self.minute = (self.minute + 1) % 60;
        if self.minute == 0 {
            self.hour = (self.hour + 1) % 24;
            return true;
        }
        false
    }

    /// Back to the initial time. The running/paused state is kept.
    pub fn reset(&mut self) {
        self.hour = self.initial_hour;
        self.minute = self.initial_minute;
    }
}

impl fmt::Display for Clock {
    /// `HH:MM`, 24-hour.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
