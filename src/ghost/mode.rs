use std::time::Duration;

use strum_macros::{AsRefStr, Display};

use crate::constants::TICKS_PER_SECOND;

/// A ghost's behavioral state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum GhostMode {
    #[default]
    InHouse,
    Scatter,
    Chase,
    Frightened,
    Dead,
}

impl GhostMode {
    /// Modes that follow the global scatter/chase waves and can be frightened.
    pub const fn is_roaming(self) -> bool {
        matches!(self, GhostMode::Scatter | GhostMode::Chase)
    }
}

/// A tick countdown. An indefinite countdown never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Ticks(u32),
    Indefinite,
}

impl Default for Countdown {
    fn default() -> Self {
        Countdown::Ticks(0)
    }
}

impl Countdown {
    pub const fn ticks(ticks: u32) -> Self {
        Countdown::Ticks(ticks)
    }

    /// Converts a wall-clock duration at the fixed tick rate, rounding down.
    pub fn from_duration(duration: Duration) -> Self {
        Countdown::Ticks((duration.as_secs_f64() * TICKS_PER_SECOND as f64) as u32)
    }

    /// Counts down by one tick, saturating at zero.
    pub fn tick(&mut self) {
        if let Countdown::Ticks(remaining) = self {
            *remaining = remaining.saturating_sub(1);
        }
    }

    pub const fn expired(&self) -> bool {
        matches!(self, Countdown::Ticks(0))
    }

    /// Ticks left, or `None` when indefinite.
    pub const fn remaining(&self) -> Option<u32> {
        match self {
            Countdown::Ticks(remaining) => Some(*remaining),
            Countdown::Indefinite => None,
        }
    }

    /// Shortens the countdown to at most `max` ticks.
    pub fn cap(&mut self, max: u32) {
        match self {
            Countdown::Ticks(remaining) => *remaining = (*remaining).min(max),
            Countdown::Indefinite => *self = Countdown::Ticks(max),
        }
    }

    /// One extra tick, for countdowns armed before their owner ticks in the same frame.
    pub fn padded(self) -> Self {
        match self {
            Countdown::Ticks(remaining) => Countdown::Ticks(remaining.saturating_add(1)),
            Countdown::Indefinite => Countdown::Indefinite,
        }
    }
}
