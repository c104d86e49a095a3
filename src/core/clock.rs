//! Wall-clock arithmetic for the update scheduler.
//!
//! All comparisons work on minutes since midnight. A sample taken "before"
//! the previous one is assumed to have crossed midnight exactly once.

use std::fmt;

use chrono::{Local, Timelike};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock sample with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Build a sample, rejecting out-of-range components.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Sample the local wall clock.
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            hour: now.hour() as u8,
            minute: now.minute() as u8,
        }
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// True iff strictly more than `threshold_minutes` passed since `last_run`.
///
/// When `now` is earlier in the day than `last_run` the day boundary was
/// crossed, so a full day is added to `now` before subtracting.
pub fn has_elapsed(now: ClockTime, last_run: ClockTime, threshold_minutes: u32) -> bool {
    let mut current = now.minutes_since_midnight();
    let last = last_run.minutes_since_midnight();
    if current < last {
        current += MINUTES_PER_DAY;
    }
    current - last > threshold_minutes
}

/// Minutes left until `last_run + interval_minutes`, for display only.
///
/// The due time is not wrapped, so a tier that last ran late in the
/// evening reports more than a day remaining just after midnight, and a
/// tier stale by more than a day reports a negative count. Both values
/// are shown as-is.
pub fn minutes_until(now: ClockTime, last_run: ClockTime, interval_minutes: u32) -> i64 {
    let next_due = i64::from(last_run.minutes_since_midnight()) + i64::from(interval_minutes);
    next_due - i64::from(now.minutes_since_midnight())
}
