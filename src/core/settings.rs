//! User-adjustable cadences and their validation rules.
//!
//! Settings are edited through a [`SettingsEdit`] draft. Nothing reaches the
//! live [`Settings`] until the draft is committed, so cancelling after some
//! fields already validated still restores every field.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Allowed tick interval, in seconds.
pub const TICK_INTERVAL_RANGE: RangeInclusive<u64> = 1..=59;
/// Allowed Semi-Often interval, in minutes (must stay below the daily tolerance).
pub const SEMI_INTERVAL_RANGE: RangeInclusive<u32> = 1..=1420;
/// Allowed speed-test cadence, in Semi-Often runs.
pub const SPEEDTEST_EVERY_RANGE: RangeInclusive<u32> = 1..=9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Sleep between ticks, seconds
    pub tick_interval_secs: u64,
    /// Minutes between Semi-Often runs
    pub semi_interval_mins: u32,
    /// Speed test runs once every N Semi-Often runs
    pub speedtest_every: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_secs: 5,
            semi_interval_mins: 10,
            speedtest_every: 4,
        }
    }
}

impl Settings {
    /// Replace every out-of-range value with its default.
    pub fn sanitized(self) -> Self {
        let defaults = Settings::default();
        Self {
            tick_interval_secs: if TICK_INTERVAL_RANGE.contains(&self.tick_interval_secs) {
                self.tick_interval_secs
            } else {
                defaults.tick_interval_secs
            },
            semi_interval_mins: if SEMI_INTERVAL_RANGE.contains(&self.semi_interval_mins) {
                self.semi_interval_mins
            } else {
                defaults.semi_interval_mins
            },
            speedtest_every: if SPEEDTEST_EVERY_RANGE.contains(&self.speedtest_every) {
                self.speedtest_every
            } else {
                defaults.speedtest_every
            },
        }
    }
}

/// Parse a tick interval typed by the user.
pub fn parse_tick_interval(input: &str) -> Option<u64> {
    input
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|v| TICK_INTERVAL_RANGE.contains(v))
}

/// Parse a Semi-Often interval typed by the user.
pub fn parse_semi_interval(input: &str) -> Option<u32> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|v| SEMI_INTERVAL_RANGE.contains(v))
}

/// Parse a speed-test cadence typed by the user.
pub fn parse_speedtest_every(input: &str) -> Option<u32> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|v| SPEEDTEST_EVERY_RANGE.contains(v))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    TickInterval,
    SemiInterval,
    SpeedtestEvery,
}

impl SettingField {
    pub const ALL: [SettingField; 3] = [
        SettingField::TickInterval,
        SettingField::SemiInterval,
        SettingField::SpeedtestEvery,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingField::TickInterval => "update interval",
            SettingField::SemiInterval => "semi interval",
            SettingField::SpeedtestEvery => "internet interval",
        }
    }
}

/// A validated change waiting for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingChange {
    pub field: SettingField,
    pub old: u64,
    pub new: u64,
}

/// Draft of a settings edit.
#[derive(Debug, Clone)]
pub struct SettingsEdit {
    original: Settings,
    draft: Settings,
    changes: Vec<SettingChange>,
}

impl SettingsEdit {
    pub fn new(original: Settings) -> Self {
        Self {
            original,
            draft: original,
            changes: Vec::new(),
        }
    }

    pub fn original(&self) -> Settings {
        self.original
    }

    /// Offer raw text for a field. Returns whether it validated.
    ///
    /// Empty, non-numeric or out-of-range input leaves the field unchanged.
    pub fn submit(&mut self, field: SettingField, input: &str) -> bool {
        let (old, new) = match field {
            SettingField::TickInterval => match parse_tick_interval(input) {
                Some(v) => {
                    let old = self.draft.tick_interval_secs;
                    self.draft.tick_interval_secs = v;
                    (old, v)
                }
                None => return false,
            },
            SettingField::SemiInterval => match parse_semi_interval(input) {
                Some(v) => {
                    let old = self.draft.semi_interval_mins;
                    self.draft.semi_interval_mins = v;
                    (u64::from(old), u64::from(v))
                }
                None => return false,
            },
            SettingField::SpeedtestEvery => match parse_speedtest_every(input) {
                Some(v) => {
                    let old = self.draft.speedtest_every;
                    self.draft.speedtest_every = v;
                    (u64::from(old), u64::from(v))
                }
                None => return false,
            },
        };
        self.changes.retain(|c| c.field != field);
        self.changes.push(SettingChange { field, old, new });
        true
    }

    /// Validated changes, in submission order.
    pub fn changes(&self) -> &[SettingChange] {
        &self.changes
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Accept the draft.
    pub fn commit(self) -> Settings {
        self.draft
    }

    /// Drop the draft; every field reverts.
    pub fn cancel(self) -> Settings {
        self.original
    }
}
