//! Tiered update scheduler.
//!
//! Four tiers refresh at different cadences:
//!
//! - **Static** runs at startup and when the user asks for it.
//! - **Daily** runs once more than [`DAILY_THRESHOLD_MINS`] passed.
//! - **Semi-Often** runs once more than the configured interval passed.
//! - **Often** runs every tick.
//!
//! Each tick the main loop asks for a [`TickPlan`]; once a tier's batch has
//! been applied it reports back with [`Scheduler::record_run`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::clock::{has_elapsed, minutes_until, ClockTime};
use super::settings::Settings;

/// A full day minus a 20 minute tolerance, so drift in the tick cadence
/// neither skips a day nor fires twice in one.
pub const DAILY_THRESHOLD_MINS: u32 = 1420;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Static,
    Daily,
    SemiOften,
    Often,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Static, Tier::Daily, Tier::SemiOften, Tier::Often];

    fn index(self) -> usize {
        match self {
            Tier::Static => 0,
            Tier::Daily => 1,
            Tier::SemiOften => 2,
            Tier::Often => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Static => "static",
            Tier::Daily => "daily",
            Tier::SemiOften => "semi-often",
            Tier::Often => "often",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tiers the user asked to refresh regardless of elapsed time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForcedTiers {
    pub static_info: bool,
    pub daily: bool,
    pub semi_often: bool,
}

impl ForcedTiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            static_info: true,
            daily: true,
            semi_often: true,
        }
    }

    pub fn only(tier: Tier) -> Self {
        let mut forced = Self::none();
        match tier {
            Tier::Static => forced.static_info = true,
            Tier::Daily => forced.daily = true,
            Tier::SemiOften => forced.semi_often = true,
            Tier::Often => {}
        }
        forced
    }

    pub fn is_empty(&self) -> bool {
        !(self.static_info || self.daily || self.semi_often)
    }

    pub fn contains(&self, tier: Tier) -> bool {
        match tier {
            Tier::Static => self.static_info,
            Tier::Daily => self.daily,
            Tier::SemiOften => self.semi_often,
            Tier::Often => false,
        }
    }

    pub fn insert(&mut self, tier: Tier) {
        *self = self.union(Self::only(tier));
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            static_info: self.static_info || other.static_info,
            daily: self.daily || other.daily,
            semi_often: self.semi_often || other.semi_often,
        }
    }
}

/// The soonest of the two long-period tiers, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextUpdate {
    pub tier: Tier,
    pub minutes: i64,
}

/// Which tiers run this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickPlan {
    pub now: ClockTime,
    pub run_static: bool,
    pub run_daily: bool,
    pub run_semi_often: bool,
    pub next: Option<NextUpdate>,
}

impl TickPlan {
    /// Tiers to run, in execution order. Often is always first.
    pub fn tiers(&self) -> Vec<Tier> {
        let mut tiers = vec![Tier::Often];
        if self.run_semi_often {
            tiers.push(Tier::SemiOften);
        }
        if self.run_daily {
            tiers.push(Tier::Daily);
        }
        if self.run_static {
            tiers.push(Tier::Static);
        }
        tiers
    }

    pub fn runs(&self, tier: Tier) -> bool {
        match tier {
            Tier::Static => self.run_static,
            Tier::Daily => self.run_daily,
            Tier::SemiOften => self.run_semi_often,
            Tier::Often => true,
        }
    }
}

/// Counts Semi-Often runs to decide when the speed test is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedCadence {
    every: u32,
    count: u32,
}

impl SpeedCadence {
    /// Starts saturated so the first Semi-Often run samples.
    pub fn new(every: u32) -> Self {
        Self { every, count: every }
    }

    pub fn every(&self) -> u32 {
        self.every
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn set_every(&mut self, every: u32) {
        self.every = every;
    }

    /// Advance for one Semi-Often run. Returns true if this run samples.
    pub fn advance(&mut self) -> bool {
        if self.count >= self.every {
            self.count = 1;
            true
        } else {
            self.count += 1;
            false
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    last_run: [Option<ClockTime>; 4],
    semi_interval_mins: u32,
    speed: SpeedCadence,
}

impl Scheduler {
    pub fn new(settings: &Settings) -> Self {
        Self {
            last_run: [None; 4],
            semi_interval_mins: settings.semi_interval_mins,
            speed: SpeedCadence::new(settings.speedtest_every),
        }
    }

    /// Pick up new cadences after a settings commit.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.semi_interval_mins = settings.semi_interval_mins;
        self.speed.set_every(settings.speedtest_every);
    }

    pub fn semi_interval_mins(&self) -> u32 {
        self.semi_interval_mins
    }

    pub fn speed_cadence(&self) -> SpeedCadence {
        self.speed
    }

    pub fn last_run(&self, tier: Tier) -> Option<ClockTime> {
        self.last_run[tier.index()]
    }

    pub fn record_run(&mut self, tier: Tier, at: ClockTime) {
        log::debug!("{} tier completed at {}", tier, at);
        self.last_run[tier.index()] = Some(at);
    }

    /// Consume one Semi-Often run from the speed-test cadence.
    pub fn take_speed_sample(&mut self) -> bool {
        self.speed.advance()
    }

    /// Elapsed-time decision for one tier. A tier that never completed is
    /// not due; it only runs when forced (startup forces every tier).
    pub fn is_due(&self, tier: Tier, now: ClockTime) -> bool {
        match tier {
            Tier::Static => false,
            Tier::Often => true,
            Tier::Daily => self
                .last_run(Tier::Daily)
                .is_some_and(|last| has_elapsed(now, last, DAILY_THRESHOLD_MINS)),
            Tier::SemiOften => self
                .last_run(Tier::SemiOften)
                .is_some_and(|last| has_elapsed(now, last, self.semi_interval_mins)),
        }
    }

    /// Time until the next Daily or Semi-Often run. Ties go to Daily.
    pub fn predict(&self, now: ClockTime) -> Option<NextUpdate> {
        let daily = self.last_run(Tier::Daily).map(|last| NextUpdate {
            tier: Tier::Daily,
            minutes: minutes_until(now, last, DAILY_THRESHOLD_MINS),
        });
        let semi = self.last_run(Tier::SemiOften).map(|last| NextUpdate {
            tier: Tier::SemiOften,
            minutes: minutes_until(now, last, self.semi_interval_mins),
        });
        match (daily, semi) {
            (Some(d), Some(s)) => Some(if d.minutes <= s.minutes { d } else { s }),
            (d, s) => d.or(s),
        }
    }

    /// Decide this tick's work. Forced tiers skip the elapsed-time check.
    pub fn plan(&self, now: ClockTime, forced: ForcedTiers) -> TickPlan {
        let plan = TickPlan {
            now,
            run_static: forced.static_info,
            run_daily: forced.daily || self.is_due(Tier::Daily, now),
            run_semi_often: forced.semi_often || self.is_due(Tier::SemiOften, now),
            next: self.predict(now),
        };
        log::debug!(
            "tick {}: semi={} daily={} static={} next={:?}",
            now,
            plan.run_semi_often,
            plan.run_daily,
            plan.run_static,
            plan.next
        );
        plan
    }
}
