//! Telemetry collectors, one per update tier.
//!
//! A collector never fails as a whole: every fault is captured and reported
//! as an error sentinel on the affected fields, so the tick always
//! completes.

mod daily;
mod often;
pub mod outbreak;
pub mod parsers;
mod semi_often;
pub mod shell;
mod static_info;

use std::collections::HashMap;
use std::sync::Arc;

pub use daily::DailyCollector;
pub use often::{format_uptime, OftenCollector};
pub use semi_often::{SemiOftenCollector, DISCONNECTED, ESTABLISHED, NOT_CONNECTED, NO_INTERNET};
pub use static_info::StaticCollector;

use super::clock::ClockTime;
use super::config::Config;
use super::scheduler::Tier;
use super::telemetry::TelemetryBatch;
use crate::error::{Result, StatmonError};

/// Everything a collector may consult besides its own configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectContext {
    /// The tick's wall-clock sample
    pub now: ClockTime,
    /// Slow network-bound work is replaced by `DISABLED`
    pub test_mode: bool,
    /// This Semi-Often run should include the speed test
    pub sample_speed: bool,
    /// The Wi-Fi interface had an address at the last Semi-Often run
    pub wifi_connected: bool,
}

/// Produces one tier's telemetry.
pub trait Collector: Send + Sync {
    fn tier(&self) -> Tier;

    /// Gather the tier's fields. Must not panic or return early on a
    /// fault; failing fields carry a [`crate::core::telemetry::FieldError`].
    fn collect(&self, ctx: &CollectContext) -> TelemetryBatch;
}

/// The collector registered for each tier.
#[derive(Clone, Default)]
pub struct CollectorSet {
    collectors: HashMap<Tier, Arc<dyn Collector>>,
}

impl CollectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The host collectors, configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with(StaticCollector::new(config))
            .with(DailyCollector::new())
            .with(SemiOftenCollector::new(config))
            .with(OftenCollector::new(config))
    }

    /// Register `collector` for its tier, replacing any previous one.
    pub fn with<C: Collector + 'static>(mut self, collector: C) -> Self {
        self.collectors.insert(collector.tier(), Arc::new(collector));
        self
    }

    pub fn get(&self, tier: Tier) -> Result<Arc<dyn Collector>> {
        self.collectors
            .get(&tier)
            .cloned()
            .ok_or_else(|| StatmonError::collector(format!("no collector registered for {} tier", tier)))
    }
}
