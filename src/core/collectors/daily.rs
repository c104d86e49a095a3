//! Once-a-day work: refreshing the package index and counting upgrades.

use std::time::Duration;

use super::parsers::count_upgradable;
use super::shell;
use super::{CollectContext, Collector};
use crate::core::scheduler::Tier;
use crate::core::telemetry::{Field, FieldError, FieldValue, TelemetryBatch};

const APT_UPDATE_TIMEOUT: Duration = Duration::from_secs(300);
const APT_LIST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
pub struct DailyCollector;

impl DailyCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Collector for DailyCollector {
    fn tier(&self) -> Tier {
        Tier::Daily
    }

    fn collect(&self, ctx: &CollectContext) -> TelemetryBatch {
        let mut batch = TelemetryBatch::new(Tier::Daily);

        if ctx.test_mode {
            batch.push(Field::UpdateCount, FieldValue::Error(FieldError::Disabled));
            return batch;
        }

        // `-n`: never prompt for a password on the dashboard's terminal.
        // A failed index refresh still leaves a usable (older) package list.
        if let Err(e) = shell::run("sudo", &["-n", "apt-get", "update"], APT_UPDATE_TIMEOUT) {
            log::warn!("apt-get update failed: {:?}", e);
        }

        let count: FieldValue = shell::run("apt", &["list", "--upgradable"], APT_LIST_TIMEOUT)
            .map(|out| FieldValue::Int(count_upgradable(&out) as i64))
            .into();
        batch.push(Field::UpdateCount, count);

        batch
    }
}
