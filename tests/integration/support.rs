//! Scripted collectors and a dashboard wired to an in-memory canvas.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use statmon::core::clock::ClockTime;
use statmon::core::collectors::{CollectContext, Collector, CollectorSet, ESTABLISHED};
use statmon::core::executor::InlineExecutor;
use statmon::core::scheduler::Tier;
use statmon::core::telemetry::{Field, FieldValue, TelemetryBatch};
use statmon::ui::dashboard::{Dashboard, DashboardOptions};
use statmon::ui::Canvas;

pub fn t(hour: u8, minute: u8) -> ClockTime {
    ClockTime::new(hour, minute).unwrap()
}

/// Returns the same values on every run and counts its runs.
pub struct ScriptedCollector {
    tier: Tier,
    values: Vec<(Field, FieldValue)>,
    pub runs: Arc<AtomicUsize>,
    pub contexts: Arc<Mutex<Vec<CollectContext>>>,
}

impl ScriptedCollector {
    pub fn new(tier: Tier, values: Vec<(Field, FieldValue)>) -> Self {
        Self {
            tier,
            values,
            runs: Arc::new(AtomicUsize::new(0)),
            contexts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Collector for ScriptedCollector {
    fn tier(&self) -> Tier {
        self.tier
    }

    fn collect(&self, ctx: &CollectContext) -> TelemetryBatch {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().push(*ctx);
        let mut batch = TelemetryBatch::new(self.tier);
        for (field, value) in &self.values {
            batch.push(*field, value.clone());
        }
        batch
    }
}

pub fn scripted_set() -> CollectorSet {
    CollectorSet::new()
        .with(ScriptedCollector::new(
            Tier::Static,
            vec![
                (Field::Hostname, FieldValue::text("pi-desk")),
                (Field::Kernel, FieldValue::text("Linux 6.1.21")),
                (Field::LanMac, FieldValue::text("b8:27:eb:00:00:01")),
                (Field::WifiMac, FieldValue::text("b8:27:eb:00:00:02")),
            ],
        ))
        .with(ScriptedCollector::new(
            Tier::Daily,
            vec![(Field::UpdateCount, FieldValue::Int(3))],
        ))
        .with(ScriptedCollector::new(
            Tier::SemiOften,
            vec![
                (Field::InternetAccess, FieldValue::text(ESTABLISHED)),
                (Field::LanIp, FieldValue::text("192.168.1.20")),
                (Field::WlanIp, FieldValue::text("192.168.1.21")),
            ],
        ))
        .with(ScriptedCollector::new(
            Tier::Often,
            vec![
                (Field::Time, FieldValue::text("10:00")),
                (Field::Processes, FieldValue::Int(112)),
                (Field::MemUsed, FieldValue::Int(512)),
                (Field::MemTotal, FieldValue::Int(1024)),
            ],
        ))
}

pub fn options() -> DashboardOptions {
    DashboardOptions {
        banner_pause: Duration::ZERO,
        version: "0.9.0".to_string(),
        ..DashboardOptions::default()
    }
}

pub fn dashboard_with(collectors: CollectorSet) -> Dashboard<Canvas> {
    Dashboard::new(
        Canvas::new(),
        collectors,
        Box::new(InlineExecutor::new()),
        options(),
    )
}

pub fn dashboard() -> Dashboard<Canvas> {
    dashboard_with(scripted_set())
}
