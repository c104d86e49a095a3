//! Fast-changing host status, refreshed on every tick.

use std::fs;
use std::time::Duration;

use parking_lot::Mutex;
use sysinfo::{Components, MemoryRefreshKind, ProcessesToUpdate, System};

use super::parsers::{parse_iwconfig, parse_thermal_millidegrees};
use super::shell;
use super::{CollectContext, Collector};
use crate::core::config::Config;
use crate::core::scheduler::Tier;
use crate::core::telemetry::{Field, FieldError, FieldValue, TelemetryBatch};

const THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";
const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);
const MIB: u64 = 1024 * 1024;

/// "2 days, 3 hours, 4 minutes"; zero components are left out.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;

    let unit = |n: u64, name: &str| {
        if n == 1 {
            format!("1 {}", name)
        } else {
            format!("{} {}s", n, name)
        }
    };

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(unit(days, "day"));
    }
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 || parts.is_empty() {
        parts.push(unit(minutes, "minute"));
    }
    parts.join(", ")
}

pub struct OftenCollector {
    system: Mutex<System>,
    wifi_interface: String,
}

impl OftenCollector {
    pub fn new(config: &Config) -> Self {
        Self {
            system: Mutex::new(System::new()),
            wifi_interface: config.wifi_interface.clone(),
        }
    }

    fn cpu_temperature() -> FieldValue {
        if let Some(celsius) = fs::read_to_string(THERMAL_ZONE)
            .ok()
            .and_then(|raw| parse_thermal_millidegrees(&raw))
        {
            return FieldValue::Float(celsius);
        }

        let components = Components::new_with_refreshed_list();
        components
            .iter()
            .filter_map(|c| c.temperature())
            .reduce(f32::max)
            .map(|t| FieldValue::Float((t as f64 * 10.0).round() / 10.0))
            .unwrap_or(FieldValue::Error(FieldError::Unavailable))
    }

    fn push_wifi(&self, batch: &mut TelemetryBatch, connected: bool) {
        if !connected {
            batch.push(Field::Essid, FieldValue::text("Nothing"));
            batch.push(Field::SignalLevel, FieldValue::text("N/A"));
            batch.push(Field::SignalQuality, FieldValue::text("N/A"));
            return;
        }

        match shell::run("iwconfig", &[self.wifi_interface.as_str()], COMMAND_TIMEOUT) {
            Ok(out) => {
                let link = parse_iwconfig(&out);
                batch.push(
                    Field::Essid,
                    link.essid
                        .map(FieldValue::Text)
                        .unwrap_or(FieldValue::Error(FieldError::Malformed)),
                );
                batch.push(
                    Field::SignalLevel,
                    link.signal_level
                        .map(FieldValue::Text)
                        .unwrap_or(FieldValue::Error(FieldError::Malformed)),
                );
                batch.push(
                    Field::SignalQuality,
                    link.quality_percent
                        .map(|q| FieldValue::Int(q as i64))
                        .unwrap_or(FieldValue::Error(FieldError::Malformed)),
                );
            }
            Err(e) => {
                for field in [Field::Essid, Field::SignalLevel, Field::SignalQuality] {
                    batch.push(field, FieldValue::Error(e));
                }
            }
        }
    }
}

impl Collector for OftenCollector {
    fn tier(&self) -> Tier {
        Tier::Often
    }

    fn collect(&self, ctx: &CollectContext) -> TelemetryBatch {
        let mut batch = TelemetryBatch::new(Tier::Often);

        batch.push(Field::Time, FieldValue::Text(ctx.now.to_string()));
        batch.push(Field::Uptime, FieldValue::Text(format_uptime(System::uptime())));

        {
            let mut system = self.system.lock();
            system.refresh_processes(ProcessesToUpdate::All, true);
            system.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());

            batch.push(Field::Processes, FieldValue::Int(system.processes().len() as i64));
            batch.push(Field::MemUsed, FieldValue::Int((system.used_memory() / MIB) as i64));
            batch.push(Field::MemTotal, FieldValue::Int((system.total_memory() / MIB) as i64));
        }

        batch.push(Field::CpuTemp, Self::cpu_temperature());
        self.push_wifi(&mut batch, ctx.wifi_connected);

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ClockTime;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0 minutes");
        assert_eq!(format_uptime(59), "0 minutes");
        assert_eq!(format_uptime(60), "1 minute");
        assert_eq!(format_uptime(3_600), "1 hour");
        assert_eq!(format_uptime(2 * 86_400 + 3 * 3_600 + 4 * 60), "2 days, 3 hours, 4 minutes");
        assert_eq!(format_uptime(86_400 + 60), "1 day, 1 minute");
    }

    #[test]
    fn test_disconnected_wifi_placeholders() {
        let collector = OftenCollector::new(&Config::default());
        let mut batch = TelemetryBatch::new(Tier::Often);
        collector.push_wifi(&mut batch, false);
        assert_eq!(batch.get(Field::Essid), Some(&FieldValue::text("Nothing")));
        assert_eq!(batch.get(Field::SignalQuality), Some(&FieldValue::text("N/A")));
    }

    #[test]
    fn test_collect_reports_time_and_memory() {
        let collector = OftenCollector::new(&Config::default());
        let ctx = CollectContext {
            now: ClockTime::new(7, 5).unwrap(),
            test_mode: true,
            sample_speed: false,
            wifi_connected: false,
        };
        let batch = collector.collect(&ctx);
        assert_eq!(batch.tier, Tier::Often);
        assert_eq!(batch.get(Field::Time), Some(&FieldValue::text("07:05")));
        assert!(batch.get(Field::MemTotal).and_then(FieldValue::as_i64).is_some());
    }
}
