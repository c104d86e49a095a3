//! Identity information that does not change while running.

use std::time::Duration;

use sysinfo::System;

use super::parsers::parse_mac_address;
use super::shell;
use super::{CollectContext, Collector};
use crate::core::config::Config;
use crate::core::scheduler::Tier;
use crate::core::telemetry::{Field, FieldError, FieldValue, TelemetryBatch};

const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

pub struct StaticCollector {
    lan_interface: String,
    wifi_interface: String,
}

impl StaticCollector {
    pub fn new(config: &Config) -> Self {
        Self {
            lan_interface: config.lan_interface.clone(),
            wifi_interface: config.wifi_interface.clone(),
        }
    }

    fn mac_address(interface: &str) -> FieldValue {
        shell::run("ip", &["addr", "show", interface], COMMAND_TIMEOUT)
            .and_then(|out| parse_mac_address(&out).ok_or(FieldError::Malformed))
            .map(FieldValue::Text)
            .into()
    }
}

impl Collector for StaticCollector {
    fn tier(&self) -> Tier {
        Tier::Static
    }

    fn collect(&self, _ctx: &CollectContext) -> TelemetryBatch {
        let mut batch = TelemetryBatch::new(Tier::Static);

        let hostname = System::host_name()
            .map(FieldValue::Text)
            .unwrap_or(FieldValue::Error(FieldError::Unavailable));
        batch.push(Field::Hostname, hostname);

        let kernel: FieldValue = shell::run("uname", &["-sr"], COMMAND_TIMEOUT)
            .map(|out| FieldValue::text(out.trim()))
            .into();
        batch.push(Field::Kernel, kernel);

        batch.push(Field::LanMac, Self::mac_address(&self.lan_interface));
        batch.push(Field::WifiMac, Self::mac_address(&self.wifi_interface));

        batch
    }
}
