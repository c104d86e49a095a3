//! Network status refreshed every few minutes: addresses, internet access,
//! sampled speed test and outbreak statistics.

use std::time::Duration;

use reqwest::blocking::Client;

use super::outbreak::parse_outbreak_page;
use super::parsers::{parse_interfaces, parse_ipv4, parse_speedtest};
use super::shell;
use super::{CollectContext, Collector};
use crate::core::config::Config;
use crate::core::scheduler::Tier;
use crate::core::telemetry::{Field, FieldError, FieldValue, TelemetryBatch};

pub const ESTABLISHED: &str = "Established";
pub const DISCONNECTED: &str = "Disconnected";
pub const NOT_CONNECTED: &str = "Not connected";
pub const NO_INTERNET: &str = "No Internet Access";

const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);
const SPEEDTEST_TIMEOUT: Duration = Duration::from_secs(120);
// Some statistics sites refuse unknown agents.
const USER_AGENT: &str = "Mozilla/5.0";

pub struct SemiOftenCollector {
    client: Result<Client, String>,
    lan_interface: String,
    wifi_interface: String,
    reachability_urls: Vec<String>,
    outbreak_url: String,
    outbreak_regions: Vec<String>,
}

impl SemiOftenCollector {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| e.to_string());
        if let Err(ref e) = client {
            log::error!("HTTP client unavailable: {}", e);
        }

        Self {
            client,
            lan_interface: config.lan_interface.clone(),
            wifi_interface: config.wifi_interface.clone(),
            reachability_urls: config.reachability_urls.clone(),
            outbreak_url: config.outbreak_url.clone(),
            outbreak_regions: config.outbreak_regions.clone(),
        }
    }

    fn address(interfaces: &[String], interface: &str) -> FieldValue {
        if !interfaces.iter().any(|i| i == interface) {
            return FieldValue::text(NOT_CONNECTED);
        }
        shell::run("ip", &["-4", "addr", "show", interface], COMMAND_TIMEOUT)
            .and_then(|out| parse_ipv4(&out).ok_or(FieldError::Malformed))
            .map(FieldValue::Text)
            .into()
    }

    fn internet_access(&self) -> FieldValue {
        let client = match &self.client {
            Ok(client) => client,
            Err(_) => return FieldValue::Error(FieldError::Failed),
        };
        for url in &self.reachability_urls {
            match client.get(url).send() {
                Ok(response) if response.status().is_success() => {
                    return FieldValue::text(ESTABLISHED);
                }
                Ok(response) => log::info!("{} answered {}", url, response.status()),
                Err(e) => log::info!("{} unreachable: {}", url, e),
            }
        }
        FieldValue::text(DISCONNECTED)
    }

    fn push_speed(batch: &mut TelemetryBatch, ctx: &CollectContext, online: bool) {
        let fields = [Field::SpeedDown, Field::SpeedUp, Field::Ping];
        if ctx.test_mode {
            for field in fields {
                batch.push(field, FieldValue::Error(FieldError::Disabled));
            }
            return;
        }
        if !ctx.sample_speed {
            return;
        }
        if !online {
            for field in fields {
                batch.push(field, FieldValue::text(NO_INTERNET));
            }
            return;
        }

        match shell::run("speedtest-cli", &[], SPEEDTEST_TIMEOUT) {
            Ok(out) => {
                let result = parse_speedtest(&out);
                for (field, value) in fields.into_iter().zip([result.download, result.upload, result.ping]) {
                    batch.push(
                        field,
                        value
                            .map(FieldValue::Text)
                            .unwrap_or(FieldValue::Error(FieldError::Malformed)),
                    );
                }
            }
            Err(e) => {
                for field in fields {
                    batch.push(field, FieldValue::Error(e));
                }
            }
        }
    }

    fn outbreak_fields(&self) -> Vec<Field> {
        let mut fields = vec![Field::WorldInfected, Field::WorldDead];
        for i in 0..self.outbreak_regions.len() {
            fields.push(Field::RegionInfected(i));
            fields.push(Field::RegionDead(i));
        }
        fields
    }

    fn fetch_outbreak_page(&self) -> Result<String, FieldError> {
        let client = self.client.as_ref().map_err(|_| FieldError::Failed)?;
        let response = client.get(&self.outbreak_url).send().map_err(|e| {
            log::warn!("Outbreak page unreachable: {}", e);
            FieldError::Unreachable
        })?;
        if !response.status().is_success() {
            log::warn!("Outbreak page answered {}", response.status());
            return Err(FieldError::Unreachable);
        }
        response.text().map_err(|_| FieldError::Malformed)
    }

    fn push_outbreak(&self, batch: &mut TelemetryBatch, online: bool) {
        let page = if online {
            self.fetch_outbreak_page()
        } else {
            Err(FieldError::Unreachable)
        };
        let stats = match page.and_then(|html| parse_outbreak_page(&html, &self.outbreak_regions)) {
            Ok(stats) => stats,
            Err(e) => {
                for field in self.outbreak_fields() {
                    batch.push(field, FieldValue::Error(e));
                }
                return;
            }
        };

        let found = |value: Option<String>| {
            value
                .map(FieldValue::Text)
                .unwrap_or(FieldValue::Error(FieldError::Malformed))
        };
        batch.push(Field::WorldInfected, found(stats.world_infected));
        batch.push(Field::WorldDead, found(stats.world_dead));
        for (i, region) in stats.regions.into_iter().enumerate() {
            batch.push(Field::RegionInfected(i), found(region.infected));
            batch.push(Field::RegionDead(i), found(region.dead));
        }
    }
}

impl Collector for SemiOftenCollector {
    fn tier(&self) -> Tier {
        Tier::SemiOften
    }

    fn collect(&self, ctx: &CollectContext) -> TelemetryBatch {
        let mut batch = TelemetryBatch::new(Tier::SemiOften);

        let interfaces = shell::run("ip", &["-4", "addr"], COMMAND_TIMEOUT)
            .map(|out| parse_interfaces(&out))
            .unwrap_or_default();
        batch.push(Field::LanIp, Self::address(&interfaces, &self.lan_interface));
        batch.push(Field::WlanIp, Self::address(&interfaces, &self.wifi_interface));

        let access = self.internet_access();
        let online = access.as_text() == Some(ESTABLISHED);
        batch.push(Field::InternetAccess, access);

        Self::push_speed(&mut batch, ctx, online);
        self.push_outbreak(&mut batch, online);

        batch
    }
}
