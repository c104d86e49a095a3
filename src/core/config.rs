use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::Settings;
use crate::error::Result as StatmonResult;

/// Startup configuration. Read once, never written back: edits made in the
/// settings dialog only last for the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seconds between ticks
    pub interval_secs: u64,
    /// Minutes between Semi-Often runs
    pub semi_interval_mins: u32,
    /// Speed test once every N Semi-Often runs
    pub speedtest_every: u32,
    /// CPU temperature above this is drawn in the attention style
    pub cpu_temp_alert_celsius: f64,
    /// Memory usage above this percentage is drawn in the attention style
    pub memory_alert_percent: f64,
    pub wifi_interface: String,
    pub lan_interface: String,
    /// Probed in order; any success means internet access is established
    pub reachability_urls: Vec<String>,
    /// Page scraped for outbreak statistics
    pub outbreak_url: String,
    /// Region names as they appear on the outbreak page
    pub outbreak_regions: Vec<String>,
    pub http_timeout_secs: u64,
    /// Run collectors on a worker pool instead of inside the tick
    pub background_collectors: bool,
    /// Skip slow network-bound collectors
    #[serde(skip)]
    pub test_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            interval_secs: settings.tick_interval_secs,
            semi_interval_mins: settings.semi_interval_mins,
            speedtest_every: settings.speedtest_every,
            cpu_temp_alert_celsius: 65.0,
            memory_alert_percent: 80.0,
            wifi_interface: "wlan0".to_string(),
            lan_interface: "eth0".to_string(),
            reachability_urls: vec![
                "https://google.com/".to_string(),
                "https://archlinux.org/".to_string(),
            ],
            outbreak_url: "https://corona.help/".to_string(),
            outbreak_regions: vec![
                "Mainland China".to_string(),
                "Italy".to_string(),
                "Netherlands".to_string(),
            ],
            http_timeout_secs: 10,
            background_collectors: false,
            test_mode: false,
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load from `path`. A missing, empty or unreadable-as-JSON file yields
    /// the defaults; out-of-range cadences are reset to their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if !path.exists() {
            Config::default()
        } else {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;

            if data.trim().is_empty() {
                Config::default()
            } else {
                Config::from_json(&data).unwrap_or_else(|e| {
                    log::warn!("Ignoring malformed config {:?}: {}", path, e);
                    Config::default()
                })
            }
        };

        Ok(config.sanitized())
    }

    /// Parse a config document. Values are not yet range-checked.
    pub fn from_json(data: &str) -> StatmonResult<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("statmon").join("config.json"))
    }

    /// Initial cadences for the scheduler and settings dialog.
    pub fn settings(&self) -> Settings {
        Settings {
            tick_interval_secs: self.interval_secs,
            semi_interval_mins: self.semi_interval_mins,
            speedtest_every: self.speedtest_every,
        }
    }

    fn sanitized(mut self) -> Self {
        let settings = self.settings().sanitized();
        self.interval_secs = settings.tick_interval_secs;
        self.semi_interval_mins = settings.semi_interval_mins;
        self.speedtest_every = settings.speedtest_every;
        if self.http_timeout_secs == 0 {
            self.http_timeout_secs = Config::default().http_timeout_secs;
        }
        self
    }

    /// Apply command-line overrides, validating them like the file values.
    pub fn with_overrides(
        mut self,
        interval: Option<u64>,
        semi_interval: Option<u32>,
        speedtest_every: Option<u32>,
    ) -> Self {
        if let Some(v) = interval {
            self.interval_secs = v;
        }
        if let Some(v) = semi_interval {
            self.semi_interval_mins = v;
        }
        if let Some(v) = speedtest_every {
            self.speedtest_every = v;
        }
        self.sanitized()
    }
}
