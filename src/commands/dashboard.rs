//! Dashboard command handler.
//!
//! Loads the configuration, applies command-line overrides and hands the
//! terminal to the dashboard until the user quits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::*;

use crate::core::config::Config;
use crate::ui::dashboard::run_dashboard;

/// Positional values that select test mode.
pub const TEST_MODES: [&str; 5] = ["debug", "devel", "test", "testmode", "dbm"];

/// What test mode switches off. Outbreak figures are still fetched.
const TEST_MODE_NOTICE: &str = "  Speed test and OS update checks are disabled";

pub fn is_test_mode(mode: Option<&str>) -> bool {
    mode.is_some_and(|m| TEST_MODES.contains(&m))
}

/// Build the effective configuration from the file and the arguments.
pub fn config_from_matches(matches: &ArgMatches) -> Result<Config> {
    let path = match matches.get_one::<PathBuf>("config") {
        Some(path) => path.clone(),
        None => Config::get_config_path()?,
    };
    let mut config = Config::load_from(&path)?.with_overrides(
        matches.get_one::<u64>("interval").copied(),
        matches.get_one::<u32>("semi-interval").copied(),
        matches.get_one::<u32>("speedtest-every").copied(),
    );
    config.test_mode = is_test_mode(matches.get_one::<String>("mode").map(String::as_str));
    if matches.get_flag("background") {
        config.background_collectors = true;
    }
    log::info!("Using configuration from {:?}", path);
    Ok(config)
}

/// Execute the dashboard command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = config_from_matches(matches)?;

    if config.test_mode {
        println!("{}", "Developer mode initialised".yellow().bold());
        println!("{}", TEST_MODE_NOTICE.yellow());
    }
    println!(
        "{} refresh every {}s, network every {}m",
        "Starting statmon:".green().bold(),
        config.interval_secs,
        config.semi_interval_mins
    );
    if config.background_collectors {
        println!("{}", "  Collectors run in the background".dimmed());
    }

    run_dashboard(&config).context("Dashboard stopped unexpectedly")?;

    println!("{}", "Goodbye!".green());
    Ok(())
}
