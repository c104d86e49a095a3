use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgAction, Command};
use colored::*;

use statmon::commands;

fn build_cli() -> Command {
    Command::new("statmon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tiered host-health and network dashboard for small terminals")
        .arg(
            Arg::new("mode")
                .help("debug, devel, test, testmode or dbm: skip slow network checks")
                .value_parser(commands::dashboard::TEST_MODES)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (defaults to <config_dir>/statmon/config.json)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("interval")
                .short('i')
                .long("interval")
                .value_name("SECS")
                .help("Seconds between refreshes (1-59)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("semi-interval")
                .short('s')
                .long("semi-interval")
                .value_name("MINS")
                .help("Minutes between network checks (1-1420)")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("speedtest-every")
                .long("speedtest-every")
                .value_name("N")
                .help("Run the speed test on every Nth network check (1-9)")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("background")
                .short('b')
                .long("background")
                .help("Run collectors on worker threads")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Log file (defaults to <cache_dir>/statmon/statmon.log)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let log_file = matches.get_one::<PathBuf>("log-file");
    if let Err(e) = statmon::init_logging(log_file.map(PathBuf::as_path)) {
        eprintln!("{} logging disabled: {}", "Warning:".yellow().bold(), e);
    }

    if let Err(e) = commands::dashboard(&matches) {
        log::error!("{:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
