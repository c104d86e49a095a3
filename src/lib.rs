// statmon library: tiered telemetry collection and the terminal dashboard

pub mod error;
pub use error::{Result, StatmonError};

pub mod commands;
pub mod core;
pub mod ui;

pub use core::config::Config;

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// `<cache_dir>/statmon/statmon.log`
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("statmon").join("statmon.log"))
}

/// Send log records to `path` (or the default log file). The dashboard owns
/// the screen, so nothing is logged to stderr. `RUST_LOG` overrides the
/// `info` default.
pub fn init_logging(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_log_path()
            .ok_or_else(|| StatmonError::config("Could not determine cache directory"))?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| StatmonError::other(e.to_string()))?;
    Ok(path)
}
