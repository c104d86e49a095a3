use std::io;
use thiserror::Error;

/// Custom error type for statmon
#[derive(Error, Debug)]
pub enum StatmonError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Collector error: {0}")]
    Collector(String),

    #[error("TUI error: {0}")]
    Tui(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for statmon
pub type Result<T> = std::result::Result<T, StatmonError>;

impl StatmonError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        StatmonError::Config(msg.into())
    }

    /// Create a collector error
    pub fn collector<S: Into<String>>(msg: S) -> Self {
        StatmonError::Collector(msg.into())
    }

    pub fn tui<S: Into<String>>(msg: S) -> Self {
        StatmonError::Tui(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        StatmonError::Other(msg.into())
    }
}
