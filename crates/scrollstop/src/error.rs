//! Scroll Stop error types

use std::io;
use thiserror::Error;

/// Errors raised while loading or validating watcher configuration
///
/// The watcher itself never fails: invalid ids are ignored.
#[derive(Error, Debug)]
pub enum ScrollStopError {
    /// IO error when reading a config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("Config parsing error: {0}")]
    Config(#[from] toml::de::Error),

    /// Config parsed but holds unusable values
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for scroll stop operations
pub type Result<T> = std::result::Result<T, ScrollStopError>;
