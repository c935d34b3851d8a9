/// Error types for configuration loading
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a configuration from external sources.
///
/// The `Configuration` setters themselves never fail; these only come out of
/// the file/env loader and option-name parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to get executable path: {0}")]
    ExecutablePath(#[source] std::io::Error),

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: String, value: String },

    #[error("unknown option: {0}")]
    UnknownOption(String),
}
