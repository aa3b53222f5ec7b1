use std::{io, path::PathBuf};

use thiserror::Error;

use crate::invariants::DayKey;

/// Failures that end a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config value for {key}: {reason}")]
    ConfigValue {
        key: &'static str,
        reason: &'static str,
    },

    #[error("failed to open access log {}: {source}", path.display())]
    OpenLog { path: PathBuf, source: io::Error },

    #[error("failed to read access log: {0}")]
    ReadLog(#[source] io::Error),

    /// Only raised when timestamps are parsed fail-fast.
    #[error("malformed timestamp {raw:?} on line {line}: {source}")]
    Timestamp {
        line: usize,
        raw: String,
        source: chrono::ParseError,
    },

    #[error("no accepted requests recorded for {0}")]
    NoDataForDay(DayKey),

    #[error("mail delivery failed: {0}")]
    Delivery(String),

    #[error("failed to write report: {0}")]
    Output(#[source] io::Error),
}
