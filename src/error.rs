//! # Errors
//!
//! Every failure point of dataset construction and configuration loading.
//! Chart drawing keeps its own boxed error type, see [`crate::plotting::PlotError`].

use std::path::PathBuf;
use thiserror::Error;

/// Why a date-time string was rejected.
#[derive(Debug, Error)]
pub enum DateTimeError {
    #[error("value is not a string")]
    NotText,
    #[error("missing time zone suffix")]
    MissingTimezone,
    #[error("invalid time zone {0:?}")]
    InvalidTimezone(String),
    #[error("expected \"<weekday>, <day> <month> <year>, <HH:MM:SS> <tz>\": {0}")]
    Format(#[from] chrono::ParseError),
}

#[derive(Debug, Error)]
pub enum DashError {
    #[error("failed to open {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read input")]
    Read(#[from] std::io::Error),

    #[error("line {line}: not a mapping literal: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("line {line}: missing field {field:?}")]
    MissingField { line: usize, field: String },

    #[error("line {line}: cannot parse date-time {value:?}")]
    InvalidDateTime {
        line: usize,
        value: String,
        #[source]
        source: DateTimeError,
    },

    #[error("line {line}: quantity {value} is not an integer")]
    InvalidQuantity { line: usize, value: String },

    #[error("invalid config file {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T, E = DashError> = std::result::Result<T, E>;
