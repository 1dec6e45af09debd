//! Error types for the fallible outer surfaces
//!
//! The simulation itself never fails; only config loading, save files and
//! the sensor line codec can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid save JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

#[derive(Debug, Error, PartialEq)]
pub enum SensorParseError {
    #[error("unrecognized sensor line: {0:?}")]
    Unrecognized(String),
    #[error("bad value in sensor line {line:?}")]
    BadValue { line: String },
}
