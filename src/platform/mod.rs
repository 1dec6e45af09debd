//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time (wall clock vs. hand-driven clock)
//! - External sensor input

pub mod sensor;
pub mod time;

pub use sensor::{SensorInput, SensorLatch, SensorReading, SensorSample, parse_line};
pub use time::{Clock, ManualClock, SystemClock};
