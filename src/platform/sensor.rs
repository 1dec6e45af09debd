//! External sensor controller (joystick + distance sensor)
//!
//! A reader thread owned by the host pushes text lines into a
//! [`SensorLatch`]; each tick the host takes the latest sample and turns it
//! into a [`TickInput`] with [`SensorInput`]. The simulation never waits on
//! the device: a stale sample repeats the last known value, and a device
//! that has not reported a distance yet produces no vertical input at all.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::SensorParseError;
use crate::sim::input::{Command, TickInput};
use crate::sim::player::VerticalMode;
use crate::tuning::SensorTuning;

/// One decoded line from the device
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorReading {
    JoystickX(i32),
    JoystickY(i32),
    Button(bool),
    Distance(f32),
}

/// Parse one line of the device's text protocol
///
/// Recognized forms: `X:<int>`, `Y:<int>`, `Button pressed`,
/// `Button not pressed`, `Distance: <float>`.
pub fn parse_line(line: &str) -> Result<SensorReading, SensorParseError> {
    let line = line.trim();
    let bad = || SensorParseError::BadValue {
        line: line.to_string(),
    };

    if let Some(value) = line.strip_prefix("X:") {
        return value.trim().parse().map(SensorReading::JoystickX).map_err(|_| bad());
    }
    if let Some(value) = line.strip_prefix("Y:") {
        return value.trim().parse().map(SensorReading::JoystickY).map_err(|_| bad());
    }
    if let Some(value) = line.strip_prefix("Distance:") {
        let cm: f32 = value.trim().parse().map_err(|_| bad())?;
        if !cm.is_finite() {
            return Err(bad());
        }
        return Ok(SensorReading::Distance(cm));
    }
    // "not pressed" must be checked first, it shares the prefix
    if line.starts_with("Button not pressed") {
        return Ok(SensorReading::Button(false));
    }
    if line.starts_with("Button pressed") {
        return Ok(SensorReading::Button(true));
    }
    Err(SensorParseError::Unrecognized(line.to_string()))
}

/// Latest known device state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorSample {
    pub joystick_x: i32,
    pub joystick_y: i32,
    pub button: bool,
    /// Last reported distance; `None` until the first distance line
    pub distance_cm: Option<f32>,
    /// Number of readings folded in so far
    pub updates: u64,
}

impl SensorSample {
    pub fn apply(&mut self, reading: SensorReading) {
        match reading {
            SensorReading::JoystickX(x) => self.joystick_x = x,
            SensorReading::JoystickY(y) => self.joystick_y = y,
            SensorReading::Button(pressed) => self.button = pressed,
            SensorReading::Distance(cm) => self.distance_cm = Some(cm),
        }
        self.updates += 1;
    }
}

/// Shared latest-value cell between the reader thread and the game loop
#[derive(Debug, Clone, Default)]
pub struct SensorLatch {
    inner: Arc<Mutex<SensorSample>>,
}

impl SensorLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer side: decode a line and fold it in. Bad lines leave the
    /// sample untouched.
    pub fn push_line(&self, line: &str) -> Result<SensorReading, SensorParseError> {
        let reading = parse_line(line).inspect_err(|e| log::warn!("Ignoring sensor line: {e}"))?;
        self.push(reading);
        Ok(reading)
    }

    pub fn push(&self, reading: SensorReading) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(reading);
    }

    /// Consumer side: copy of the most recent state
    pub fn latest(&self) -> SensorSample {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Turns sensor samples into per-tick input
#[derive(Debug, Clone)]
pub struct SensorInput {
    tuning: SensorTuning,
    neutral_y: f32,
    mode: VerticalMode,
    /// Ticks before another joystick lane change is accepted
    debounce: u32,
}

impl SensorInput {
    pub fn new(tuning: SensorTuning, neutral_y: f32, mode: VerticalMode) -> Self {
        Self {
            tuning,
            neutral_y,
            mode,
            debounce: 0,
        }
    }

    pub fn next_input(&mut self, sample: &SensorSample) -> TickInput {
        let mut input = TickInput::default();

        self.debounce = self.debounce.saturating_sub(1);
        if self.debounce == 0 {
            let deadzone = self.tuning.joystick_deadzone;
            let lane_command = if sample.joystick_x > deadzone {
                Some(Command::MoveRight)
            } else if sample.joystick_x < -deadzone {
                Some(Command::MoveLeft)
            } else {
                None
            };
            if let Some(command) = lane_command {
                input.commands.push(command);
                self.debounce = self.tuning.debounce_ticks;
            }
        }

        // No distance yet means no vertical input this tick
        let Some(distance_cm) = sample.distance_cm else {
            return input;
        };
        match self.mode {
            VerticalMode::Continuous => {
                input.vertical_signal = Some(self.tuning.distance_to_offset(distance_cm, self.neutral_y));
            }
            VerticalMode::Discrete => {
                if distance_cm < self.tuning.near_cm {
                    input.commands.push(Command::Crouch);
                } else if distance_cm > self.tuning.far_cm {
                    input.commands.push(Command::Jump);
                }
            }
        }

        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        assert_eq!(parse_line("X:512"), Ok(SensorReading::JoystickX(512)));
        assert_eq!(parse_line("Y: -40\r"), Ok(SensorReading::JoystickY(-40)));
        assert_eq!(parse_line("Distance: 12.5"), Ok(SensorReading::Distance(12.5)));
        assert_eq!(parse_line("Button pressed"), Ok(SensorReading::Button(true)));
        assert_eq!(parse_line("Button not pressed"), Ok(SensorReading::Button(false)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_line("X:abc"), Err(SensorParseError::BadValue { .. })));
        assert!(matches!(parse_line("Distance: NaN"), Err(SensorParseError::BadValue { .. })));
        assert!(matches!(parse_line("hello"), Err(SensorParseError::Unrecognized(_))));
    }

    #[test]
    fn test_latch_holds_last_value_on_bad_line() {
        let latch = SensorLatch::new();
        latch.push_line("Distance: 15.0").unwrap();
        assert!(latch.push_line("Distance: ???").is_err());
        let sample = latch.latest();
        assert_eq!(sample.distance_cm, Some(15.0));
        assert_eq!(sample.updates, 1);
    }

    #[test]
    fn test_latch_across_threads() {
        let latch = SensorLatch::new();
        let producer = latch.clone();
        let handle = std::thread::spawn(move || {
            for x in [10, 200, -300] {
                producer.push_line(&format!("X:{x}")).unwrap();
            }
        });
        handle.join().unwrap();
        assert_eq!(latch.latest().joystick_x, -300);
        assert_eq!(latch.latest().updates, 3);
    }

    #[test]
    fn test_joystick_debounce() {
        let mut input = SensorInput::new(SensorTuning::default(), 0.0, VerticalMode::Continuous);
        let sample = SensorSample {
            joystick_x: 400,
            distance_cm: Some(20.0),
            ..Default::default()
        };
        let first = input.next_input(&sample);
        assert_eq!(first.commands, vec![Command::MoveRight]);

        // Held stick: no repeat until the debounce window passes
        for _ in 0..17 {
            assert!(input.next_input(&sample).commands.is_empty());
        }
        assert_eq!(input.next_input(&sample).commands, vec![Command::MoveRight]);
    }

    #[test]
    fn test_deadzone_and_continuous_signal() {
        let mut input = SensorInput::new(SensorTuning::default(), 0.0, VerticalMode::Continuous);
        let sample = SensorSample {
            joystick_x: -30,
            distance_cm: Some(30.0),
            ..Default::default()
        };
        let tick = input.next_input(&sample);
        assert!(tick.commands.is_empty());
        assert_eq!(tick.vertical_signal, Some(3.0));
    }

    #[test]
    fn test_discrete_distance_zones() {
        let mut input = SensorInput::new(SensorTuning::default(), 0.0, VerticalMode::Discrete);
        let at = |cm| SensorSample {
            distance_cm: Some(cm),
            ..Default::default()
        };
        assert_eq!(input.next_input(&at(5.0)).commands, vec![Command::Crouch]);
        assert_eq!(input.next_input(&at(45.0)).commands, vec![Command::Jump]);
        let middle = input.next_input(&at(20.0));
        assert!(middle.commands.is_empty());
        assert_eq!(middle.vertical_signal, None);
    }

    #[test]
    fn test_no_distance_yet_means_no_vertical_input() {
        let fresh = SensorLatch::new().latest();
        assert_eq!(fresh.distance_cm, None);
        for mode in [VerticalMode::Continuous, VerticalMode::Discrete] {
            let mut input = SensorInput::new(SensorTuning::default(), 0.0, mode);
            let tick = input.next_input(&fresh);
            assert!(tick.is_empty(), "{mode:?} produced {tick:?}");
        }

        // Joystick readings alone still steer, without inventing a height
        let latch = SensorLatch::new();
        latch.push_line("X:600").unwrap();
        let mut input = SensorInput::new(SensorTuning::default(), 0.0, VerticalMode::Continuous);
        let tick = input.next_input(&latch.latest());
        assert_eq!(tick.commands, vec![Command::MoveRight]);
        assert_eq!(tick.vertical_signal, None);
    }
}
