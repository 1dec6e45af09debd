//! Data-driven game balance
//!
//! Every knob the simulation reads lives here. `Default` reproduces the
//! canonical constant set in [`crate::consts`]; a JSON file may override any
//! subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Player movement parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub lane_spacing: f32,
    pub lane_switch_speed: f32,
    pub z: f32,
    pub neutral_y: f32,
    /// Total jump/crouch ticks (must divide into three phases)
    pub vertical_move_ticks: u32,
    pub vertical_step: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            lane_spacing: LANE_SPACING,
            lane_switch_speed: LANE_SWITCH_SPEED,
            z: PLAYER_Z,
            neutral_y: PLAYER_NEUTRAL_Y,
            vertical_move_ticks: VERTICAL_MOVE_TICKS,
            vertical_step: VERTICAL_STEP,
        }
    }
}

impl PlayerTuning {
    /// Ticks per phase (outward, hold, return)
    pub fn phase_ticks(&self) -> u32 {
        self.vertical_move_ticks / 3
    }

    /// Peak displacement of a full jump or crouch
    pub fn vertical_amplitude(&self) -> f32 {
        self.phase_ticks() as f32 * self.vertical_step
    }
}

/// Obstacle spawn/advance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub spawn_z: f32,
    pub recycle_z: f32,
    pub step: f32,
    pub max_spawn_delay_ticks: u32,
    pub point_offsets: Vec<f32>,
    pub lane_offset: f32,
    pub lane_half_height: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            spawn_z: OBSTACLE_SPAWN_Z,
            recycle_z: OBSTACLE_RECYCLE_Z,
            step: OBSTACLE_STEP,
            max_spawn_delay_ticks: MAX_SPAWN_DELAY_TICKS,
            point_offsets: POINT_OBSTACLE_OFFSETS.to_vec(),
            lane_offset: LANE_OBSTACLE_OFFSET,
            lane_half_height: LANE_OBSTACLE_HALF_HEIGHT,
        }
    }
}

/// Hit test thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    pub lane_tolerance: f32,
    pub depth_threshold: f32,
    /// Sphere radius, used for both the hit test and the drawn size
    pub point_radius: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            lane_tolerance: LANE_TOLERANCE,
            depth_threshold: DEPTH_HIT_THRESHOLD,
            point_radius: POINT_HIT_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    pub countdown_ticks: u32,
    pub end_display_ticks: u32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            countdown_ticks: COUNTDOWN_TICKS,
            end_display_ticks: END_DISPLAY_TICKS,
        }
    }
}

/// Distance sensor / joystick mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorTuning {
    pub near_cm: f32,
    pub far_cm: f32,
    pub vertical_range: f32,
    pub smoothing: f32,
    pub joystick_deadzone: i32,
    pub debounce_ticks: u32,
}

impl Default for SensorTuning {
    fn default() -> Self {
        Self {
            near_cm: SENSOR_NEAR_CM,
            far_cm: SENSOR_FAR_CM,
            vertical_range: SENSOR_VERTICAL_RANGE,
            smoothing: SENSOR_SMOOTHING,
            joystick_deadzone: JOYSTICK_DEADZONE,
            debounce_ticks: JOYSTICK_DEBOUNCE_TICKS,
        }
    }
}

impl SensorTuning {
    /// Map a distance reading linearly onto a vertical offset target
    pub fn distance_to_offset(&self, distance_cm: f32, neutral_y: f32) -> f32 {
        let t = ((distance_cm - self.near_cm) / (self.far_cm - self.near_cm)).clamp(0.0, 1.0);
        neutral_y - self.vertical_range + t * 2.0 * self.vertical_range
    }
}

/// Complete tuning set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub obstacles: ObstacleTuning,
    pub collision: CollisionTuning,
    pub session: SessionTuning,
    pub sensor: SensorTuning,
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        if !path.exists() {
            log::info!("No tuning file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.player;
        let o = &self.obstacles;
        let c = &self.collision;
        let s = &self.sensor;

        if p.lane_spacing <= 0.0 {
            return Err(invalid("player.lane_spacing must be positive"));
        }
        if p.lane_switch_speed <= 0.0 || p.vertical_step <= 0.0 {
            return Err(invalid("player speeds must be positive"));
        }
        if p.vertical_move_ticks == 0 || !p.vertical_move_ticks.is_multiple_of(3) {
            return Err(invalid("player.vertical_move_ticks must be a positive multiple of 3"));
        }
        if o.recycle_z <= o.spawn_z {
            return Err(invalid("obstacles.recycle_z must lie beyond obstacles.spawn_z"));
        }
        if p.z <= o.spawn_z || p.z >= o.recycle_z {
            return Err(invalid("player.z must lie between spawn_z and recycle_z"));
        }
        if o.step <= 0.0 {
            return Err(invalid("obstacles.step must be positive"));
        }
        if o.point_offsets.is_empty() {
            return Err(invalid("obstacles.point_offsets must not be empty"));
        }
        if c.lane_tolerance <= 0.0 || c.lane_tolerance * 2.0 >= p.lane_spacing {
            return Err(invalid("collision.lane_tolerance must be positive and below half the lane spacing"));
        }
        if c.depth_threshold <= 0.0 || c.point_radius <= 0.0 {
            return Err(invalid("collision thresholds must be positive"));
        }
        if s.near_cm >= s.far_cm {
            return Err(invalid("sensor.near_cm must be below sensor.far_cm"));
        }
        if s.smoothing <= 0.0 || s.smoothing > 1.0 {
            return Err(invalid("sensor.smoothing must be in (0, 1]"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> TuningError {
    TuningError::Invalid(msg.to_string())
}
