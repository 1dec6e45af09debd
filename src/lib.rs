//! Cube Runner - A three-lane endless runner
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (player, obstacles, collisions, run clock, session)
//! - `renderer`: Host-facing render snapshot
//! - `platform`: Clock and sensor input abstraction
//! - `persistence`: Versioned JSON save/load
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use leaderboard::Leaderboard;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one tick per rendered frame)
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;

    /// Lane layout: three lanes at -LANE_SPACING, 0, +LANE_SPACING
    pub const LANE_SPACING: f32 = 5.0;
    /// Player x must be this close to a lane center to count as "in" it
    pub const LANE_TOLERANCE: f32 = 0.5;
    /// Horizontal lane switch speed (units per tick)
    pub const LANE_SWITCH_SPEED: f32 = 0.5;

    /// Player never moves in depth
    pub const PLAYER_Z: f32 = -15.0;
    pub const PLAYER_NEUTRAL_Y: f32 = 0.0;
    /// Cube half-extent, for rendering
    pub const PLAYER_HALF_SIZE: f32 = 1.0;

    /// Jump/crouch total duration, split in three equal phases
    pub const VERTICAL_MOVE_TICKS: u32 = 30;
    /// Vertical displacement per tick during the outward and return phases
    pub const VERTICAL_STEP: f32 = 0.3;

    /// Obstacles park and respawn here
    pub const OBSTACLE_SPAWN_Z: f32 = -50.0;
    /// Obstacles recycle once they pass this depth
    pub const OBSTACLE_RECYCLE_Z: f32 = -5.0;
    /// Obstacle approach speed (units per tick)
    pub const OBSTACLE_STEP: f32 = 0.5;
    /// Random pre-spawn delay upper bound (inclusive)
    pub const MAX_SPAWN_DELAY_TICKS: u32 = 60;
    /// Vertical offsets a point obstacle may pick from
    pub const POINT_OBSTACLE_OFFSETS: [f32; 2] = [0.0, -3.0];
    /// Lane obstacles sit on the ground
    pub const LANE_OBSTACLE_OFFSET: f32 = 0.0;
    /// Lane obstacles span this far above and below their offset
    pub const LANE_OBSTACLE_HALF_HEIGHT: f32 = 6.0;

    /// Max |obstacle z - player z| for a hit
    pub const DEPTH_HIT_THRESHOLD: f32 = 2.0;
    /// Sphere radius: max |player y - point obstacle y| for a hit
    pub const POINT_HIT_RADIUS: f32 = 1.5;

    /// "Get ready" countdown after choosing a control method (3 seconds)
    pub const COUNTDOWN_TICKS: u32 = 3 * SIM_HZ;
    /// How long the game-over frame stays up before returning to selection
    pub const END_DISPLAY_TICKS: u32 = SIM_HZ;

    /// Sensor distance (cm) mapped to the lowest / highest vertical offset
    pub const SENSOR_NEAR_CM: f32 = 10.0;
    pub const SENSOR_FAR_CM: f32 = 30.0;
    /// Vertical offset reached at either end of the sensor range
    pub const SENSOR_VERTICAL_RANGE: f32 = 3.0;
    /// Exponential smoothing factor applied per tick in continuous mode
    pub const SENSOR_SMOOTHING: f32 = 0.2;
    /// Joystick deadzone (raw units either side of center)
    pub const JOYSTICK_DEADZONE: i32 = 50;
    /// Minimum ticks between two joystick lane changes (0.3 s)
    pub const JOYSTICK_DEBOUNCE_TICKS: u32 = 18;
}

/// Step `current` toward `target` by at most `speed`, snapping once within reach
#[inline]
pub fn approach(current: f32, target: f32, speed: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= speed {
        target
    } else {
        current + speed * delta.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_snaps_without_overshoot() {
        assert_eq!(approach(0.0, 5.0, 0.5), 0.5);
        assert_eq!(approach(4.7, 5.0, 0.5), 5.0);
        assert_eq!(approach(-4.7, -5.0, 0.5), -5.0);
        assert_eq!(approach(5.0, 5.0, 0.5), 5.0);
    }
}
