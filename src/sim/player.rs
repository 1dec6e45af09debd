//! Player cube movement
//!
//! Lane position eases toward the selected lane; vertical position is driven
//! by one of two strategies: a keyframed jump/crouch timer (keyboard) or a
//! smoothed continuous signal (distance sensor).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::input::Command;
use super::lane::Lane;
use crate::approach;
use crate::tuning::PlayerTuning;

/// Below this distance the continuous strategy snaps to its target
const SIGNAL_SNAP_EPSILON: f32 = 1e-3;

/// Direction of a vertical move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    Jumping,
    Crouching,
}

impl Stance {
    fn sign(self) -> f32 {
        match self {
            Stance::Jumping => 1.0,
            Stance::Crouching => -1.0,
        }
    }
}

/// Vertical animation state
///
/// `Rising` means moving away from neutral (up for a jump, down for a
/// crouch); `Falling` means returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalState {
    #[default]
    Neutral,
    Rising(Stance),
    Peak(Stance),
    Falling(Stance),
}

impl VerticalState {
    pub fn stance(self) -> Option<Stance> {
        match self {
            VerticalState::Neutral => None,
            VerticalState::Rising(s) | VerticalState::Peak(s) | VerticalState::Falling(s) => Some(s),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VerticalState::Neutral => "NEUTRAL",
            VerticalState::Rising(Stance::Jumping) => "JUMPING_UP",
            VerticalState::Peak(Stance::Jumping) => "JUMPING_PEAK",
            VerticalState::Falling(Stance::Jumping) => "JUMPING_DOWN",
            VerticalState::Rising(Stance::Crouching) => "CROUCHING_DOWN",
            VerticalState::Peak(Stance::Crouching) => "CROUCHING_HOLD",
            VerticalState::Falling(Stance::Crouching) => "CROUCHING_UP",
        }
    }
}

/// Which vertical strategy a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalMode {
    /// Jump/crouch commands start a fixed-length keyframed move
    #[default]
    Discrete,
    /// Vertical offset tracks an external signal with exponential smoothing
    Continuous,
}

/// Vertical control strategy and its state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VerticalControl {
    Discrete {
        stance: Option<Stance>,
        ticks_left: u32,
    },
    Continuous {
        /// Last known target offset (held when no new signal arrives)
        target: f32,
        smoothing: f32,
    },
}

impl VerticalControl {
    pub fn new(mode: VerticalMode, neutral_y: f32, smoothing: f32) -> Self {
        match mode {
            VerticalMode::Discrete => VerticalControl::Discrete {
                stance: None,
                ticks_left: 0,
            },
            VerticalMode::Continuous => VerticalControl::Continuous {
                target: neutral_y,
                smoothing,
            },
        }
    }

    pub fn mode(&self) -> VerticalMode {
        match self {
            VerticalControl::Discrete { .. } => VerticalMode::Discrete,
            VerticalControl::Continuous { .. } => VerticalMode::Continuous,
        }
    }
}

/// Snapshot of the player for collision and rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    /// Lane the player is in or heading to
    pub lane: Lane,
    /// x = horizontal, y = vertical offset, z = fixed depth
    pub position: Vec3,
    pub vertical_state: VerticalState,
    /// Ticks left in the current jump/crouch (0 when neutral or continuous)
    pub state_timer: u32,
}

impl PlayerPose {
    #[inline]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn vertical_offset(&self) -> f32 {
        self.position.y
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.position.z
    }
}

/// Lane and vertical state machine for the player cube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerController {
    tuning: PlayerTuning,
    lane: Lane,
    x: f32,
    y: f32,
    vertical: VerticalControl,
    /// Smoothing used whenever the continuous strategy is (re)built
    smoothing: f32,
}

impl PlayerController {
    pub fn new(tuning: PlayerTuning, mode: VerticalMode, smoothing: f32) -> Self {
        let vertical = VerticalControl::new(mode, tuning.neutral_y, smoothing);
        Self {
            lane: Lane::Center,
            x: Lane::Center.x(tuning.lane_spacing),
            y: tuning.neutral_y,
            vertical,
            smoothing,
            tuning,
        }
    }

    /// Back to the run-start pose, keeping the selected strategy
    pub fn reset(&mut self) {
        *self = Self::new(self.tuning.clone(), self.vertical.mode(), self.smoothing);
    }

    /// Swap the vertical strategy; any move in progress is dropped
    pub fn set_vertical_control(&mut self, mode: VerticalMode, smoothing: f32) {
        self.smoothing = smoothing;
        self.vertical = VerticalControl::new(mode, self.tuning.neutral_y, smoothing);
        self.y = self.tuning.neutral_y;
    }

    pub fn vertical_mode(&self) -> VerticalMode {
        self.vertical.mode()
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    /// Apply discrete commands; out-of-range or conflicting requests are ignored
    pub fn handle_commands(&mut self, commands: &[Command]) {
        for &command in commands {
            match command {
                Command::MoveLeft => self.shift_lane(self.lane.left()),
                Command::MoveRight => self.shift_lane(self.lane.right()),
                Command::Jump => self.start_vertical(Stance::Jumping),
                Command::Crouch => self.start_vertical(Stance::Crouching),
            }
        }
    }

    /// Feed the latest continuous target; `None` keeps the last known value
    pub fn handle_vertical_signal(&mut self, signal: Option<f32>) {
        if let (VerticalControl::Continuous { target, .. }, Some(value)) = (&mut self.vertical, signal)
            && value.is_finite()
        {
            *target = value;
        }
    }

    fn shift_lane(&mut self, next: Option<Lane>) {
        if let Some(lane) = next {
            log::debug!("Lane change {} -> {}", self.lane.as_str(), lane.as_str());
            self.lane = lane;
        }
    }

    fn start_vertical(&mut self, new_stance: Stance) {
        // Only the discrete strategy reacts, and only from neutral
        if let VerticalControl::Discrete { stance, ticks_left } = &mut self.vertical
            && stance.is_none()
        {
            *stance = Some(new_stance);
            *ticks_left = self.tuning.vertical_move_ticks;
        }
    }

    /// Advance lane easing and the vertical strategy by one tick
    pub fn tick(&mut self) {
        let neutral = self.tuning.neutral_y;
        let third = self.tuning.phase_ticks();
        let step = self.tuning.vertical_step;

        match &mut self.vertical {
            VerticalControl::Discrete { stance, ticks_left } => {
                if let Some(s) = *stance {
                    if *ticks_left > 2 * third {
                        self.y += s.sign() * step;
                    } else if *ticks_left > third {
                        // Hold at peak/trough
                    } else if *ticks_left > 0 {
                        self.y -= s.sign() * step;
                    }
                    *ticks_left = ticks_left.saturating_sub(1);
                    if *ticks_left == 0 {
                        *stance = None;
                        self.y = neutral;
                    }
                }
            }
            VerticalControl::Continuous { target, smoothing } => {
                self.y += *smoothing * (*target - self.y);
                if (*target - self.y).abs() < SIGNAL_SNAP_EPSILON {
                    self.y = *target;
                }
            }
        }

        let target_x = self.lane.x(self.tuning.lane_spacing);
        self.x = approach(self.x, target_x, self.tuning.lane_switch_speed);
    }

    /// Current pose (z never changes)
    pub fn pose(&self) -> PlayerPose {
        let (vertical_state, state_timer) = self.vertical_state();
        PlayerPose {
            lane: self.lane,
            position: Vec3::new(self.x, self.y, self.tuning.z),
            vertical_state,
            state_timer,
        }
    }

    fn vertical_state(&self) -> (VerticalState, u32) {
        let neutral = self.tuning.neutral_y;
        match self.vertical {
            VerticalControl::Discrete {
                stance: Some(s),
                ticks_left,
            } => {
                let third = self.tuning.phase_ticks();
                let state = if ticks_left > 2 * third {
                    VerticalState::Rising(s)
                } else if ticks_left > third {
                    VerticalState::Peak(s)
                } else {
                    VerticalState::Falling(s)
                };
                (state, ticks_left)
            }
            VerticalControl::Discrete { stance: None, .. } => (VerticalState::Neutral, 0),
            VerticalControl::Continuous { target, .. } => {
                let offset = self.y - neutral;
                if offset.abs() < SIGNAL_SNAP_EPSILON {
                    return (VerticalState::Neutral, 0);
                }
                let s = if offset > 0.0 {
                    Stance::Jumping
                } else {
                    Stance::Crouching
                };
                let state = if (target - self.y).abs() < SIGNAL_SNAP_EPSILON {
                    VerticalState::Peak(s)
                } else if (target - neutral).abs() > offset.abs() && (target - neutral).signum() == offset.signum() {
                    VerticalState::Rising(s)
                } else {
                    VerticalState::Falling(s)
                };
                (state, 0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{LANE_SPACING, SENSOR_SMOOTHING};
    use proptest::prelude::*;

    fn controller() -> PlayerController {
        PlayerController::new(PlayerTuning::default(), VerticalMode::Discrete, SENSOR_SMOOTHING)
    }

    fn run_ticks(p: &mut PlayerController, n: u32) {
        for _ in 0..n {
            p.tick();
        }
    }

    #[test]
    fn test_starts_centered_and_neutral() {
        let p = controller();
        let pose = p.pose();
        assert_eq!(pose.lane, Lane::Center);
        assert_eq!(pose.position, Vec3::new(0.0, 0.0, -15.0));
        assert_eq!(pose.vertical_state, VerticalState::Neutral);
    }

    #[test]
    fn test_lane_moves_clamp_at_boundaries() {
        let mut p = controller();
        p.handle_commands(&[Command::MoveLeft, Command::MoveLeft, Command::MoveLeft]);
        assert_eq!(p.lane(), Lane::Left);
        p.handle_commands(&[Command::MoveRight; 5]);
        assert_eq!(p.lane(), Lane::Right);
    }

    #[test]
    fn test_lane_easing_snaps_without_overshoot() {
        let mut p = controller();
        p.handle_commands(&[Command::MoveRight]);
        let mut last = p.pose().x();
        for _ in 0..40 {
            p.tick();
            let x = p.pose().x();
            assert!(x >= last && x <= LANE_SPACING);
            last = x;
        }
        assert_eq!(p.pose().x(), LANE_SPACING);
    }

    #[test]
    fn test_full_jump_returns_exactly_to_neutral() {
        let mut p = controller();
        p.handle_commands(&[Command::Jump]);
        assert_eq!(p.pose().vertical_state, VerticalState::Rising(Stance::Jumping));

        run_ticks(&mut p, 10);
        assert_eq!(p.pose().vertical_state, VerticalState::Peak(Stance::Jumping));
        assert!((p.pose().vertical_offset() - 3.0).abs() < 1e-4);

        run_ticks(&mut p, 10);
        assert_eq!(p.pose().vertical_state, VerticalState::Falling(Stance::Jumping));
        assert!((p.pose().vertical_offset() - 3.0).abs() < 1e-4);

        run_ticks(&mut p, 10);
        assert_eq!(p.pose().vertical_state, VerticalState::Neutral);
        assert_eq!(p.pose().vertical_offset(), 0.0);
    }

    #[test]
    fn test_crouch_mirrors_jump() {
        let mut p = controller();
        p.handle_commands(&[Command::Crouch]);
        run_ticks(&mut p, 10);
        assert!((p.pose().vertical_offset() + 3.0).abs() < 1e-4);
        assert_eq!(p.pose().vertical_state.as_str(), "CROUCHING_HOLD");
        run_ticks(&mut p, 20);
        assert_eq!(p.pose().vertical_offset(), 0.0);
    }

    #[test]
    fn test_jump_and_crouch_are_mutually_exclusive() {
        let mut p = controller();
        p.handle_commands(&[Command::Jump, Command::Crouch]);
        run_ticks(&mut p, 5);
        p.handle_commands(&[Command::Crouch, Command::Jump]);
        let pose = p.pose();
        assert_eq!(pose.vertical_state.stance(), Some(Stance::Jumping));
        assert_eq!(pose.state_timer, 25);
        assert!(pose.vertical_offset() > 0.0);
    }

    #[test]
    fn test_jump_snaps_to_custom_neutral() {
        let tuning = PlayerTuning {
            neutral_y: -2.0,
            vertical_step: 0.37,
            ..Default::default()
        };
        let mut p = PlayerController::new(tuning, VerticalMode::Discrete, SENSOR_SMOOTHING);
        p.handle_commands(&[Command::Jump]);
        run_ticks(&mut p, 30);
        assert_eq!(p.pose().vertical_offset(), -2.0);
    }

    #[test]
    fn test_continuous_tracks_signal_and_holds_last_value() {
        let mut p = PlayerController::new(PlayerTuning::default(), VerticalMode::Continuous, 0.2);
        p.handle_vertical_signal(Some(3.0));
        p.tick();
        assert!((p.pose().vertical_offset() - 0.6).abs() < 1e-5);
        assert_eq!(p.pose().vertical_state, VerticalState::Rising(Stance::Jumping));

        // No new sample: keep chasing the old target
        for _ in 0..100 {
            p.handle_vertical_signal(None);
            p.tick();
        }
        assert_eq!(p.pose().vertical_offset(), 3.0);
        assert_eq!(p.pose().vertical_state, VerticalState::Peak(Stance::Jumping));

        p.handle_vertical_signal(Some(0.0));
        p.tick();
        assert_eq!(p.pose().vertical_state, VerticalState::Falling(Stance::Jumping));
    }

    #[test]
    fn test_continuous_ignores_jump_commands() {
        let mut p = PlayerController::new(PlayerTuning::default(), VerticalMode::Continuous, 0.2);
        p.handle_commands(&[Command::Jump]);
        run_ticks(&mut p, 10);
        assert_eq!(p.pose().vertical_offset(), 0.0);
        assert_eq!(p.pose().vertical_state, VerticalState::Neutral);
    }

    #[test]
    fn test_reset_keeps_mode() {
        let mut p = PlayerController::new(PlayerTuning::default(), VerticalMode::Continuous, 0.2);
        p.handle_commands(&[Command::MoveLeft]);
        p.handle_vertical_signal(Some(-3.0));
        run_ticks(&mut p, 20);
        p.reset();
        assert_eq!(p.vertical_mode(), VerticalMode::Continuous);
        assert_eq!(p.pose().position, Vec3::new(0.0, 0.0, -15.0));
        assert_eq!(p.lane(), Lane::Center);
    }

    fn command() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::MoveLeft),
            Just(Command::MoveRight),
            Just(Command::Jump),
            Just(Command::Crouch),
        ]
    }

    proptest! {
        #[test]
        fn prop_lane_index_stays_in_bounds(script in prop::collection::vec(prop::collection::vec(command(), 0..4), 0..200)) {
            let mut p = controller();
            for commands in &script {
                p.handle_commands(commands);
                p.tick();
                let pose = p.pose();
                prop_assert!(pose.lane.index() <= 2);
                prop_assert!(pose.x() >= -LANE_SPACING && pose.x() <= LANE_SPACING);
            }
        }

        #[test]
        fn prop_vertical_returns_to_neutral(jump in any::<bool>(), idle in 0u32..20) {
            let mut p = controller();
            run_ticks(&mut p, idle);
            p.handle_commands(&[if jump { Command::Jump } else { Command::Crouch }]);
            run_ticks(&mut p, 30);
            prop_assert_eq!(p.pose().vertical_offset(), 0.0);
            prop_assert_eq!(p.pose().vertical_state, VerticalState::Neutral);
        }
    }
}
