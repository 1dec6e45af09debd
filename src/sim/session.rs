//! One run from control selection to game over
//!
//! The host calls [`GameSession::tick`] once per frame with that frame's
//! input and reacts to the returned [`SessionEvent`]s.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::collision::detect;
use super::input::TickInput;
use super::obstacles::{Obstacle, ObstacleField};
use super::player::{PlayerController, PlayerPose, VerticalMode};
use super::timer::{RunTimer, format_elapsed};
use crate::platform::time::{Clock, SystemClock};
use crate::tuning::Tuning;

/// Session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the player to pick a control method
    Selecting,
    /// Control chosen, "get ready" countdown running
    CountdownToStart,
    /// Active gameplay
    Running,
    /// Collision happened; final time on screen
    Ended,
}

/// How the player drives the cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Arrow keys / WASD with keyframed jump and crouch
    #[default]
    Keyboard,
    /// Joystick for lanes; the distance sensor either tracks height
    /// continuously or triggers timed jumps/crouches by distance zone
    Sensor { vertical: VerticalMode },
}

impl ControlMode {
    pub fn vertical_mode(self) -> VerticalMode {
        match self {
            ControlMode::Keyboard => VerticalMode::Discrete,
            ControlMode::Sensor { vertical } => vertical,
        }
    }
}

/// Notifications for the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    CountdownStarted { mode: ControlMode },
    RunStarted { seed: u64 },
    RunEnded { elapsed: Duration, formatted: String },
    ReturnedToSelection,
    Paused,
    Resumed,
}

/// Everything the host needs to draw or compare a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub paused: bool,
    pub player: PlayerPose,
    pub obstacles: [Obstacle; 3],
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct GameSession<C: Clock = SystemClock> {
    tuning: Tuning,
    phase: SessionPhase,
    /// Ticks left in the countdown or game-over display
    phase_ticks: u32,
    control: ControlMode,
    seed: u64,
    player: PlayerController,
    obstacles: ObstacleField,
    timer: RunTimer<C>,
    paused: bool,
    run_ticks: u64,
}

impl<C: Clock> GameSession<C> {
    /// `tuning` is expected to have passed [`Tuning::validate`]
    pub fn new(tuning: Tuning, clock: C, seed: u64) -> Self {
        let player = PlayerController::new(
            tuning.player.clone(),
            VerticalMode::Discrete,
            tuning.sensor.smoothing,
        );
        let obstacles = ObstacleField::new(tuning.obstacles.clone(), seed);
        let mut timer = RunTimer::new(clock);
        timer.stop();
        Self {
            tuning,
            phase: SessionPhase::Selecting,
            phase_ticks: 0,
            control: ControlMode::Keyboard,
            seed,
            player,
            obstacles,
            timer,
            paused: false,
            run_ticks: 0,
        }
    }

    /// Choose the control method and start the countdown (Selecting only)
    pub fn select_control(&mut self, mode: ControlMode) -> Option<SessionEvent> {
        if self.phase != SessionPhase::Selecting {
            return None;
        }
        self.control = mode;
        self.player
            .set_vertical_control(mode.vertical_mode(), self.tuning.sensor.smoothing);
        log::info!("Control selected: {:?}", mode);

        if self.tuning.session.countdown_ticks == 0 {
            let seed = self.next_seed();
            self.start_new_run(seed);
            return Some(SessionEvent::RunStarted { seed });
        }
        self.phase = SessionPhase::CountdownToStart;
        self.phase_ticks = self.tuning.session.countdown_ticks;
        Some(SessionEvent::CountdownStarted { mode })
    }

    /// Reset player, obstacles and clock and go straight to Running
    pub fn start_new_run(&mut self, seed: u64) {
        self.seed = seed;
        self.player.reset();
        self.obstacles = ObstacleField::new(self.tuning.obstacles.clone(), seed);
        self.timer.reset();
        self.paused = false;
        self.run_ticks = 0;
        self.phase_ticks = 0;
        self.phase = SessionPhase::Running;
        log::info!("Run started (seed {}, {:?} controls)", seed, self.control);
    }

    /// Advance the session by one fixed tick
    pub fn tick(&mut self, input: &TickInput) -> Option<SessionEvent> {
        match self.phase {
            SessionPhase::Selecting => None,
            SessionPhase::CountdownToStart => {
                self.phase_ticks = self.phase_ticks.saturating_sub(1);
                if self.phase_ticks > 0 {
                    return None;
                }
                let seed = self.next_seed();
                self.start_new_run(seed);
                Some(SessionEvent::RunStarted { seed })
            }
            SessionPhase::Running => self.tick_running(input),
            SessionPhase::Ended => {
                self.phase_ticks = self.phase_ticks.saturating_sub(1);
                if self.phase_ticks > 0 {
                    return None;
                }
                self.phase = SessionPhase::Selecting;
                log::info!("Back to control selection");
                Some(SessionEvent::ReturnedToSelection)
            }
        }
    }

    fn tick_running(&mut self, input: &TickInput) -> Option<SessionEvent> {
        if input.pause {
            return Some(if self.paused {
                self.resume()
            } else {
                self.pause()
            });
        }
        if self.paused {
            return None;
        }

        self.player.handle_commands(&input.commands);
        self.player.handle_vertical_signal(input.vertical_signal);
        self.player.tick();
        self.obstacles.tick();
        self.run_ticks += 1;

        let pose = self.player.pose();
        let hit = detect(
            &pose,
            self.obstacles.slots(),
            self.tuning.player.lane_spacing,
            &self.tuning.collision,
            &self.tuning.obstacles,
        );
        if !hit {
            return None;
        }

        self.timer.stop();
        self.phase = SessionPhase::Ended;
        self.phase_ticks = self.tuning.session.end_display_ticks.max(1);
        let elapsed = self.timer.elapsed();
        let formatted = format_elapsed(elapsed);
        log::info!(
            "Run ended after {} ticks in {} lane: {}",
            self.run_ticks,
            pose.lane.as_str(),
            formatted
        );
        Some(SessionEvent::RunEnded { elapsed, formatted })
    }

    fn pause(&mut self) -> SessionEvent {
        self.paused = true;
        self.timer.pause();
        log::info!("Paused");
        SessionEvent::Paused
    }

    fn resume(&mut self) -> SessionEvent {
        self.paused = false;
        self.timer.resume();
        log::info!("Resumed");
        SessionEvent::Resumed
    }

    /// Seed for the next run, derived from the current one
    fn next_seed(&self) -> u64 {
        self.seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn control_mode(&self) -> ControlMode {
        self.control
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Ticks simulated in the current run
    pub fn run_ticks(&self) -> u64 {
        self.run_ticks
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn timer(&self) -> &RunTimer<C> {
        &self.timer
    }

    pub fn elapsed_formatted(&self) -> String {
        self.timer.formatted()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            paused: self.paused,
            player: self.player.pose(),
            obstacles: self.obstacles.slots().clone(),
            elapsed: self.timer.elapsed(),
        }
    }
}
