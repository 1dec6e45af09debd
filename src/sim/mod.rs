//! Fixed-step simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One tick per rendered frame, no blocking
//! - Seeded RNG only
//! - No rendering or platform dependencies beyond the injected clock

pub mod collision;
pub mod input;
pub mod lane;
pub mod obstacles;
pub mod player;
pub mod session;
pub mod timer;

pub use collision::{detect, lane_at};
pub use input::{Command, TickInput};
pub use lane::Lane;
pub use obstacles::{Obstacle, ObstacleField, ObstacleKind};
pub use player::{PlayerController, PlayerPose, Stance, VerticalControl, VerticalMode, VerticalState};
pub use session::{ControlMode, GameSession, SessionEvent, SessionPhase, SessionSnapshot};
pub use timer::{RunTimer, format_elapsed};
