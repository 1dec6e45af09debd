//! Per-tick input commands
//!
//! Keyboard, joystick and replay producers all reduce to the same
//! [`TickInput`] before the simulation sees them.

use serde::{Deserialize, Serialize};

/// Discrete control command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Jump,
    Crouch,
}

impl Command {
    /// Map a host key name (arrows or WASD) to a command
    pub fn from_key_name(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "left" | "arrowleft" | "a" => Some(Command::MoveLeft),
            "right" | "arrowright" | "d" => Some(Command::MoveRight),
            "up" | "arrowup" | "w" => Some(Command::Jump),
            "down" | "arrowdown" | "s" => Some(Command::Crouch),
            _ => None,
        }
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Discrete commands in arrival order
    pub commands: Vec<Command>,
    /// Target vertical offset from a continuous controller (last known value)
    pub vertical_signal: Option<f32>,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn with_commands(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.vertical_signal.is_none() && !self.pause
    }
}
