//! The three fixed lanes

use serde::{Deserialize, Serialize};

/// One of the three horizontal tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

impl Lane {
    /// All lanes, left to right
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    /// Lane index in [0, 2]
    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Center => 1,
            Lane::Right => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Neighbor to the left; `None` at the boundary (no wraparound)
    pub fn left(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Neighbor to the right; `None` at the boundary
    pub fn right(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Lane center x for the given spacing
    pub fn x(self, spacing: f32) -> f32 {
        (self.index() as f32 - 1.0) * spacing
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lane::Left => "LEFT",
            Lane::Center => "CENTER",
            Lane::Right => "RIGHT",
        }
    }
}
