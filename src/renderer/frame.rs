//! Per-frame instance data for 3D rendering

use bytemuck::{Pod, Zeroable};

use crate::consts::PLAYER_HALF_SIZE;
use crate::platform::time::Clock;
use crate::sim::{GameSession, ObstacleKind, SessionPhase};

/// Shape to draw for an instance
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceKind {
    Cube = 0,
    Sphere = 1,
    Wall = 2,
}

/// One drawable object, laid out for a GPU instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub position: [f32; 3],
    /// Half-size for cubes and walls, radius for spheres
    pub size: f32,
    pub color: [f32; 3],
    /// `InstanceKind` discriminant
    pub kind: u32,
}

/// Colors for game elements
pub mod colors {
    pub const PLAYER: [f32; 3] = [0.9, 0.3, 0.6];
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub player: Instance,
    /// Up to three; slots still waiting out their spawn delay are omitted
    pub obstacles: Vec<Instance>,
    /// Survival time, `MM:SS:mmm`
    pub hud_time: String,
    pub phase: SessionPhase,
}

impl RenderFrame {
    pub fn from_session<C: Clock>(session: &GameSession<C>) -> Self {
        let pose = session.player().pose();
        let tuning = session.tuning();

        let obstacles = session
            .obstacles()
            .slots()
            .iter()
            .filter(|o| !o.is_parked())
            .map(|o| {
                let (kind, size) = match o.kind {
                    ObstacleKind::Sphere => (InstanceKind::Sphere, tuning.collision.point_radius),
                    ObstacleKind::Wall => (InstanceKind::Wall, tuning.obstacles.lane_half_height),
                };
                Instance {
                    position: [
                        o.lane.x(tuning.player.lane_spacing),
                        o.vertical_offset,
                        o.z,
                    ],
                    size,
                    color: o.color.to_array(),
                    kind: kind as u32,
                }
            })
            .collect();

        Self {
            player: Instance {
                position: pose.position.to_array(),
                size: PLAYER_HALF_SIZE,
                color: colors::PLAYER,
                kind: InstanceKind::Cube as u32,
            },
            obstacles,
            hud_time: session.elapsed_formatted(),
            phase: session.phase(),
        }
    }

    /// All instances as raw bytes, player first
    pub fn instance_bytes(&self) -> Vec<u8> {
        let mut all = Vec::with_capacity(1 + self.obstacles.len());
        all.push(self.player);
        all.extend_from_slice(&self.obstacles);
        bytemuck::cast_slice::<Instance, u8>(&all[..]).to_vec()
    }
}
