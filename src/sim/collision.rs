//! Player vs. obstacle hit test
//!
//! Pure function of the current pose and slots. A player caught between
//! lanes cannot be hit that tick.

use super::lane::Lane;
use super::obstacles::{Obstacle, ObstacleKind};
use super::player::PlayerPose;
use crate::tuning::{CollisionTuning, ObstacleTuning};

/// Lane whose center is within `tolerance` of `x`, if any
pub fn lane_at(x: f32, lane_spacing: f32, tolerance: f32) -> Option<Lane> {
    Lane::ALL
        .into_iter()
        .find(|lane| (x - lane.x(lane_spacing)).abs() < tolerance)
}

/// Vertical overlap test for a single obstacle
fn overlaps_vertically(player_y: f32, obstacle: &Obstacle, point_radius: f32, wall_half_height: f32) -> bool {
    let gap = (player_y - obstacle.vertical_offset).abs();
    match obstacle.kind {
        ObstacleKind::Wall => gap <= wall_half_height,
        ObstacleKind::Sphere => gap < point_radius,
    }
}

/// Returns true when the player is touching the obstacle in its current lane
pub fn detect(
    pose: &PlayerPose,
    slots: &[Obstacle],
    lane_spacing: f32,
    collision: &CollisionTuning,
    obstacles: &ObstacleTuning,
) -> bool {
    let Some(lane) = lane_at(pose.x(), lane_spacing, collision.lane_tolerance) else {
        return false;
    };

    slots.iter().filter(|o| o.lane == lane).any(|o| {
        o.depth_to(pose.z()) < collision.depth_threshold
            && overlaps_vertically(
                pose.vertical_offset(),
                o,
                collision.point_radius,
                obstacles.lane_half_height,
            )
    })
}
