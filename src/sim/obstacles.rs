//! Per-lane obstacle spawning and recycling
//!
//! Each lane owns exactly one obstacle slot for the whole run. A slot parks
//! at the spawn depth while its pre-spawn delay counts down, then advances
//! toward the player and respawns with fresh random attributes once it has
//! passed the recycle depth.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lane::Lane;
use crate::tuning::ObstacleTuning;

/// Obstacle archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Point obstacle, dodged by jumping over or crouching under it
    #[default]
    Sphere,
    /// Lane obstacle spanning the whole lane height, dodged only by leaving the lane
    Wall,
}

/// One lane's obstacle slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub lane: Lane,
    /// World depth; grows toward the player each tick
    pub z: f32,
    pub kind: ObstacleKind,
    pub vertical_offset: f32,
    /// Ticks left parked at spawn depth
    pub spawn_delay: u32,
    /// Cosmetic RGB
    pub color: Vec3,
}

impl Obstacle {
    fn parked(lane: Lane, spawn_z: f32) -> Self {
        Self {
            lane,
            z: spawn_z,
            kind: ObstacleKind::Sphere,
            vertical_offset: 0.0,
            spawn_delay: 0,
            color: Vec3::ONE,
        }
    }

    /// Distance along the direction of travel to a given depth
    #[inline]
    pub fn depth_to(&self, z: f32) -> f32 {
        (self.z - z).abs()
    }

    pub fn is_parked(&self) -> bool {
        self.spawn_delay > 0
    }
}

/// The three obstacle slots and the RNG that refills them
#[derive(Debug, Clone)]
pub struct ObstacleField {
    tuning: ObstacleTuning,
    rng: Pcg32,
    slots: [Obstacle; 3],
    /// Total respawns since the run started
    respawns: u64,
}

impl ObstacleField {
    /// Fresh field: every slot parked at spawn depth with randomized attributes
    ///
    /// `tuning` is expected to be validated. An empty `point_offsets` list
    /// puts spheres at the lane obstacle offset instead.
    pub fn new(tuning: ObstacleTuning, seed: u64) -> Self {
        let spawn_z = tuning.spawn_z;
        let mut field = Self {
            rng: Pcg32::seed_from_u64(seed),
            slots: Lane::ALL.map(|lane| Obstacle::parked(lane, spawn_z)),
            respawns: 0,
            tuning,
        };
        for index in 0..field.slots.len() {
            field.respawn(index);
        }
        field.respawns = 0;
        field
    }

    pub fn slots(&self) -> &[Obstacle; 3] {
        &self.slots
    }

    pub fn slot(&self, lane: Lane) -> &Obstacle {
        &self.slots[lane.index()]
    }

    pub fn respawns(&self) -> u64 {
        self.respawns
    }

    /// Advance every slot one tick, then recycle the ones that went past
    pub fn tick(&mut self) {
        let step = self.tuning.step;
        for slot in &mut self.slots {
            if slot.spawn_delay > 0 {
                slot.spawn_delay -= 1;
            } else {
                slot.z += step;
            }
        }

        for index in 0..self.slots.len() {
            if self.slots[index].z > self.tuning.recycle_z {
                self.respawn(index);
            }
        }
    }

    /// Re-roll one slot. Never leaves all three lanes walled off.
    fn respawn(&mut self, index: usize) {
        let others_walled = self
            .slots
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .all(|(_, o)| o.kind == ObstacleKind::Wall);

        let mut kind = if self.rng.random_bool(0.5) {
            ObstacleKind::Wall
        } else {
            ObstacleKind::Sphere
        };
        if kind == ObstacleKind::Wall && others_walled {
            kind = ObstacleKind::Sphere;
        }

        let vertical_offset = match kind {
            ObstacleKind::Sphere => match self.tuning.point_offsets.len() {
                0 => self.tuning.lane_offset,
                n => self.tuning.point_offsets[self.rng.random_range(0..n)],
            },
            ObstacleKind::Wall => self.tuning.lane_offset,
        };
        let spawn_delay = self.rng.random_range(0..=self.tuning.max_spawn_delay_ticks);
        let color = Vec3::new(
            self.rng.random_range(0.2..1.0),
            self.rng.random_range(0.2..1.0),
            self.rng.random_range(0.2..1.0),
        );

        let slot = &mut self.slots[index];
        slot.z = self.tuning.spawn_z;
        slot.kind = kind;
        slot.vertical_offset = vertical_offset;
        slot.spawn_delay = spawn_delay;
        slot.color = color;
        self.respawns += 1;

        log::debug!(
            "Respawn {} lane: {:?} offset={} delay={}",
            slot.lane.as_str(),
            kind,
            vertical_offset,
            spawn_delay
        );
    }
}
