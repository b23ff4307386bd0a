//! Simulation state and core types
//!
//! Everything the engine mutates lives here; the RNG is held by the engine.

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::circular_distance;
use crate::consts::ANGLE_RENORMALIZE_TURNS;

/// Current phase of a play cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Player steers the rig toward the target heading
    #[default]
    Rotating,
    /// Scripted descent onto the target, no rotation input
    Descending,
    /// Module seated, waiting for the scheduled reset
    Success,
}

/// Handle identifying the reset scheduled for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResetTicket {
    pub cycle: u64,
}

/// Notable transitions, drained by the host after each step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Heading entered the alignment window
    Aligned,
    /// Heading left the alignment window
    AlignmentLost,
    /// Install confirmed, descent begins
    DescentStarted,
    /// Module seated; host should schedule the reset for `ticket`
    CycleComplete { ticket: ResetTicket },
    /// Fresh cycle with a new target
    CycleStarted { cycle: u64, target_angle: f32 },
}

/// Mutable physical state of the rig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Cumulative rotation (radians, not wrapped)
    pub angle: f32,
    /// Angular velocity (radians/tick)
    pub velocity: f32,
    /// Target heading (radians, [0, 2π))
    pub target_angle: f32,
    /// Current phase
    pub phase: Phase,
    /// Descent progress (0 at rest height, negative while lowering)
    pub vertical_offset: f32,
    /// Cycle counter, bumped on every reset
    pub cycle: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl SimulationState {
    /// Create a state at rest with a target drawn from `rng`
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            angle: 0.0,
            velocity: 0.0,
            target_angle: draw_target(rng),
            phase: Phase::Rotating,
            vertical_offset: 0.0,
            cycle: 0,
            time_ticks: 0,
        }
    }

    /// Start the next cycle: new target, zero motion, back to Rotating
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.angle = 0.0;
        self.velocity = 0.0;
        self.vertical_offset = 0.0;
        self.target_angle = draw_target(rng);
        self.phase = Phase::Rotating;
        self.cycle += 1;
    }

    /// Whether the heading is within `threshold` of the target
    #[inline]
    pub fn is_aligned(&self, threshold: f32) -> bool {
        is_aligned(self.angle, self.target_angle, threshold)
    }

    /// Shed whole turns once the stored angle grows large
    pub fn renormalize_angle(&mut self) {
        let limit = ANGLE_RENORMALIZE_TURNS * TAU;
        if self.angle.abs() >= limit {
            let turns = (self.angle / TAU).trunc();
            self.angle -= turns * TAU;
        }
    }
}

/// Pure alignment test on wrapped headings
#[inline]
pub fn is_aligned(angle: f32, target: f32, threshold: f32) -> bool {
    circular_distance(angle, target) < threshold
}

/// Draw a target heading uniformly in [0, 2π)
pub fn draw_target<R: Rng>(rng: &mut R) -> f32 {
    rng.random_range(0.0..TAU)
}
