//! Telemetry projection
//!
//! Pure mapping from simulation state to bounded readout values.

use serde::{Deserialize, Serialize};

use super::state::{Phase, SimulationState};
use crate::tuning::Tuning;
use crate::{circular_distance, heading_degrees};

/// Status line shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Rotating, not aligned
    Scanning,
    /// Rotating and aligned, install will be accepted
    Ready,
    /// Lowering onto the target
    Descending,
    /// Seated, waiting for the next cycle
    Installed,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Scanning => "SCANNING...",
            Status::Ready => "READY",
            Status::Descending => "DESCENDING",
            Status::Installed => "INSTALLED",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-tick readout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Current heading, degrees [0, 360)
    pub current_angle_deg: f32,
    /// Target heading, degrees [0, 360)
    pub target_angle_deg: f32,
    /// Signed angular velocity times the display scale
    pub velocity_scaled: f32,
    pub is_aligned: bool,
    pub status: Status,
    /// Closeness to target, 0-100 (100 = on target)
    pub sync_percent: f32,
    /// Momentum gauge fill, 0-100
    pub momentum_percent: f32,
    pub phase: Phase,
}

impl Telemetry {
    /// Project `state` into a readout
    pub fn project(state: &SimulationState, tuning: &Tuning) -> Self {
        let is_aligned = state.is_aligned(tuning.alignment_threshold);
        let velocity_scaled = state.velocity * tuning.velocity_display_scale;
        let distance_deg = circular_distance(state.angle, state.target_angle).to_degrees();

        Self {
            current_angle_deg: heading_degrees(state.angle),
            target_angle_deg: heading_degrees(state.target_angle),
            velocity_scaled,
            is_aligned,
            status: status_for(state.phase, is_aligned),
            sync_percent: (100.0 - distance_deg * 2.0).clamp(0.0, 100.0),
            momentum_percent: (velocity_scaled.abs() * 4.0).min(100.0),
            phase: state.phase,
        }
    }
}

/// Status precedence: Descending, Installed, Ready, Scanning
pub fn status_for(phase: Phase, is_aligned: bool) -> Status {
    match phase {
        Phase::Descending => Status::Descending,
        Phase::Success => Status::Installed,
        Phase::Rotating if is_aligned => Status::Ready,
        Phase::Rotating => Status::Scanning,
    }
}
