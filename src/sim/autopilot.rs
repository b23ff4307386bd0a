//! Idle/demo steering
//!
//! Produces held keys that bring the rig onto its target and confirm the
//! install, the way an attract mode plays the game by itself.

use super::state::{Phase, SimulationState};
use super::tick::InputState;
use crate::shortest_arc;
use crate::tuning::Tuning;

/// Desired speed per radian of remaining heading error
const APPROACH_GAIN: f32 = 0.08;
/// Cruise speed as a share of the one-key terminal velocity
const CRUISE_FRACTION: f32 = 0.8;

/// Choose the keys to hold this tick
pub fn steer(state: &SimulationState, tuning: &Tuning) -> InputState {
    if state.phase != Phase::Rotating {
        return InputState::NONE;
    }

    let error = shortest_arc(state.angle, state.target_angle);
    let cruise = (tuning.terminal_velocity() * CRUISE_FRACTION).min(tuning.max_velocity);
    let desired = (error * APPROACH_GAIN).clamp(-cruise, cruise);

    // Accelerate toward the desired speed, coast when close enough
    let slack = tuning.accel * 0.5;
    InputState {
        left: state.velocity > desired + slack,
        right: state.velocity < desired - slack,
        install: state.is_aligned(tuning.alignment_threshold),
    }
}
