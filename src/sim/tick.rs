//! Per-frame simulation tick
//!
//! Rotation physics, the alignment check and the phase machine. Constants are
//! per tick; the host advances one tick per display refresh.

use super::state::{Phase, ResetTicket, SimEvent, SimulationState};
use crate::tuning::Tuning;

/// Fraction of a descent step treated as "reached" to absorb float drift
const DESCENT_TOLERANCE: f32 = 1e-3;

/// Held keys for a single tick (polled, not edge-triggered)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    /// Rotate counter-clockwise (ArrowLeft)
    pub left: bool,
    /// Rotate clockwise (ArrowRight)
    pub right: bool,
    /// Confirm install (Space)
    pub install: bool,
}

impl InputState {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        install: false,
    };
}

/// Advance the state by one tick
pub fn tick(
    state: &mut SimulationState,
    input: &InputState,
    tuning: &Tuning,
    events: &mut Vec<SimEvent>,
) {
    state.time_ticks += 1;

    match state.phase {
        Phase::Rotating => rotate(state, input, tuning, events),
        Phase::Descending => descend(state, tuning, events),
        // Seated; only the scheduled reset moves us on
        Phase::Success => {}
    }
}

fn rotate(
    state: &mut SimulationState,
    input: &InputState,
    tuning: &Tuning,
    events: &mut Vec<SimEvent>,
) {
    let threshold = tuning.alignment_threshold;
    let was_aligned = state.is_aligned(threshold);

    if input.left {
        state.velocity -= tuning.accel;
    }
    if input.right {
        state.velocity += tuning.accel;
    }

    state.velocity *= tuning.friction;
    state.velocity = state.velocity.clamp(-tuning.max_velocity, tuning.max_velocity);
    state.angle += state.velocity;
    state.renormalize_angle();

    let aligned = state.is_aligned(threshold);
    if aligned != was_aligned {
        events.push(if aligned {
            SimEvent::Aligned
        } else {
            SimEvent::AlignmentLost
        });
    }

    if input.install && aligned {
        state.phase = Phase::Descending;
        state.velocity = 0.0;
        events.push(SimEvent::DescentStarted);
        log::info!(
            "Cycle {}: install confirmed at {:.1}° (target {:.1}°)",
            state.cycle,
            crate::heading_degrees(state.angle),
            crate::heading_degrees(state.target_angle)
        );
    }
}

fn descend(state: &mut SimulationState, tuning: &Tuning, events: &mut Vec<SimEvent>) {
    state.velocity = 0.0;

    let stop = tuning.stop_offset;
    state.vertical_offset -= tuning.descend_speed;

    if state.vertical_offset <= stop + tuning.descend_speed * DESCENT_TOLERANCE {
        state.vertical_offset = stop;
        state.phase = Phase::Success;
        events.push(SimEvent::CycleComplete {
            ticket: ResetTicket { cycle: state.cycle },
        });
        log::info!("Cycle {}: module seated", state.cycle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(angle: f32, target: f32) -> SimulationState {
        SimulationState {
            angle,
            velocity: 0.0,
            target_angle: target,
            phase: Phase::Rotating,
            vertical_offset: 0.0,
            cycle: 0,
            time_ticks: 0,
        }
    }

    const RIGHT: InputState = InputState {
        left: false,
        right: true,
        install: false,
    };

    #[test]
    fn test_hold_right_settles_below_clamp() {
        let tuning = Tuning::default();
        let mut s = state(0.0, 3.0);
        let mut events = Vec::new();

        for _ in 0..100 {
            tick(&mut s, &RIGHT, &tuning, &mut events);
            assert!(s.velocity <= tuning.max_velocity);
        }

        // Terminal velocity accel * f / (1 - f) ≈ 0.0152
        assert!((s.velocity - 0.0152).abs() < 2e-4, "velocity {}", s.velocity);
        assert!(s.velocity < tuning.max_velocity);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let tuning = Tuning::default();
        let mut s = state(0.0, 3.0);
        s.velocity = 0.01;
        let both = InputState {
            left: true,
            right: true,
            install: false,
        };
        tick(&mut s, &both, &tuning, &mut Vec::new());
        assert!((s.velocity - 0.01 * tuning.friction).abs() < 1e-7);
    }

    #[test]
    fn test_clamp_engages_with_fast_tuning() {
        let tuning = Tuning {
            accel: 0.01,
            ..Default::default()
        };
        let mut s = state(0.0, 3.0);
        for _ in 0..50 {
            tick(&mut s, &RIGHT, &tuning, &mut Vec::new());
        }
        assert_eq!(s.velocity, tuning.max_velocity);
    }

    #[test]
    fn test_friction_decay_is_strict() {
        let tuning = Tuning::default();
        let mut s = state(0.0, 3.0);
        s.velocity = -0.02;
        let mut last = s.velocity.abs();

        for _ in 0..200 {
            tick(&mut s, &InputState::NONE, &tuning, &mut Vec::new());
            let mag = s.velocity.abs();
            assert!(mag < last);
            last = mag;
        }
        assert!(last < 1e-5);
    }

    #[test]
    fn test_install_requires_alignment() {
        let tuning = Tuning::default();
        let install = InputState {
            install: true,
            ..Default::default()
        };

        let mut far = state(0.0, 1.0);
        tick(&mut far, &install, &tuning, &mut Vec::new());
        assert_eq!(far.phase, Phase::Rotating);

        let mut near = state(0.0, 0.05);
        let mut events = Vec::new();
        tick(&mut near, &install, &tuning, &mut events);
        assert_eq!(near.phase, Phase::Descending);
        assert_eq!(near.velocity, 0.0);
        assert_eq!(events, vec![SimEvent::DescentStarted]);
    }

    #[test]
    fn test_alignment_edges_emit_events() {
        let tuning = Tuning::default();
        // Just outside the window, drifting in
        let mut s = state(0.0, 0.08);
        s.velocity = 0.02;
        let mut events = Vec::new();
        tick(&mut s, &InputState::NONE, &tuning, &mut events);
        assert_eq!(events, vec![SimEvent::Aligned]);

        // Push through and out the other side
        events.clear();
        for _ in 0..10 {
            tick(&mut s, &RIGHT, &tuning, &mut events);
        }
        assert_eq!(events, vec![SimEvent::AlignmentLost]);
    }

    #[test]
    fn test_descent_takes_forty_ticks() {
        let tuning = Tuning::default();
        let mut s = state(0.0, 0.0);
        s.phase = Phase::Descending;
        let mut events = Vec::new();

        let mut ticks = 0;
        while s.phase == Phase::Descending {
            tick(&mut s, &InputState::NONE, &tuning, &mut events);
            ticks += 1;
            assert!(ticks <= 100, "descent never finished");
        }

        assert_eq!(ticks, 40);
        assert_eq!(s.phase, Phase::Success);
        assert_eq!(s.vertical_offset, tuning.stop_offset);
        assert_eq!(
            events,
            vec![SimEvent::CycleComplete {
                ticket: ResetTicket { cycle: 0 }
            }]
        );
    }

    #[test]
    fn test_longest_valid_descent_finishes() {
        use crate::tuning::MAX_DESCENT_TICKS;

        let tuning = Tuning {
            stop_offset: -(MAX_DESCENT_TICKS * crate::consts::DESCEND_SPEED),
            ..Default::default()
        };
        assert!(tuning.validate().is_ok());

        let mut s = state(0.0, 0.0);
        s.phase = Phase::Descending;
        let limit = (MAX_DESCENT_TICKS * 1.01) as u32;
        let mut ticks = 0;
        while s.phase == Phase::Descending {
            tick(&mut s, &InputState::NONE, &tuning, &mut Vec::new());
            ticks += 1;
            assert!(ticks <= limit, "descent stalled at {}", s.vertical_offset);
        }
        assert_eq!(s.vertical_offset, tuning.stop_offset);
    }

    #[test]
    fn test_descent_ignores_rotation_input() {
        let tuning = Tuning::default();
        let mut s = state(0.5, 0.5);
        s.phase = Phase::Descending;
        s.velocity = 0.01;

        let mut last_offset = s.vertical_offset;
        for _ in 0..10 {
            tick(&mut s, &RIGHT, &tuning, &mut Vec::new());
            assert_eq!(s.velocity, 0.0);
            assert_eq!(s.angle, 0.5);
            assert!(s.vertical_offset < last_offset);
            last_offset = s.vertical_offset;
        }
    }

    #[test]
    fn test_success_holds_until_reset() {
        let tuning = Tuning::default();
        let mut s = state(0.2, 0.2);
        s.phase = Phase::Success;
        s.vertical_offset = tuning.stop_offset;
        let before = s.clone();

        let mut events = Vec::new();
        for _ in 0..500 {
            tick(&mut s, &RIGHT, &tuning, &mut events);
        }
        assert_eq!(s.phase, Phase::Success);
        assert_eq!(s.angle, before.angle);
        assert_eq!(s.vertical_offset, before.vertical_offset);
        assert!(events.is_empty());
        assert_eq!(s.time_ticks, 500);
    }
}
