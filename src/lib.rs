//! Lighthouse Rotation - steer a crane rig onto a target heading and set it down
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rotation physics, alignment, phase machine, telemetry)
//! - `session`: Host tick driver with the one-shot reset timer
//! - `view`: Presentation interface (rig pose, presenter trait)
//! - `tuning`: Data-driven physics constants

pub mod session;
pub mod sim;
pub mod tuning;
pub mod view;

pub use session::Session;
pub use tuning::{Tuning, TuningError};

use std::f32::consts::{PI, TAU};

/// Game configuration constants
pub mod consts {
    /// Nominal frame time (display refresh, 60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Nominal frame time in milliseconds, for simulated host clocks
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Rotational acceleration per held key (radians/tick²)
    pub const ACCEL: f32 = 0.0008;
    /// Velocity damping applied every rotating tick
    pub const FRICTION: f32 = 0.95;
    /// Angular speed limit (radians/tick)
    pub const MAX_VELOCITY: f32 = 0.025;
    /// Alignment window half-width (4 degrees)
    pub const ALIGNMENT_THRESHOLD: f32 = 4.0 * std::f32::consts::PI / 180.0;

    /// Descent rate (units/tick, linear)
    pub const DESCEND_SPEED: f32 = 0.05;
    /// Vertical offset at which the module is seated (ground + 2)
    pub const STOP_OFFSET: f32 = -2.0;

    /// Delay between landing and the next cycle
    pub const RESET_DELAY_MS: f64 = 3000.0;
    /// Velocity multiplier for readouts
    pub const VELOCITY_DISPLAY_SCALE: f32 = 1000.0;

    /// Whole turns the stored angle may accumulate before renormalizing
    pub const ANGLE_RENORMALIZE_TURNS: f32 = 32.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Shortest distance between two headings on the circle, in [0, π]
#[inline]
pub fn circular_distance(a: f32, b: f32) -> f32 {
    let diff = (wrap_angle(a) - wrap_angle(b)).abs();
    diff.min(TAU - diff)
}

/// Signed shortest arc from `from` to `to`, in [-π, π)
#[inline]
pub fn shortest_arc(from: f32, to: f32) -> f32 {
    let mut delta = wrap_angle(to) - wrap_angle(from);
    // Handle wraparound
    if delta >= PI {
        delta -= TAU;
    } else if delta < -PI {
        delta += TAU;
    }
    delta
}

/// Convert radians to degrees wrapped into [0, 360)
#[inline]
pub fn heading_degrees(angle: f32) -> f32 {
    let deg = wrap_angle(angle).to_degrees();
    if deg >= 360.0 { 0.0 } else { deg }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_handles_negative_angles() {
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-6);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-6);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!(wrap_angle(-1e-9) < TAU);
    }

    #[test]
    fn circular_distance_takes_short_way_round() {
        let d = circular_distance(0.1, TAU - 0.1);
        assert!((d - 0.2).abs() < 1e-5);
        assert!((circular_distance(0.0, PI) - PI).abs() < 1e-6);
    }

    #[test]
    fn shortest_arc_sign() {
        assert!(shortest_arc(0.0, 0.5) > 0.0);
        assert!(shortest_arc(0.5, 0.0) < 0.0);
        // Crossing zero going right
        assert!((shortest_arc(TAU - 0.1, 0.1) - 0.2).abs() < 1e-5);
    }

    #[test]
    fn heading_degrees_range() {
        assert!((heading_degrees(-PI / 2.0) - 270.0).abs() < 1e-3);
        assert!(heading_degrees(TAU) < 360.0);
    }
}
