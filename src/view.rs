//! Presentation interface
//!
//! The renderer and HUD live outside this crate. They receive a [`Frame`]
//! per tick through the [`Presenter`] trait and never write back into the
//! simulation.

use glam::{Quat, Vec3};

use crate::sim::{Phase, SimulationState, Status, Telemetry};

/// Transform of the hook/frame/module assembly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigPose {
    /// Rotation about +Y by the current angle
    pub rotation: Quat,
    /// Vertical descent offset
    pub translation: Vec3,
}

impl RigPose {
    pub fn from_state(state: &SimulationState) -> Self {
        Self {
            rotation: Quat::from_rotation_y(state.angle),
            translation: Vec3::new(0.0, state.vertical_offset, 0.0),
        }
    }
}

/// Everything a presenter needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub telemetry: Telemetry,
    pub phase: Phase,
    pub rig: RigPose,
    /// Ground marker showing the target heading
    pub target_marker: Quat,
}

impl Frame {
    pub fn capture(state: &SimulationState, telemetry: Telemetry) -> Self {
        Self {
            telemetry,
            phase: state.phase,
            rig: RigPose::from_state(state),
            target_marker: Quat::from_rotation_y(state.target_angle),
        }
    }

    /// One-line HUD readout
    pub fn readout(&self) -> String {
        let t = &self.telemetry;
        format!(
            "[{}] CURRENT {:.1}° | SYNC {:.0}% | TARGET {:.1}° | VELOCITY {:.2} RPM",
            t.status,
            t.current_angle_deg,
            t.sync_percent,
            t.target_angle_deg,
            t.velocity_scaled.abs()
        )
    }
}

/// Receives one frame per tick
pub trait Presenter {
    fn present(&mut self, frame: &Frame);
}

/// Presenter that reports status changes and a periodic readout via `log`
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_status: Option<Status>,
    frames: u64,
    transitions: u64,
    /// Emit a readout every N frames (0 disables)
    pub readout_every: u64,
}

impl LogPresenter {
    pub fn new(readout_every: u64) -> Self {
        Self {
            readout_every,
            ..Default::default()
        }
    }

    /// Number of status changes seen so far
    pub fn transitions(&self) -> u64 {
        self.transitions
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, frame: &Frame) {
        self.frames += 1;
        let status = frame.telemetry.status;

        if self.last_status != Some(status) {
            if self.last_status.is_some() {
                self.transitions += 1;
            }
            self.last_status = Some(status);
            log::info!("{}", frame.readout());
        } else if self.readout_every > 0 && self.frames % self.readout_every == 0 {
            log::debug!("{}", frame.readout());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use std::f32::consts::FRAC_PI_2;

    fn state(angle: f32, offset: f32, phase: Phase) -> SimulationState {
        SimulationState {
            angle,
            velocity: 0.0,
            target_angle: 1.0,
            phase,
            vertical_offset: offset,
            cycle: 0,
            time_ticks: 0,
        }
    }

    #[test]
    fn pose_follows_state() {
        let s = state(FRAC_PI_2, -1.5, Phase::Descending);
        let pose = RigPose::from_state(&s);
        assert_eq!(pose.translation, Vec3::new(0.0, -1.5, 0.0));
        // +X swings to -Z under a quarter turn about +Y
        let forward = pose.rotation * Vec3::X;
        assert!(forward.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn readout_formats_hud_values() {
        let s = state(0.0, 0.0, Phase::Rotating);
        let frame = Frame::capture(&s, Telemetry::project(&s, &Tuning::default()));
        let line = frame.readout();
        assert!(line.starts_with("[SCANNING...]"));
        assert!(line.contains("TARGET 57.3°"));
        assert!(line.contains("VELOCITY 0.00 RPM"));
    }

    #[test]
    fn log_presenter_counts_status_changes() {
        let tuning = Tuning::default();
        let mut presenter = LogPresenter::new(0);
        for phase in [Phase::Rotating, Phase::Rotating, Phase::Descending, Phase::Success] {
            let s = state(0.0, 0.0, phase);
            presenter.present(&Frame::capture(&s, Telemetry::project(&s, &tuning)));
        }
        assert_eq!(presenter.transitions(), 2);
    }
}
