//! Data-driven physics tuning
//!
//! Defaults match the shipped feel; a JSON file may override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Longest descent accepted, in ticks (ten minutes at 60 Hz)
pub const MAX_DESCENT_TICKS: f32 = 36_000.0;

/// Error returned when tuning cannot be loaded or fails validation
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Physics and pacing constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Velocity added per tick while a rotate key is held (radians/tick²)
    pub accel: f32,
    /// Per-tick velocity multiplier, in (0, 1)
    pub friction: f32,
    /// Angular speed limit (radians/tick)
    pub max_velocity: f32,
    /// Alignment window (radians)
    pub alignment_threshold: f32,
    /// Linear descent rate (units/tick)
    pub descend_speed: f32,
    /// Vertical offset where the descent stops (negative)
    pub stop_offset: f32,
    /// Wall-clock delay from landing to the next cycle
    pub reset_delay_ms: f64,
    /// Velocity multiplier applied to readouts
    pub velocity_display_scale: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            accel: ACCEL,
            friction: FRICTION,
            max_velocity: MAX_VELOCITY,
            alignment_threshold: ALIGNMENT_THRESHOLD,
            descend_speed: DESCEND_SPEED,
            stop_offset: STOP_OFFSET,
            reset_delay_ms: RESET_DELAY_MS,
            velocity_display_scale: VELOCITY_DISPLAY_SCALE,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check every constant is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.accel.is_finite() && self.accel > 0.0) {
            return invalid("accel", "must be finite and positive");
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return invalid("friction", "must lie strictly between 0 and 1");
        }
        if !(self.max_velocity.is_finite() && self.max_velocity > 0.0) {
            return invalid("max_velocity", "must be finite and positive");
        }
        if !(self.alignment_threshold > 0.0 && self.alignment_threshold < std::f32::consts::PI) {
            return invalid("alignment_threshold", "must lie strictly between 0 and pi");
        }
        if !(self.descend_speed.is_finite() && self.descend_speed > 0.0) {
            return invalid("descend_speed", "must be finite and positive");
        }
        if !(self.stop_offset.is_finite() && self.stop_offset < 0.0) {
            return invalid("stop_offset", "must be finite and below zero");
        }
        // Keeps each descent step above f32 resolution at the stop offset
        if self.descent_ticks() > MAX_DESCENT_TICKS {
            return invalid("stop_offset", "too far below zero to reach at descend_speed");
        }
        if !(self.reset_delay_ms.is_finite() && self.reset_delay_ms >= 0.0) {
            return invalid("reset_delay_ms", "must be finite and non-negative");
        }
        if !self.velocity_display_scale.is_finite() {
            return invalid("velocity_display_scale", "must be finite");
        }
        Ok(())
    }

    /// Ticks needed to descend from rest to the stop offset
    pub fn descent_ticks(&self) -> f32 {
        (-self.stop_offset / self.descend_speed).ceil()
    }

    /// Velocity the rig settles at with one key held and no clamp
    pub fn terminal_velocity(&self) -> f32 {
        self.accel * self.friction / (1.0 - self.friction)
    }
}
