//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Per-tick constants only
//! - Injected, seedable RNG only
//! - No rendering, timer or platform dependencies

pub mod autopilot;
pub mod engine;
pub mod state;
pub mod telemetry;
pub mod tick;

pub use engine::{Engine, MAX_QUEUED_EVENTS, StepError};
pub use state::{Phase, ResetTicket, SimEvent, SimulationState, draw_target, is_aligned};
pub use telemetry::{Status, Telemetry, status_for};
pub use tick::{InputState, tick};
