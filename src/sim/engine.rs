//! Simulation engine
//!
//! Owns the state, the injected RNG and the pending reset for the current
//! cycle. The host calls [`Engine::step`] once per frame and routes the
//! one-shot reset timer back through [`Engine::fire_reset`].

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use super::state::{Phase, ResetTicket, SimEvent, SimulationState};
use super::telemetry::Telemetry;
use super::tick::{InputState, tick};
use crate::tuning::{Tuning, TuningError};

/// Undrained events kept before the oldest are dropped
pub const MAX_QUEUED_EVENTS: usize = 64;

/// Host-integration errors raised while stepping
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum StepError {
    #[error("timestep must be finite and positive, got {0}")]
    InvalidTimestep(f32),
    #[error("host timestamp must be finite, got {0}")]
    InvalidTimestamp(f64),
}

/// The simulation engine
#[derive(Debug, Clone)]
pub struct Engine<R: Rng = Pcg32> {
    state: SimulationState,
    tuning: Tuning,
    rng: R,
    events: Vec<SimEvent>,
    pending_reset: Option<ResetTicket>,
    elapsed_secs: f64,
    cycle_started_secs: f64,
}

impl Engine<Pcg32> {
    /// Create an engine with a seeded PCG stream
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        log::info!("Seeding target stream with {}", seed);
        Self::with_rng(tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine<R> {
    /// Create an engine drawing targets from `rng`
    pub fn with_rng(tuning: Tuning, mut rng: R) -> Result<Self, TuningError> {
        tuning.validate()?;
        let state = SimulationState::new(&mut rng);
        log::info!(
            "Cycle 0: target heading {:.1}°",
            crate::heading_degrees(state.target_angle)
        );
        // Streams start unaligned; report a target that lands in the window
        let mut events = Vec::new();
        if state.is_aligned(tuning.alignment_threshold) {
            events.push(SimEvent::Aligned);
        }
        Ok(Self {
            state,
            tuning,
            rng,
            events,
            pending_reset: None,
            elapsed_secs: 0.0,
            cycle_started_secs: 0.0,
        })
    }

    /// Advance one tick with the held keys and return the readout
    pub fn step(&mut self, input: &InputState, dt: f32) -> Result<Telemetry, StepError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(StepError::InvalidTimestep(dt));
        }
        self.elapsed_secs += f64::from(dt);

        let first_new = self.events.len();
        tick(&mut self.state, input, &self.tuning, &mut self.events);

        for event in &self.events[first_new..] {
            if let SimEvent::CycleComplete { ticket } = *event {
                self.pending_reset = Some(ticket);
                log::info!(
                    "Cycle {} complete in {:.2}s, reset due in {:.0}ms",
                    ticket.cycle,
                    self.elapsed_secs - self.cycle_started_secs,
                    self.tuning.reset_delay_ms
                );
            }
        }
        self.trim_events();

        Ok(self.telemetry())
    }

    /// Readout for the current state
    pub fn telemetry(&self) -> Telemetry {
        Telemetry::project(&self.state, &self.tuning)
    }

    /// Start a new cycle immediately
    pub fn reset(&mut self) {
        let threshold = self.tuning.alignment_threshold;
        let was_aligned = self.state.is_aligned(threshold);

        self.state.reset(&mut self.rng);
        self.pending_reset = None;
        self.cycle_started_secs = self.elapsed_secs;

        // The new target moves the window, so alignment can flip here too
        let aligned = self.state.is_aligned(threshold);
        if aligned != was_aligned {
            self.events.push(if aligned {
                SimEvent::Aligned
            } else {
                SimEvent::AlignmentLost
            });
        }
        self.events.push(SimEvent::CycleStarted {
            cycle: self.state.cycle,
            target_angle: self.state.target_angle,
        });
        self.trim_events();
        log::info!(
            "Cycle {}: target heading {:.1}°",
            self.state.cycle,
            crate::heading_degrees(self.state.target_angle)
        );
    }

    /// Run the scheduled reset for `ticket`; stale tickets are ignored
    pub fn fire_reset(&mut self, ticket: ResetTicket) -> bool {
        if self.pending_reset != Some(ticket) || self.state.phase != Phase::Success {
            log::debug!(
                "Ignoring reset for cycle {} (current cycle {}, phase {:?})",
                ticket.cycle,
                self.state.cycle,
                self.state.phase
            );
            return false;
        }
        self.reset();
        true
    }

    /// Drop the pending reset, if any
    pub fn cancel_pending_reset(&mut self) -> Option<ResetTicket> {
        let ticket = self.pending_reset.take();
        if let Some(ticket) = ticket {
            log::debug!("Cancelled reset for cycle {}", ticket.cycle);
        }
        ticket
    }

    pub fn pending_reset(&self) -> Option<ResetTicket> {
        self.pending_reset
    }

    /// Take all queued events in order
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SimEvent> {
        self.events.drain(..)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Simulated seconds accumulated from step timesteps
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    fn trim_events(&mut self) {
        if self.events.len() > MAX_QUEUED_EVENTS {
            let excess = self.events.len() - MAX_QUEUED_EVENTS;
            log::warn!("Event queue full, dropping {} oldest events", excess);
            self.events.drain(..excess);
        }
    }
}
