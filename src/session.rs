//! Host tick driver
//!
//! Plays the role of the display-refresh loop: one [`Session::frame`] per
//! refresh, fed the host's millisecond timestamp. The reset after a landing is
//! a one-shot timer owned here and routed back to the engine by ticket, on the
//! same thread as the ticks.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::FRAME_DT;
use crate::sim::{Engine, InputState, ResetTicket, SimEvent, StepError};
use crate::view::Frame;

/// Largest timestep handed to the engine after a stall
const MAX_FRAME_DT: f32 = 0.1;

/// One-shot reset timer
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScheduledReset {
    due_ms: f64,
    ticket: ResetTicket,
}

/// A play session: engine plus its timer and lifecycle
#[derive(Debug)]
pub struct Session<R: Rng = Pcg32> {
    engine: Engine<R>,
    reset_timer: Option<ScheduledReset>,
    last_frame_ms: Option<f64>,
    running: bool,
    cycles_completed: u64,
}

impl<R: Rng> Session<R> {
    pub fn new(engine: Engine<R>) -> Self {
        Self {
            engine,
            reset_timer: None,
            last_frame_ms: None,
            running: true,
            cycles_completed: 0,
        }
    }

    /// Run one refresh at host time `now_ms`. Returns `None` once shut down.
    pub fn frame(&mut self, now_ms: f64, input: &InputState) -> Result<Option<Frame>, StepError> {
        if !self.running {
            return Ok(None);
        }

        // Reject before the timer can fire so a bad frame changes nothing
        if !now_ms.is_finite() {
            return Err(StepError::InvalidTimestamp(now_ms));
        }

        self.fire_due_timer(now_ms);

        let dt = match self.last_frame_ms {
            Some(last) if now_ms > last => (((now_ms - last) / 1000.0) as f32).min(MAX_FRAME_DT),
            Some(_) | None => FRAME_DT,
        };
        self.last_frame_ms = Some(now_ms);

        let telemetry = self.engine.step(input, dt)?;

        let events: Vec<SimEvent> = self.engine.drain_events().collect();
        for event in events {
            if let SimEvent::CycleComplete { ticket } = event {
                self.cycles_completed += 1;
                self.schedule_reset(now_ms, ticket);
            }
        }

        Ok(Some(Frame::capture(self.engine.state(), telemetry)))
    }

    /// Stop ticking and drop any pending reset
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(timer) = self.reset_timer.take() {
            log::debug!("Dropping reset timer for cycle {}", timer.ticket.cycle);
        }
        self.engine.cancel_pending_reset();
        log::info!(
            "Session stopped after {} completed cycles",
            self.cycles_completed
        );
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Host time at which the pending reset fires
    pub fn reset_due_ms(&self) -> Option<f64> {
        self.reset_timer.map(|t| t.due_ms)
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    fn schedule_reset(&mut self, now_ms: f64, ticket: ResetTicket) {
        let due_ms = now_ms + self.engine.tuning().reset_delay_ms;
        self.reset_timer = Some(ScheduledReset { due_ms, ticket });
        log::debug!("Reset for cycle {} scheduled at {:.0}ms", ticket.cycle, due_ms);
    }

    fn fire_due_timer(&mut self, now_ms: f64) {
        let Some(timer) = self.reset_timer else {
            return;
        };
        if now_ms >= timer.due_ms {
            self.reset_timer = None;
            self.engine.fire_reset(timer.ticket);
        }
    }
}
