//! Lighthouse Rotation entry point
//!
//! Runs a headless session on a simulated 60 Hz clock with the autopilot at
//! the controls, logging each cycle. Usage: `lighthouse-rotation [seed] [tuning.json]`

use std::num::ParseIntError;

use thiserror::Error;

use lighthouse_rotation::consts::FRAME_MS;
use lighthouse_rotation::sim::{Engine, StepError, autopilot};
use lighthouse_rotation::view::{LogPresenter, Presenter};
use lighthouse_rotation::{Session, Tuning, TuningError};

/// Cycles to play before exiting
const DEMO_CYCLES: u64 = 3;
/// Give up if the demo has not finished in this much simulated time
const DEMO_TIMEOUT_MS: f64 = 10.0 * 60.0 * 1000.0;
/// Debug readout cadence (frames)
const READOUT_EVERY: u64 = 30;

#[derive(Debug, Error)]
enum RunError {
    #[error("invalid seed: {0}")]
    Seed(#[from] ParseIntError),
    #[error(transparent)]
    Tuning(#[from] TuningError),
    #[error(transparent)]
    Step(#[from] StepError),
    #[error("demo did not finish within the simulated time limit")]
    Timeout,
}

fn main() {
    env_logger::init();
    log::info!("Lighthouse Rotation (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), RunError> {
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>()?,
        None => rand::random(),
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let mut session = Session::new(Engine::new(tuning, seed)?);
    let mut presenter = LogPresenter::new(READOUT_EVERY);
    let mut now_ms = 0.0;

    while session.cycles_completed() < DEMO_CYCLES {
        now_ms += FRAME_MS;
        if now_ms > DEMO_TIMEOUT_MS {
            session.shutdown();
            return Err(RunError::Timeout);
        }

        let engine = session.engine();
        let input = autopilot::steer(engine.state(), engine.tuning());
        if let Some(frame) = session.frame(now_ms, &input)? {
            presenter.present(&frame);
        }
    }

    session.shutdown();
    log::info!(
        "Demo finished: {} cycles in {:.1}s simulated, {} status changes",
        session.cycles_completed(),
        now_ms / 1000.0,
        presenter.transitions()
    );
    Ok(())
}
