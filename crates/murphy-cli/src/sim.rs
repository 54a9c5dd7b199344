//! The host loop: builds the simulated robot and ticks its state machine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use murphy_hal::{Clock, ManualClock, RecordingTelemetry, SimGamepad, TracingTelemetry};
use murphy_runtime::StateMachine;
use murphy_types::{Button, MurphyError};
use tracing::{debug, info, warn};

use crate::config::{Config, TelemetrySink};
use crate::robot::{self, Idle, Routines};

/// Scripted controller input standing in for the drive team.
///
/// Within every `period`, the operator taps A at 1 s (start intake) and B at
/// 5 s (score), and the driver sweeps the left stick back and forth.
pub struct DriveTeam {
    driver: SimGamepad,
    operator: SimGamepad,
    period: Duration,
}

impl DriveTeam {
    pub fn new(driver: SimGamepad, operator: SimGamepad) -> Self {
        Self {
            driver,
            operator,
            period: Duration::from_secs(10),
        }
    }

    /// Update both controllers for simulated time `now`.
    pub fn apply(&self, now: Duration) {
        let phase = (now.as_secs_f64() % self.period.as_secs_f64()) as f32;

        let tap = |pad: &SimGamepad, button: Button, at: f32| {
            if (at..at + 0.1).contains(&phase) {
                pad.press(button);
            } else {
                pad.release(button);
            }
        };
        tap(&self.operator, Button::A, 1.0);
        tap(&self.operator, Button::B, 5.0);

        let sweep = (phase * std::f32::consts::TAU / 4.0).sin() * 0.5;
        self.driver.set_left_stick(0.0, sweep);
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_state: String,
    pub interrupted: bool,
}

/// Run the simulated robot for `cfg.run_secs` of simulated time, or until
/// `shutdown` is raised.  Mechanisms are brought to rest before returning.
///
/// # Errors
///
/// Any error from building the context, from a state, or from bringing the
/// mechanisms to rest.
pub fn run(cfg: &Config, shutdown: &Arc<AtomicBool>) -> Result<RunSummary, MurphyError> {
    let clock = ManualClock::new();
    let driver = SimGamepad::new();
    let operator = SimGamepad::new();
    let team = DriveTeam::new(driver.clone(), operator.clone());

    let ctx = match cfg.telemetry {
        TelemetrySink::Tracing => {
            robot::build_context(TracingTelemetry::new(), driver, operator, clock.clone())?
        }
        TelemetrySink::Silent => {
            robot::build_context(RecordingTelemetry::new(), driver, operator, clock.clone())?
        }
    };
    let score_timeout = Duration::try_from_secs_f64(cfg.score_timeout_secs).map_err(|_| {
        MurphyError::InvalidArgument(format!(
            "score timeout of {} s cannot be represented",
            cfg.score_timeout_secs
        ))
    })?;
    let routines = Routines {
        score_queue_capacity: cfg.score_queue_capacity,
        score_timeout,
    };
    let mut machine = StateMachine::new(Idle::new(routines), ctx);

    info!(
        tick_hz = cfg.tick_hz,
        ticks = cfg.total_ticks(),
        realtime = cfg.realtime,
        "simulation started"
    );
    let outcome = drive(cfg, shutdown, &mut machine, &clock, &team);

    // Leave the mechanisms safe whether or not the loop failed.
    let rest = machine.context_mut().subsystems_mut().hold_all();
    debug!(ok = rest.is_ok(), "mechanisms brought to rest");
    let interrupted = outcome?;
    rest?;

    Ok(RunSummary {
        ticks: machine.ticks(),
        final_state: machine.current_name().unwrap_or("<halted>").to_string(),
        interrupted,
    })
}

/// The tick loop proper.  Returns whether it was cut short by `shutdown`.
fn drive(
    cfg: &Config,
    shutdown: &AtomicBool,
    machine: &mut StateMachine,
    clock: &ManualClock,
    team: &DriveTeam,
) -> Result<bool, MurphyError> {
    let period = Duration::from_secs_f64(1.0 / f64::from(cfg.tick_hz));
    for _ in 0..cfg.total_ticks() {
        if shutdown.load(Ordering::SeqCst) {
            warn!(tick = machine.ticks(), "shutdown requested, stopping control loop");
            return Ok(true);
        }
        team.apply(clock.now());
        machine.advance()?;
        machine.context_mut().telemetry().update();
        clock.advance(period);
        if cfg.realtime {
            std::thread::sleep(period);
        }
    }
    Ok(false)
}
