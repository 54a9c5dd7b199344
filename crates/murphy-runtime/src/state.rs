//! Named robot behaviours and the machine that switches between them.
//!
//! A [`State`] runs once per tick and hands back the state that should run on
//! the next tick: itself to stay, or a new value to transition.  States are
//! free to own and step tasks internally.  [`StateMachine`] holds exactly one
//! active state together with the [`RobotContext`] and advances it once per
//! call to [`StateMachine::advance`].
//!
//! # Example
//!
//! ```rust
//! use murphy_hal::{RecordingTelemetry, RobotContext, SimGamepad};
//! use murphy_runtime::{State, StateMachine};
//! use murphy_types::MurphyError;
//!
//! struct Idle;
//!
//! impl State for Idle {
//!     fn name(&self) -> &str {
//!         "Idle"
//!     }
//!
//!     fn step(self: Box<Self>, _ctx: &mut RobotContext) -> Result<Box<dyn State>, MurphyError> {
//!         Ok(self)
//!     }
//! }
//!
//! let ctx = RobotContext::builder()
//!     .telemetry(RecordingTelemetry::new())
//!     .gamepad1(SimGamepad::new())
//!     .gamepad2(SimGamepad::new())
//!     .build()
//!     .unwrap();
//!
//! let mut machine = StateMachine::new(Box::new(Idle), ctx);
//! machine.advance().unwrap();
//! assert_eq!(machine.current_name(), Some("Idle"));
//! ```

use murphy_hal::RobotContext;
use murphy_types::MurphyError;
use tracing::{debug_span, error, info};

/// Telemetry key under which the active state's name is published.
pub const STATE_TELEMETRY_KEY: &str = "State";

/// A robot behaviour mode (idle, intake, scoring, …).
pub trait State {
    /// Display name, published to telemetry on every tick.
    fn name(&self) -> &str;

    /// Run one tick of this state and return the state for the next tick.
    ///
    /// Return `Ok(self)` to stay in this state.
    ///
    /// # Errors
    ///
    /// Any error is propagated out of [`StateMachine::advance`] and halts the
    /// machine.
    fn step(self: Box<Self>, ctx: &mut RobotContext) -> Result<Box<dyn State>, MurphyError>;
}

/// Drives one active [`State`] per tick.
pub struct StateMachine {
    current: Option<Box<dyn State>>,
    context: RobotContext,
    ticks: u64,
}

impl StateMachine {
    pub fn new(initial: Box<dyn State>, context: RobotContext) -> Self {
        Self {
            current: Some(initial),
            context,
            ticks: 0,
        }
    }

    /// Run one tick: publish the active state's name, step it, and install
    /// the state it returns.
    ///
    /// # Errors
    ///
    /// - [`MurphyError::InvalidState`] if the machine has no active state,
    ///   which happens only after a previous `advance` failed.
    /// - Any error returned by the active state's `step`.  The failed state is
    ///   consumed and the machine is halted.
    pub fn advance(&mut self) -> Result<(), MurphyError> {
        let state = self.current.take().ok_or_else(|| {
            MurphyError::InvalidState(
                "state machine has no current state; a previous state step failed".into(),
            )
        })?;

        let name = state.name().to_string();
        self.context.telemetry().add(STATE_TELEMETRY_KEY, name.as_str());

        let span = debug_span!("state", name = %name, tick = self.ticks);
        let _enter = span.enter();

        let next = state.step(&mut self.context).inspect_err(|e| {
            error!(state = %name, error = %e, "state step failed, halting state machine");
        })?;

        if next.name() != name {
            info!(from = %name, to = next.name(), tick = self.ticks, "state transition");
        }
        self.current = Some(next);
        self.ticks += 1;
        Ok(())
    }

    /// Name of the active state, `None` once halted.
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref().map(State::name)
    }

    /// Whether a failed step has left the machine without a state.
    pub fn is_halted(&self) -> bool {
        self.current.is_none()
    }

    /// Number of successful advances.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn context(&self) -> &RobotContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RobotContext {
        &mut self.context
    }
}
