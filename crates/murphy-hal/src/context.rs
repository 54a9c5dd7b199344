//! [`RobotContext`] – the bundle of shared resources handed to every state
//! and task on every tick.
//!
//! The context is built once per run with [`RobotContextBuilder`] and then
//! lives as long as the control loop.  Its handles are fixed after
//! construction: callers can read inputs, write telemetry and command
//! registered subsystems, but cannot swap the telemetry sink or a gamepad
//! out from under a running state machine.

use std::time::Duration;

use murphy_types::{GamepadState, MurphyError};

use crate::clock::{Clock, MonotonicClock};
use crate::gamepad::Gamepad;
use crate::registry::SubsystemRegistry;
use crate::telemetry::Telemetry;

/// Shared resources for one control-loop run.
pub struct RobotContext {
    telemetry: Box<dyn Telemetry>,
    gamepad1: Box<dyn Gamepad>,
    gamepad2: Box<dyn Gamepad>,
    clock: Box<dyn Clock>,
    subsystems: SubsystemRegistry,
}

impl RobotContext {
    pub fn builder() -> RobotContextBuilder {
        RobotContextBuilder::default()
    }

    /// The telemetry sink.
    pub fn telemetry(&mut self) -> &mut dyn Telemetry {
        self.telemetry.as_mut()
    }

    /// Snapshot of the primary (driver) controller.
    pub fn gamepad1(&self) -> GamepadState {
        self.gamepad1.state()
    }

    /// Snapshot of the secondary (operator) controller.
    pub fn gamepad2(&self) -> GamepadState {
        self.gamepad2.state()
    }

    /// Current time of the context's clock.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn subsystems(&self) -> &SubsystemRegistry {
        &self.subsystems
    }

    pub fn subsystems_mut(&mut self) -> &mut SubsystemRegistry {
        &mut self.subsystems
    }
}

/// Builder for [`RobotContext`].
///
/// Telemetry and both gamepads are required.  The clock defaults to a
/// [`MonotonicClock`] and the subsystem registry to an empty one.
#[derive(Default)]
pub struct RobotContextBuilder {
    telemetry: Option<Box<dyn Telemetry>>,
    gamepad1: Option<Box<dyn Gamepad>>,
    gamepad2: Option<Box<dyn Gamepad>>,
    clock: Option<Box<dyn Clock>>,
    subsystems: SubsystemRegistry,
}

impl RobotContextBuilder {
    pub fn telemetry(mut self, telemetry: impl Telemetry + 'static) -> Self {
        self.telemetry = Some(Box::new(telemetry));
        self
    }

    pub fn gamepad1(mut self, gamepad: impl Gamepad + 'static) -> Self {
        self.gamepad1 = Some(Box::new(gamepad));
        self
    }

    pub fn gamepad2(mut self, gamepad: impl Gamepad + 'static) -> Self {
        self.gamepad2 = Some(Box::new(gamepad));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn subsystems(mut self, subsystems: SubsystemRegistry) -> Self {
        self.subsystems = subsystems;
        self
    }

    /// # Errors
    ///
    /// [`MurphyError::InvalidArgument`] naming the first required handle that
    /// was never supplied.
    pub fn build(self) -> Result<RobotContext, MurphyError> {
        let telemetry = self
            .telemetry
            .ok_or_else(|| MurphyError::InvalidArgument("telemetry cannot be absent".into()))?;
        let gamepad1 = self
            .gamepad1
            .ok_or_else(|| MurphyError::InvalidArgument("gamepad1 cannot be absent".into()))?;
        let gamepad2 = self
            .gamepad2
            .ok_or_else(|| MurphyError::InvalidArgument("gamepad2 cannot be absent".into()))?;
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(MonotonicClock::new()));

        Ok(RobotContext {
            telemetry,
            gamepad1,
            gamepad2,
            clock,
            subsystems: self.subsystems,
        })
    }
}
