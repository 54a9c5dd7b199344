//! `murphy-hal` – the boundary between the task runtime and the robot.
//!
//! Everything a state or task touches on a tick is reached through a
//! [`RobotContext`]: telemetry, the two controllers, the clock used for
//! elapsed-time measurement, and the integrator's mechanisms.
//!
//! # Modules
//!
//! - [`context`] – [`RobotContext`] and its validating builder.
//! - [`telemetry`] – the [`Telemetry`] sink trait, an in-memory
//!   [`RecordingTelemetry`] and a `tracing`-backed [`TracingTelemetry`].
//! - [`gamepad`] – the [`Gamepad`] input trait and a scriptable [`SimGamepad`].
//! - [`clock`] – the [`Clock`] trait, [`MonotonicClock`] and the simulated
//!   [`ManualClock`].
//! - [`actuator`] / [`relay`] – driver traits for positional and two-state
//!   mechanisms.
//! - [`registry`] – [`SubsystemRegistry`], resolving drivers by id.
//! - [`sim`] – [`SimActuator`][sim::SimActuator] and [`SimRelay`][sim::SimRelay].

pub mod actuator;
pub mod clock;
pub mod context;
pub mod gamepad;
pub mod registry;
pub mod relay;
pub mod sim;
pub mod telemetry;

pub use actuator::Actuator;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use context::{RobotContext, RobotContextBuilder};
pub use gamepad::{Gamepad, SimGamepad};
pub use registry::SubsystemRegistry;
pub use relay::Relay;
pub use telemetry::{RecordingTelemetry, Telemetry, TracingTelemetry};
