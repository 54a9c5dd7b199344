//! `Actuator` trait for lifts, arms, wrists and other position-controlled
//! mechanisms.
//!
//! Drivers register with a [`SubsystemRegistry`][crate::registry::SubsystemRegistry];
//! tasks address them by id through the
//! [`RobotContext`][crate::context::RobotContext] and never hold the driver
//! itself.

use murphy_types::MurphyError;

/// A position-controlled mechanism.
pub trait Actuator {
    /// Stable identifier, e.g. `"lift"` or `"wrist"`.
    fn id(&self) -> &str;

    /// Command the mechanism towards `target` (driver-defined units, usually
    /// metres of travel or radians).
    ///
    /// # Errors
    ///
    /// Returns [`MurphyError::HardwareFault`] when the command is rejected,
    /// e.g. because the target lies outside the mechanism's travel.
    fn set_position(&mut self, target: f32) -> Result<(), MurphyError>;

    /// Most recently known position.
    fn position(&self) -> f32;
}
