//! `Relay` trait for two-state mechanisms: claws, latches, intake rollers.

use murphy_types::MurphyError;

/// A mechanism that is either engaged or released.
pub trait Relay {
    /// Stable identifier, e.g. `"claw"`.
    fn id(&self) -> &str;

    /// Engage (`true`) or release (`false`).
    ///
    /// # Errors
    ///
    /// Returns [`MurphyError::HardwareFault`] if the command cannot be applied.
    fn set_state(&mut self, engaged: bool) -> Result<(), MurphyError>;

    fn state(&self) -> bool;
}
