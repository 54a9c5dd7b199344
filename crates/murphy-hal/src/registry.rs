//! [`SubsystemRegistry`] – the integrator's subsystem handles, resolved by id.
//!
//! The registry lives inside the
//! [`RobotContext`][crate::context::RobotContext].  A task that drives a
//! mechanism stores the mechanism's id and looks the driver up on every tick,
//! so ownership of the hardware stays with the context rather than with the
//! task.

use std::collections::HashMap;

use murphy_types::MurphyError;
use tracing::warn;

use crate::actuator::Actuator;
use crate::relay::Relay;

/// Named actuator and relay drivers.
#[derive(Default)]
pub struct SubsystemRegistry {
    actuators: HashMap<String, Box<dyn Actuator>>,
    relays: HashMap<String, Box<dyn Relay>>,
}

impl SubsystemRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actuator driver.  Any previously registered driver with the
    /// same `id` is replaced.
    pub fn register_actuator(&mut self, actuator: Box<dyn Actuator>) {
        self.actuators.insert(actuator.id().to_string(), actuator);
    }

    /// Register a relay driver.  Any previously registered driver with the
    /// same `id` is replaced.
    pub fn register_relay(&mut self, relay: Box<dyn Relay>) {
        self.relays.insert(relay.id().to_string(), relay);
    }

    /// # Errors
    ///
    /// [`MurphyError::HardwareFault`] when no actuator is registered as `id`.
    pub fn actuator(&self, id: &str) -> Result<&dyn Actuator, MurphyError> {
        self.actuators
            .get(id)
            .map(|a| a.as_ref())
            .ok_or_else(|| not_registered("actuator", id))
    }

    /// # Errors
    ///
    /// [`MurphyError::HardwareFault`] when no actuator is registered as `id`.
    pub fn actuator_mut(&mut self, id: &str) -> Result<&mut dyn Actuator, MurphyError> {
        match self.actuators.get_mut(id) {
            Some(act) => Ok(act.as_mut()),
            None => Err(not_registered("actuator", id)),
        }
    }

    /// # Errors
    ///
    /// [`MurphyError::HardwareFault`] when no relay is registered as `id`.
    pub fn relay(&self, id: &str) -> Result<&dyn Relay, MurphyError> {
        self.relays
            .get(id)
            .map(|r| r.as_ref())
            .ok_or_else(|| not_registered("relay", id))
    }

    /// # Errors
    ///
    /// [`MurphyError::HardwareFault`] when no relay is registered as `id`.
    pub fn relay_mut(&mut self, id: &str) -> Result<&mut dyn Relay, MurphyError> {
        match self.relays.get_mut(id) {
            Some(relay) => Ok(relay.as_mut()),
            None => Err(not_registered("relay", id)),
        }
    }

    /// Ids of every registered actuator, sorted.
    pub fn actuator_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.actuators.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Bring every mechanism to a safe rest: actuators hold their current
    /// position and relays are released.
    ///
    /// Every driver is commanded even if an earlier one faults; the first
    /// fault is returned.
    pub fn hold_all(&mut self) -> Result<(), MurphyError> {
        let mut first_fault = None;
        for act in self.actuators.values_mut() {
            let here = act.position();
            if let Err(e) = act.set_position(here) {
                warn!(actuator = act.id(), error = %e, "failed to hold actuator");
                first_fault.get_or_insert(e);
            }
        }
        for relay in self.relays.values_mut() {
            if let Err(e) = relay.set_state(false) {
                warn!(relay = relay.id(), error = %e, "failed to release relay");
                first_fault.get_or_insert(e);
            }
        }
        match first_fault {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn not_registered(kind: &str, id: &str) -> MurphyError {
    MurphyError::HardwareFault {
        component: id.to_string(),
        details: format!("{kind} '{id}' is not registered"),
    }
}
