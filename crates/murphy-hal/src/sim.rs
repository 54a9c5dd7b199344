//! In-process stand-ins for physical mechanisms, so state machines can run
//! in tests and in the `murphy-sim` binary without a robot attached.

use murphy_types::MurphyError;

use crate::actuator::Actuator;
use crate::relay::Relay;

// ────────────────────────────────────────────────────────────────────────────
// Simulated actuator
// ────────────────────────────────────────────────────────────────────────────

/// A simulated actuator that jumps to each commanded position.
///
/// Travel is unbounded by default; [`SimActuator::with_travel`] adds limits
/// and makes out-of-range commands fail like a real driver would.
pub struct SimActuator {
    id: String,
    position: f32,
    travel: Option<(f32, f32)>,
}

impl SimActuator {
    pub fn new(id: impl Into<String>) -> Box<Self> {
        Box::new(Self {
            id: id.into(),
            position: 0.0,
            travel: None,
        })
    }

    /// Restrict commanded positions to `[min, max]`.
    pub fn with_travel(mut self: Box<Self>, min: f32, max: f32) -> Box<Self> {
        self.travel = Some((min, max));
        self
    }
}

impl Actuator for SimActuator {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_position(&mut self, target: f32) -> Result<(), MurphyError> {
        if let Some((min, max)) = self.travel
            && !(min..=max).contains(&target)
        {
            return Err(MurphyError::HardwareFault {
                component: self.id.clone(),
                details: format!("target {target} outside travel [{min}, {max}]"),
            });
        }
        self.position = target;
        Ok(())
    }

    fn position(&self) -> f32 {
        self.position
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Simulated relay
// ────────────────────────────────────────────────────────────────────────────

/// A simulated relay that records its state.  Always succeeds.
pub struct SimRelay {
    id: String,
    engaged: bool,
}

impl SimRelay {
    pub fn new(id: impl Into<String>) -> Box<Self> {
        Box::new(Self {
            id: id.into(),
            engaged: false,
        })
    }
}

impl Relay for SimRelay {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_state(&mut self, engaged: bool) -> Result<(), MurphyError> {
        self.engaged = engaged;
        Ok(())
    }

    fn state(&self) -> bool {
        self.engaged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_actuator_without_travel_accepts_anything() {
        let mut lift = SimActuator::new("lift");
        lift.set_position(-100.0).unwrap();
        assert!((lift.position() + 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn sim_actuator_rejects_out_of_travel_targets() {
        let mut lift = SimActuator::new("lift").with_travel(0.0, 1.0);
        lift.set_position(1.0).unwrap();
        let err = lift.set_position(1.5).unwrap_err();
        assert!(matches!(err, MurphyError::HardwareFault { .. }));
        // Position is unchanged after a rejected command.
        assert!((lift.position() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn sim_relay_toggle() {
        let mut claw = SimRelay::new("claw");
        assert_eq!(claw.id(), "claw");
        assert!(!claw.state());
        claw.set_state(true).unwrap();
        assert!(claw.state());
    }
}
