//! Tasks that drive the simulated robot's mechanisms.
//!
//! Each task stores the id of the mechanism it acts on and resolves the
//! driver through the context's subsystem registry on every tick.  A driver
//! fault ends the task, is logged, and is reported on telemetry under
//! `"fault"`.

use std::time::Duration;

use murphy_hal::RobotContext;
use murphy_runtime::Task;
use murphy_types::MurphyError;
use tracing::error;

fn report_fault(ctx: &mut RobotContext, task: &str, err: &MurphyError) {
    error!(task, error = %err, "mechanism command failed");
    ctx.telemetry().add("fault", err.to_string());
}

/// Moves an actuator from wherever it is at the first step to `target`,
/// linearly over `duration`.
pub struct MoveActuatorTask {
    actuator: String,
    target: f32,
    duration: Duration,
    start: f32,
    failed: bool,
}

impl MoveActuatorTask {
    pub fn new(actuator: impl Into<String>, target: f32, duration: Duration) -> Self {
        Self {
            actuator: actuator.into(),
            target,
            duration,
            start: 0.0,
            failed: false,
        }
    }
}

impl Task for MoveActuatorTask {
    fn initialize(&mut self, ctx: &mut RobotContext) {
        match ctx.subsystems().actuator(&self.actuator) {
            Ok(act) => self.start = act.position(),
            Err(e) => {
                report_fault(ctx, &self.actuator, &e);
                self.failed = true;
            }
        }
    }

    fn run(&mut self, ctx: &mut RobotContext, elapsed: Duration) -> bool {
        if self.failed {
            return false;
        }
        let fraction = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        let position = self.start + (self.target - self.start) * fraction;

        let commanded = ctx
            .subsystems_mut()
            .actuator_mut(&self.actuator)
            .and_then(|act| act.set_position(position));
        if let Err(e) = commanded {
            report_fault(ctx, &self.actuator, &e);
            self.failed = true;
            return false;
        }

        ctx.telemetry().add(&self.actuator, position);
        fraction < 1.0
    }

    fn name(&self) -> &str {
        &self.actuator
    }
}

/// Engages or releases a relay.  Completes on its first step.
pub struct SetRelayTask {
    relay: String,
    engaged: bool,
}

impl SetRelayTask {
    pub fn new(relay: impl Into<String>, engaged: bool) -> Self {
        Self {
            relay: relay.into(),
            engaged,
        }
    }
}

impl Task for SetRelayTask {
    fn run(&mut self, ctx: &mut RobotContext, _elapsed: Duration) -> bool {
        let engaged = self.engaged;
        match ctx
            .subsystems_mut()
            .relay_mut(&self.relay)
            .and_then(|relay| relay.set_state(engaged))
        {
            Ok(()) => ctx.telemetry().add(&self.relay, engaged),
            Err(e) => report_fault(ctx, &self.relay, &e),
        }
        false
    }

    fn name(&self) -> &str {
        &self.relay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murphy_hal::sim::{SimActuator, SimRelay};
    use murphy_hal::{ManualClock, RecordingTelemetry, SimGamepad, SubsystemRegistry};
    use murphy_runtime::TaskExt;
    use murphy_types::TelemetryValue;

    fn rig() -> (RobotContext, ManualClock, RecordingTelemetry) {
        let clock = ManualClock::new();
        let sink = RecordingTelemetry::new();
        let mut subsystems = SubsystemRegistry::new();
        subsystems.register_actuator(SimActuator::new("lift").with_travel(0.0, 1.0));
        subsystems.register_relay(SimRelay::new("claw"));
        let ctx = RobotContext::builder()
            .telemetry(sink.clone())
            .gamepad1(SimGamepad::new())
            .gamepad2(SimGamepad::new())
            .clock(clock.clone())
            .subsystems(subsystems)
            .build()
            .unwrap();
        (ctx, clock, sink)
    }

    fn lift_position(ctx: &RobotContext) -> f32 {
        ctx.subsystems().actuator("lift").unwrap().position()
    }

    #[test]
    fn move_interpolates_over_duration() {
        let (mut ctx, clock, sink) = rig();
        let mut task = MoveActuatorTask::new("lift", 1.0, Duration::from_secs(1)).boxed();

        assert!(task.step(&mut ctx));
        assert!(lift_position(&ctx).abs() < f32::EPSILON);

        clock.advance(Duration::from_millis(500));
        assert!(task.step(&mut ctx));
        assert!((lift_position(&ctx) - 0.5).abs() < 1e-6);
        assert_eq!(sink.staged("lift"), Some(TelemetryValue::Number(0.5)));

        clock.advance(Duration::from_millis(500));
        assert!(!task.step(&mut ctx));
        assert!((lift_position(&ctx) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn move_starts_from_position_at_first_step() {
        let (mut ctx, clock, _sink) = rig();
        ctx.subsystems_mut().actuator_mut("lift").unwrap().set_position(0.8).unwrap();
        let mut task = MoveActuatorTask::new("lift", 0.0, Duration::from_secs(2)).boxed();

        task.step(&mut ctx);
        clock.advance(Duration::from_secs(1));
        task.step(&mut ctx);
        assert!((lift_position(&ctx) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn unknown_actuator_finishes_with_fault() {
        let (mut ctx, _clock, sink) = rig();
        let mut task = MoveActuatorTask::new("turret", 1.0, Duration::from_secs(1)).boxed();
        assert!(!task.step(&mut ctx));
        let fault = sink.staged("fault").unwrap().to_string();
        assert!(fault.contains("turret"));
    }

    #[test]
    fn out_of_travel_target_finishes_with_fault() {
        let (mut ctx, _clock, sink) = rig();
        let mut task = MoveActuatorTask::new("lift", 5.0, Duration::ZERO).boxed();
        assert!(!task.step(&mut ctx));
        assert!(sink.staged("fault").is_some());
        assert!(lift_position(&ctx).abs() < f32::EPSILON);
    }

    #[test]
    fn relay_task_completes_in_one_step() {
        let (mut ctx, _clock, sink) = rig();
        let mut task = SetRelayTask::new("claw", true).boxed();
        assert!(!task.step(&mut ctx));
        assert!(ctx.subsystems().relay("claw").unwrap().state());
        assert_eq!(sink.staged("claw"), Some(TelemetryValue::Flag(true)));
    }
}
