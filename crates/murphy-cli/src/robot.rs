//! The demo robot: a lift, a wrist, a claw and an intake roller, cycling
//! through `Idle → Intake → Holding → Score → Idle` on operator input.
//!
//! | State     | Leaves when                                   | Next      |
//! |-----------|-----------------------------------------------|-----------|
//! | `Idle`    | operator presses A                            | `Intake`  |
//! | `Intake`  | pickup sequence finished                      | `Holding` |
//! | `Holding` | operator presses B                            | `Score`   |
//! | `Score`   | scoring queue drained, or timeout             | `Idle`    |

use std::time::Duration;

use murphy_hal::sim::{SimActuator, SimRelay};
use murphy_hal::{Gamepad, RobotContext, SubsystemRegistry, Telemetry};
use murphy_runtime::{BoxedTask, ParallelTask, QueueTask, SequentialTask, State, TaskExt, WaitTask};
use murphy_types::{Button, MurphyError};
use tracing::{info, warn};

use crate::tasks::{MoveActuatorTask, SetRelayTask};

pub const LIFT: &str = "lift";
pub const WRIST: &str = "wrist";
pub const CLAW: &str = "claw";
pub const INTAKE: &str = "intake";

/// Knobs shared by every state, copied from the configuration.
#[derive(Debug, Clone, Copy)]
pub struct Routines {
    pub score_queue_capacity: usize,
    pub score_timeout: Duration,
}

/// Simulated drivers for every mechanism the states command.
pub fn simulated_subsystems() -> SubsystemRegistry {
    let mut registry = SubsystemRegistry::new();
    registry.register_actuator(SimActuator::new(LIFT).with_travel(0.0, 1.2));
    registry.register_actuator(SimActuator::new(WRIST).with_travel(0.0, 1.0));
    registry.register_relay(SimRelay::new(CLAW));
    registry.register_relay(SimRelay::new(INTAKE));
    registry
}

/// Assemble a context with the simulated mechanisms registered.
pub fn build_context(
    telemetry: impl Telemetry + 'static,
    driver: impl Gamepad + 'static,
    operator: impl Gamepad + 'static,
    clock: impl murphy_hal::Clock + 'static,
) -> Result<RobotContext, MurphyError> {
    RobotContext::builder()
        .telemetry(telemetry)
        .gamepad1(driver)
        .gamepad2(operator)
        .clock(clock)
        .subsystems(simulated_subsystems())
        .build()
}

fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

/// Report driver stick input; the drivetrain itself is outside the demo.
fn report_drive(ctx: &mut RobotContext) {
    let driver = ctx.gamepad1();
    ctx.telemetry().add("drive_power", -driver.left_stick_y);
}

// ─────────────────────────────────────────────────────────────────────────────
// Idle
// ─────────────────────────────────────────────────────────────────────────────

pub struct Idle {
    routines: Routines,
}

impl Idle {
    pub fn new(routines: Routines) -> Box<Self> {
        Box::new(Self { routines })
    }
}

impl State for Idle {
    fn name(&self) -> &str {
        "Idle"
    }

    fn step(self: Box<Self>, ctx: &mut RobotContext) -> Result<Box<dyn State>, MurphyError> {
        report_drive(ctx);
        if ctx.gamepad2().pressed(Button::A) {
            return Ok(Intake::new(self.routines)?);
        }
        Ok(self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Intake
// ─────────────────────────────────────────────────────────────────────────────

/// Lowers the lift, runs the roller, grabs, and tucks the wrist.
pub struct Intake {
    routines: Routines,
    pickup: BoxedTask,
}

impl Intake {
    pub fn new(routines: Routines) -> Result<Box<Self>, MurphyError> {
        let pickup = SequentialTask::new(vec![
            ParallelTask::all(vec![
                MoveActuatorTask::new(LIFT, 0.0, secs(0.5)).boxed(),
                MoveActuatorTask::new(WRIST, 0.0, secs(0.3)).boxed(),
                SetRelayTask::new(CLAW, false).boxed(),
            ])?
            .boxed(),
            SetRelayTask::new(INTAKE, true).boxed(),
            WaitTask::new(1.0)?.boxed(),
            SetRelayTask::new(CLAW, true).boxed(),
            SetRelayTask::new(INTAKE, false).boxed(),
            MoveActuatorTask::new(WRIST, 0.2, secs(0.25)).boxed(),
        ])?
        .boxed();
        Ok(Box::new(Self { routines, pickup }))
    }
}

impl State for Intake {
    fn name(&self) -> &str {
        "Intake"
    }

    fn step(mut self: Box<Self>, ctx: &mut RobotContext) -> Result<Box<dyn State>, MurphyError> {
        report_drive(ctx);
        if self.pickup.step(ctx) {
            return Ok(self);
        }
        Ok(Box::new(Holding {
            routines: self.routines,
        }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Holding
// ─────────────────────────────────────────────────────────────────────────────

pub struct Holding {
    routines: Routines,
}

impl State for Holding {
    fn name(&self) -> &str {
        "Holding"
    }

    fn step(self: Box<Self>, ctx: &mut RobotContext) -> Result<Box<dyn State>, MurphyError> {
        report_drive(ctx);
        if ctx.gamepad2().pressed(Button::B) {
            return Ok(Score::new(self.routines)?);
        }
        Ok(self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Score
// ─────────────────────────────────────────────────────────────────────────────

/// Works through a queue of scoring steps, racing a timeout.
pub struct Score {
    routines: Routines,
    routine: BoxedTask,
}

impl Score {
    pub fn new(routines: Routines) -> Result<Box<Self>, MurphyError> {
        let steps: Vec<BoxedTask> = vec![
            MoveActuatorTask::new(LIFT, 1.0, secs(1.0)).boxed(),
            MoveActuatorTask::new(WRIST, 0.8, secs(0.5)).boxed(),
            SetRelayTask::new(CLAW, false).boxed(),
            WaitTask::new(0.25)?.boxed(),
            MoveActuatorTask::new(WRIST, 0.0, secs(0.5)).boxed(),
            MoveActuatorTask::new(LIFT, 0.0, secs(1.0)).boxed(),
        ];
        let queue =
            QueueTask::seeded(steps, Some(routines.score_queue_capacity))?.stop_on_empty(true);
        let routine = ParallelTask::race(vec![
            queue.boxed(),
            WaitTask::from_duration(routines.score_timeout).boxed(),
        ])?
        .boxed();
        Ok(Box::new(Self { routines, routine }))
    }
}

impl State for Score {
    fn name(&self) -> &str {
        "Score"
    }

    fn step(mut self: Box<Self>, ctx: &mut RobotContext) -> Result<Box<dyn State>, MurphyError> {
        report_drive(ctx);
        if self.routine.step(ctx) {
            return Ok(self);
        }
        if ctx.subsystems().relay(CLAW)?.state() {
            warn!("scoring ended with the claw still closed");
        }
        info!("scoring routine complete");
        Ok(Idle::new(self.routines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murphy_hal::{ManualClock, RecordingTelemetry, SimGamepad};
    use murphy_runtime::StateMachine;

    struct Rig {
        machine: StateMachine,
        clock: ManualClock,
        operator: SimGamepad,
    }

    impl Rig {
        fn new(routines: Routines) -> Self {
            let clock = ManualClock::new();
            let operator = SimGamepad::new();
            let ctx = build_context(
                RecordingTelemetry::new(),
                SimGamepad::new(),
                operator.clone(),
                clock.clone(),
            )
            .unwrap();
            Self {
                machine: StateMachine::new(Idle::new(routines), ctx),
                clock,
                operator,
            }
        }

        /// Advance at 50 Hz until the active state is `name`, or give up.
        fn run_until(&mut self, name: &str, max_ticks: usize) -> bool {
            for _ in 0..max_ticks {
                self.machine.advance().unwrap();
                self.clock.advance(Duration::from_millis(20));
                if self.machine.current_name() == Some(name) {
                    return true;
                }
            }
            false
        }

        fn tap(&mut self, button: Button) {
            self.operator.press(button);
            self.machine.advance().unwrap();
            self.operator.release(button);
        }

        fn position(&self, id: &str) -> f32 {
            self.machine.context().subsystems().actuator(id).unwrap().position()
        }

        fn engaged(&self, id: &str) -> bool {
            self.machine.context().subsystems().relay(id).unwrap().state()
        }
    }

    fn routines() -> Routines {
        Routines {
            score_queue_capacity: 8,
            score_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn idle_waits_for_operator() {
        let mut rig = Rig::new(routines());
        assert!(!rig.run_until("Intake", 100));
        assert_eq!(rig.machine.current_name(), Some("Idle"));
    }

    #[test]
    fn full_cycle_through_every_state() {
        let mut rig = Rig::new(routines());

        rig.tap(Button::A);
        assert_eq!(rig.machine.current_name(), Some("Intake"));

        assert!(rig.run_until("Holding", 200));
        assert!(rig.engaged(CLAW));
        assert!(!rig.engaged(INTAKE));
        assert!((rig.position(WRIST) - 0.2).abs() < 1e-4);

        rig.tap(Button::B);
        assert_eq!(rig.machine.current_name(), Some("Score"));

        assert!(rig.run_until("Idle", 400));
        assert!(!rig.engaged(CLAW));
        assert!(rig.position(LIFT).abs() < 1e-4);
        assert!(rig.position(WRIST).abs() < 1e-4);
    }

    #[test]
    fn score_timeout_cuts_routine_short() {
        let mut rig = Rig::new(Routines {
            score_timeout: Duration::from_millis(500),
            ..routines()
        });
        rig.tap(Button::A);
        assert!(rig.run_until("Holding", 200));
        rig.tap(Button::B);

        // 0.5 s at 50 Hz is 25 ticks; the full routine would take far longer.
        assert!(rig.run_until("Idle", 30));
        assert!(rig.position(LIFT) < 1.0);
    }

    #[test]
    fn undersized_score_queue_halts_machine() {
        let mut rig = Rig::new(Routines {
            score_queue_capacity: 2,
            ..routines()
        });
        rig.tap(Button::A);
        assert!(rig.run_until("Holding", 200));

        rig.operator.press(Button::B);
        let err = rig.machine.advance().unwrap_err();
        assert!(matches!(err, MurphyError::InvalidArgument(_)));
        assert!(rig.machine.is_halted());
    }
}
