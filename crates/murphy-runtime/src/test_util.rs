//! Shared fixtures for the runtime's unit tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use murphy_hal::{ManualClock, RecordingTelemetry, RobotContext, SimGamepad};

use crate::task::{BoxedTask, FnTask, TaskExt};

/// A context on simulated time, plus handles to its clock and telemetry.
pub(crate) fn context() -> (RobotContext, ManualClock, RecordingTelemetry) {
    let clock = ManualClock::new();
    let sink = RecordingTelemetry::new();
    let ctx = RobotContext::builder()
        .telemetry(sink.clone())
        .gamepad1(SimGamepad::new())
        .gamepad2(SimGamepad::new())
        .clock(clock.clone())
        .build()
        .expect("test context must build");
    (ctx, clock, sink)
}

/// Ordered record of which test tasks were stepped.
#[derive(Clone, Default)]
pub(crate) struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub(crate) fn push(&self, entry: &str) {
        self.0.borrow_mut().push(entry.to_string());
    }

    pub(crate) fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// How many times `name` was stepped.
    pub(crate) fn count(&self, name: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.as_str() == name).count()
    }
}

/// A task that logs `name` on every step and reports "still running" for its
/// first `running_steps` steps, then "finished" forever.
pub(crate) fn probe(name: &'static str, running_steps: usize, log: &Log) -> BoxedTask {
    let log = log.clone();
    let mut steps = 0usize;
    FnTask::new(name, move |_ctx, _elapsed: Duration| {
        log.push(name);
        steps += 1;
        steps <= running_steps
    })
    .boxed()
}
