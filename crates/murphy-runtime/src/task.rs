//! The single-step execution contract shared by every task.
//!
//! A task is polled once per tick.  It never blocks: "waiting" means
//! returning `true` ("call me again") and being stepped on the next tick.
//!
//! Behaviours implement [`Task`] (`initialize` once, `run` every tick) and are
//! wrapped in [`Tracked`], which owns the lifecycle bookkeeping and implements
//! [`Steppable`].  Combinators hold their children as [`BoxedTask`]s.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use murphy_hal::{ManualClock, RecordingTelemetry, RobotContext, SimGamepad};
//! use murphy_runtime::task::{FnTask, Steppable, TaskExt};
//!
//! let clock = ManualClock::new();
//! let mut ctx = RobotContext::builder()
//!     .telemetry(RecordingTelemetry::new())
//!     .gamepad1(SimGamepad::new())
//!     .gamepad2(SimGamepad::new())
//!     .clock(clock.clone())
//!     .build()
//!     .unwrap();
//!
//! let mut blink = FnTask::new("blink", |_ctx, elapsed| elapsed < Duration::from_secs(1)).boxed();
//! assert!(blink.step(&mut ctx));
//! clock.advance(Duration::from_secs(1));
//! assert!(!blink.step(&mut ctx));
//! ```

use std::time::Duration;

use murphy_hal::RobotContext;
use tracing::trace;

/// Anything that can be advanced by one tick.
///
/// Returns `true` while there is more work to do and `false` once finished.
/// Owners stop stepping a task after it reports `false`; the combinators in
/// this crate keep returning `false` if stepped again anyway.
pub trait Steppable {
    fn step(&mut self, ctx: &mut RobotContext) -> bool;
}

/// A type-erased, owned task as held by combinators and states.
pub type BoxedTask = Box<dyn Steppable>;

/// A behaviour with one-time setup and a per-tick body.
pub trait Task {
    /// Called exactly once, on the first step, before the first `run`.
    fn initialize(&mut self, _ctx: &mut RobotContext) {}

    /// Per-tick body.  `elapsed` is measured from the first step of this
    /// task (not from its construction).
    ///
    /// Return `true` to be called again next tick, `false` when complete.
    fn run(&mut self, ctx: &mut RobotContext, elapsed: Duration) -> bool;

    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Lifecycle wrapper turning a [`Task`] into a [`Steppable`].
///
/// The first step records the start time from the context clock, calls
/// [`Task::initialize`], then [`Task::run`].  Later steps only call `run`.
/// A finished task is never re-armed: the start time and the initialized
/// flag are set once for the lifetime of the wrapper.
pub struct Tracked<T> {
    task: T,
    initialized: bool,
    started_at: Duration,
}

impl<T: Task> Tracked<T> {
    pub fn new(task: T) -> Self {
        Self {
            task,
            initialized: false,
            started_at: Duration::ZERO,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Time since the first step, or zero if the task was never stepped.
    pub fn elapsed(&self, ctx: &RobotContext) -> Duration {
        if self.initialized {
            ctx.now().saturating_sub(self.started_at)
        } else {
            Duration::ZERO
        }
    }

    pub fn inner(&self) -> &T {
        &self.task
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.task
    }
}

impl<T: Task> Steppable for Tracked<T> {
    fn step(&mut self, ctx: &mut RobotContext) -> bool {
        if !self.initialized {
            self.started_at = ctx.now();
            trace!(task = self.task.name(), "initializing task");
            self.task.initialize(ctx);
            self.initialized = true;
        }
        let elapsed = ctx.now().saturating_sub(self.started_at);
        self.task.run(ctx, elapsed)
    }
}

/// Conversions from a [`Task`] into steppable forms.
pub trait TaskExt: Task + Sized + 'static {
    /// Wrap in [`Tracked`] and box, ready to hand to a combinator.
    fn boxed(self) -> BoxedTask {
        Box::new(Tracked::new(self))
    }

    fn tracked(self) -> Tracked<Self> {
        Tracked::new(self)
    }
}

impl<T: Task + 'static> TaskExt for T {}

// ─────────────────────────────────────────────────────────────────────────────
// FnTask
// ─────────────────────────────────────────────────────────────────────────────

type InitFn = Box<dyn FnMut(&mut RobotContext)>;

/// A task backed by a closure, for behaviours that do not warrant their own
/// type.
///
/// `body` is called once per tick with the context and the elapsed time; an
/// optional initializer runs once before the first `body` call.
pub struct FnTask<F> {
    name: String,
    init: Option<InitFn>,
    body: F,
}

impl<F> FnTask<F> {
    pub fn new(name: impl Into<String>, body: F) -> Self
    where
        F: FnMut(&mut RobotContext, Duration) -> bool,
    {
        Self {
            name: name.into(),
            init: None,
            body,
        }
    }

    /// Run `init` once, on the first step.
    pub fn on_initialize(mut self, init: impl FnMut(&mut RobotContext) + 'static) -> Self {
        self.init = Some(Box::new(init));
        self
    }
}

impl<F> Task for FnTask<F>
where
    F: FnMut(&mut RobotContext, Duration) -> bool,
{
    fn initialize(&mut self, ctx: &mut RobotContext) {
        if let Some(init) = self.init.as_mut() {
            init(ctx);
        }
    }

    fn run(&mut self, ctx: &mut RobotContext, elapsed: Duration) -> bool {
        (self.body)(ctx, elapsed)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
