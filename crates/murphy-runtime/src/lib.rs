//! `murphy-runtime` – cooperative task and state composition for a robot
//! control loop.
//!
//! The host loop calls [`StateMachine::advance`] once per control cycle.  The
//! machine steps the single active [`State`], which may own and step tasks,
//! and installs whichever state it hands back.  Nothing blocks: every piece
//! of work is expressed as a task that is polled once per tick until it
//! reports completion.
//!
//! # Modules
//!
//! - [`task`] – the [`Steppable`] contract, the [`Task`] trait with its
//!   [`Tracked`] lifecycle wrapper, and the closure-backed [`FnTask`].
//! - [`wait`] – [`WaitTask`], a timed no-op.
//! - [`sequential`] – [`SequentialTask`], children one after another.
//! - [`parallel`] – [`ParallelTask`], children interleaved per tick, waiting
//!   for all or racing to the first completion.
//! - [`queue`] – [`QueueTask`], a bounded FIFO fed through [`QueueHandle`]s.
//! - [`state`] – the [`State`] trait and the [`StateMachine`] driver.
//! - [`logging`] – [`init_tracing`][logging::init_tracing] for hosts.
//!
//! # Threading
//!
//! Everything here is single-threaded.  "Parallel" means interleaved by
//! ticks on the caller's thread.  Tasks, states and the context are not
//! required to be `Send`, and [`QueueHandle`] shares its backlog through
//! `Rc`, so a machine stays on the thread that built it.

pub mod logging;
pub mod parallel;
pub mod queue;
pub mod sequential;
pub mod state;
pub mod task;
pub mod wait;

#[cfg(test)]
mod test_util;

pub use parallel::ParallelTask;
pub use queue::{QueueHandle, QueueTask};
pub use sequential::SequentialTask;
pub use state::{STATE_TELEMETRY_KEY, State, StateMachine};
pub use task::{BoxedTask, FnTask, Steppable, Task, TaskExt, Tracked};
pub use wait::WaitTask;
