//! [`ParallelTask`] – runs children side by side, interleaved per tick.
//!
//! "Parallel" means every active child is stepped once per tick on the
//! calling thread; there is no multi-threading.
//!
//! # Completion policy
//!
//! Children start in an *active* set.  Each tick the active children are
//! stepped in their original order and any child that reports completion is
//! dropped from the set.
//!
//! - `stop_on_first_completion = false`: the task runs until the active set
//!   is empty, i.e. while at least one child is still running.
//! - `stop_on_first_completion = true`: the task completes the instant a
//!   child reports completion.  Children after that child in the active set
//!   are **not** stepped in that tick.

use std::time::Duration;

use murphy_hal::RobotContext;
use murphy_types::MurphyError;
use tracing::debug;

use crate::task::{BoxedTask, Task};

pub struct ParallelTask {
    active: Vec<BoxedTask>,
    stop_on_first_completion: bool,
    finished: bool,
}

impl ParallelTask {
    /// # Errors
    ///
    /// [`MurphyError::InvalidArgument`] if `children` is empty.
    pub fn new(
        stop_on_first_completion: bool,
        children: Vec<BoxedTask>,
    ) -> Result<Self, MurphyError> {
        if children.is_empty() {
            return Err(MurphyError::InvalidArgument(
                "parallel task needs at least one child".into(),
            ));
        }
        Ok(Self {
            active: children,
            stop_on_first_completion,
            finished: false,
        })
    }

    /// Run until every child has finished.
    pub fn all(children: Vec<BoxedTask>) -> Result<Self, MurphyError> {
        Self::new(false, children)
    }

    /// Run until any child finishes.
    pub fn race(children: Vec<BoxedTask>) -> Result<Self, MurphyError> {
        Self::new(true, children)
    }

    /// Children that have not reported completion yet.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn stops_on_first_completion(&self) -> bool {
        self.stop_on_first_completion
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Task for ParallelTask {
    fn run(&mut self, ctx: &mut RobotContext, _elapsed: Duration) -> bool {
        if self.finished {
            return false;
        }

        let stop_on_first = self.stop_on_first_completion;
        let mut tripped = false;
        self.active.retain_mut(|child| {
            if tripped {
                return true;
            }
            let running = child.step(ctx);
            if !running && stop_on_first {
                tripped = true;
            }
            running
        });

        if tripped || self.active.is_empty() {
            debug!(
                remaining = self.active.len(),
                stop_on_first, "parallel task finished"
            );
            self.finished = true;
        }
        !self.finished
    }

    fn name(&self) -> &str {
        "parallel"
    }
}
