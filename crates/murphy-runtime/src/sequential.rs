//! [`SequentialTask`] – runs children strictly one after another.

use std::time::Duration;

use murphy_hal::RobotContext;
use murphy_types::MurphyError;
use tracing::debug;

use crate::task::{BoxedTask, Task};

/// Runs its children in order, one child per tick.
///
/// Each tick steps only the current child.  When that child reports
/// completion the cursor moves on, but the next child is not stepped until
/// the following tick, so a child that finishes on its first step still
/// costs one full tick.
pub struct SequentialTask {
    children: Vec<BoxedTask>,
    cursor: usize,
}

impl SequentialTask {
    /// # Errors
    ///
    /// [`MurphyError::InvalidArgument`] if `children` is empty.
    pub fn new(children: Vec<BoxedTask>) -> Result<Self, MurphyError> {
        if children.is_empty() {
            return Err(MurphyError::InvalidArgument(
                "sequential task needs at least one child".into(),
            ));
        }
        Ok(Self {
            children,
            cursor: 0,
        })
    }

    /// Index of the child that will be stepped next; equals [`len`] once
    /// every child has finished.
    ///
    /// [`len`]: SequentialTask::len
    pub fn current_index(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.children.len()
    }
}

impl Task for SequentialTask {
    fn run(&mut self, ctx: &mut RobotContext, _elapsed: Duration) -> bool {
        let Some(current) = self.children.get_mut(self.cursor) else {
            return false;
        };
        if !current.step(ctx) {
            debug!(
                finished = self.cursor,
                total = self.children.len(),
                "sequence child finished"
            );
            self.cursor += 1;
        }
        self.cursor < self.children.len()
    }

    fn name(&self) -> &str {
        "sequence"
    }
}
