//! [`WaitTask`] – a timed no-op.

use std::time::Duration;

use murphy_hal::RobotContext;
use murphy_types::MurphyError;

use crate::task::Task;

/// Keeps running until a fixed duration has passed since its first step.
///
/// Useful as a delay inside a [`SequentialTask`][crate::SequentialTask] or as
/// a timeout arm of a [`ParallelTask`][crate::ParallelTask] that stops on
/// first completion.
#[derive(Debug, Clone)]
pub struct WaitTask {
    duration: Duration,
}

impl WaitTask {
    /// Wait for `seconds`.
    ///
    /// # Errors
    ///
    /// [`MurphyError::InvalidArgument`] if `seconds` is negative, NaN or too
    /// large to represent.
    pub fn new(seconds: f64) -> Result<Self, MurphyError> {
        let duration = Duration::try_from_secs_f64(seconds).map_err(|_| {
            MurphyError::InvalidArgument(format!(
                "wait duration must be a finite, non-negative number of seconds (got {seconds})"
            ))
        })?;
        Ok(Self { duration })
    }

    pub fn from_duration(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Task for WaitTask {
    fn run(&mut self, _ctx: &mut RobotContext, elapsed: Duration) -> bool {
        elapsed < self.duration
    }

    fn name(&self) -> &str {
        "wait"
    }
}
