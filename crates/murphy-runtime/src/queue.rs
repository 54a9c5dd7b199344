//! [`QueueTask`] – a FIFO work queue of tasks, consumed one at a time.
//!
//! The queue is meant to be long-lived: by default it keeps reporting
//! "still running" when it drains, so it can sit inside a
//! [`ParallelTask`][crate::ParallelTask] next to a task that decides when the
//! whole composition ends.  Producers outside the composition keep a
//! [`QueueHandle`] and append work while the queue runs.
//!
//! # Example
//!
//! ```rust
//! use murphy_runtime::{QueueTask, WaitTask, task::TaskExt};
//!
//! let queue = QueueTask::bounded(2).unwrap();
//! let producer = queue.handle();
//!
//! producer.enqueue(WaitTask::new(0.5).unwrap().boxed()).unwrap();
//! producer.enqueue(WaitTask::new(0.5).unwrap().boxed()).unwrap();
//! assert!(producer.enqueue(WaitTask::new(0.5).unwrap().boxed()).is_err());
//! assert_eq!(queue.len(), 2);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use murphy_hal::RobotContext;
use murphy_types::MurphyError;
use tracing::{debug, warn};

use crate::task::{BoxedTask, Task};

struct Backlog {
    pending: VecDeque<BoxedTask>,
    /// Set while the head has been taken out of `pending` to be stepped.
    head_in_flight: bool,
    capacity: Option<usize>,
}

impl Backlog {
    fn len(&self) -> usize {
        self.pending.len() + usize::from(self.head_in_flight)
    }

    fn push(&mut self, task: BoxedTask) -> Result<(), MurphyError> {
        if let Some(capacity) = self.capacity
            && self.len() >= capacity
        {
            warn!(capacity, "queue full, task rejected");
            return Err(MurphyError::QueueFull { capacity });
        }
        self.pending.push_back(task);
        Ok(())
    }
}

/// Producer-side handle to a [`QueueTask`].  Cheap to clone.
///
/// Enqueueing from inside the queue's own head task (while it is being
/// stepped) is allowed.
#[derive(Clone)]
pub struct QueueHandle {
    backlog: Rc<RefCell<Backlog>>,
}

impl QueueHandle {
    /// Append `task` to the tail of the queue.
    ///
    /// # Errors
    ///
    /// [`MurphyError::QueueFull`] when a capacity is set and already reached;
    /// the queue is left unchanged.
    pub fn enqueue(&self, task: BoxedTask) -> Result<(), MurphyError> {
        self.backlog.borrow_mut().push(task)
    }

    pub fn len(&self) -> usize {
        self.backlog.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Steps the task at the head of the queue once per tick and pops it when it
/// finishes.  Exactly one task is stepped per tick.
pub struct QueueTask {
    backlog: Rc<RefCell<Backlog>>,
    stop_on_empty: bool,
}

impl QueueTask {
    /// An empty, unbounded queue that never finishes on its own.
    pub fn new() -> Self {
        Self::from_backlog(VecDeque::new(), None)
    }

    /// An empty queue holding at most `capacity` tasks.
    ///
    /// # Errors
    ///
    /// [`MurphyError::InvalidArgument`] if `capacity` is zero.
    pub fn bounded(capacity: usize) -> Result<Self, MurphyError> {
        Self::seeded(Vec::new(), Some(capacity))
    }

    /// A queue pre-loaded with `tasks`, in order.
    ///
    /// # Errors
    ///
    /// [`MurphyError::InvalidArgument`] if `capacity` is zero or smaller than
    /// the number of seed tasks.
    pub fn seeded(tasks: Vec<BoxedTask>, capacity: Option<usize>) -> Result<Self, MurphyError> {
        if let Some(capacity) = capacity {
            if capacity == 0 {
                return Err(MurphyError::InvalidArgument(
                    "queue capacity must be at least 1".into(),
                ));
            }
            if tasks.len() > capacity {
                return Err(MurphyError::InvalidArgument(format!(
                    "{} seed tasks exceed queue capacity {capacity}",
                    tasks.len()
                )));
            }
        }
        Ok(Self::from_backlog(tasks.into(), capacity))
    }

    fn from_backlog(pending: VecDeque<BoxedTask>, capacity: Option<usize>) -> Self {
        Self {
            backlog: Rc::new(RefCell::new(Backlog {
                pending,
                head_in_flight: false,
                capacity,
            })),
            stop_on_empty: false,
        }
    }

    /// Finish (return `false`) once the queue drains instead of idling.
    pub fn stop_on_empty(mut self, stop: bool) -> Self {
        self.stop_on_empty = stop;
        self
    }

    /// A producer handle sharing this queue.
    pub fn handle(&self) -> QueueHandle {
        QueueHandle {
            backlog: Rc::clone(&self.backlog),
        }
    }

    /// Append `task` to the tail of the queue.
    ///
    /// # Errors
    ///
    /// [`MurphyError::QueueFull`] when the capacity is reached.
    pub fn enqueue(&self, task: BoxedTask) -> Result<(), MurphyError> {
        self.backlog.borrow_mut().push(task)
    }

    pub fn len(&self) -> usize {
        self.backlog.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> Option<usize> {
        self.backlog.borrow().capacity
    }
}

impl Default for QueueTask {
    fn default() -> Self {
        Self::new()
    }
}

impl Task for QueueTask {
    fn run(&mut self, ctx: &mut RobotContext, _elapsed: Duration) -> bool {
        // The head leaves the backlog while it is stepped so that it can
        // enqueue follow-up work through a handle without a double borrow.
        let mut head = {
            let mut backlog = self.backlog.borrow_mut();
            match backlog.pending.pop_front() {
                Some(task) => {
                    backlog.head_in_flight = true;
                    task
                }
                None => return !self.stop_on_empty,
            }
        };

        let running = head.step(ctx);

        let mut backlog = self.backlog.borrow_mut();
        backlog.head_in_flight = false;
        if running {
            backlog.pending.push_front(head);
        } else {
            debug!(remaining = backlog.pending.len(), "queued task finished");
        }

        !self.stop_on_empty || !backlog.pending.is_empty()
    }

    fn name(&self) -> &str {
        "queue"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{FnTask, TaskExt};
    use crate::test_util::{Log, context, probe};

    #[test]
    fn invalid_capacities_are_rejected() {
        assert!(matches!(QueueTask::bounded(0), Err(MurphyError::InvalidArgument(_))));

        let log = Log::default();
        let seeds = vec![probe("a", 0, &log), probe("b", 0, &log)];
        assert!(matches!(
            QueueTask::seeded(seeds, Some(1)),
            Err(MurphyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn enqueue_beyond_capacity_fails_and_size_is_unchanged() {
        let log = Log::default();
        let queue = QueueTask::bounded(3).unwrap();
        for name in ["a", "b", "c"] {
            queue.enqueue(probe(name, 0, &log)).unwrap();
        }

        let err = queue.enqueue(probe("d", 0, &log)).unwrap_err();
        assert_eq!(err, MurphyError::QueueFull { capacity: 3 });
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.capacity(), Some(3));
    }

    #[test]
    fn steps_only_the_head_in_fifo_order() {
        let (mut ctx, _clock, _sink) = context();
        let log = Log::default();
        let queue = QueueTask::seeded(
            vec![probe("a", 1, &log), probe("b", 0, &log), probe("c", 0, &log)],
            None,
        )
        .unwrap();
        let handle = queue.handle();
        let mut task = queue.boxed();

        for _ in 0..4 {
            assert!(task.step(&mut ctx));
        }
        // One step per tick even when the head finishes immediately.
        assert_eq!(log.entries(), vec!["a", "a", "b", "c"]);
        assert!(handle.is_empty());
    }

    #[test]
    fn idle_queue_keeps_running_and_accepts_late_work() {
        let (mut ctx, _clock, _sink) = context();
        let log = Log::default();
        let queue = QueueTask::new();
        let handle = queue.handle();
        let mut task = queue.boxed();

        for _ in 0..1000 {
            assert!(task.step(&mut ctx));
        }

        handle.enqueue(probe("late", 0, &log)).unwrap();
        assert_eq!(handle.len(), 1);
        assert!(task.step(&mut ctx));
        assert_eq!(log.entries(), vec!["late"]);
        assert!(task.step(&mut ctx));
        assert_eq!(log.count("late"), 1);
    }

    #[test]
    fn stop_on_empty_finishes_when_drained() {
        let (mut ctx, _clock, _sink) = context();
        let log = Log::default();
        let mut task = QueueTask::seeded(vec![probe("a", 0, &log), probe("b", 1, &log)], None)
            .unwrap()
            .stop_on_empty(true)
            .boxed();

        assert!(task.step(&mut ctx)); // a finishes, b pending
        assert!(task.step(&mut ctx)); // b running
        assert!(!task.step(&mut ctx)); // b finishes, queue drained
        assert!(!task.step(&mut ctx));
        assert_eq!(log.entries(), vec!["a", "b", "b"]);
    }

    #[test]
    fn drained_stop_on_empty_queue_still_runs_late_work() {
        let (mut ctx, _clock, _sink) = context();
        let log = Log::default();
        let queue = QueueTask::new().stop_on_empty(true);
        let handle = queue.handle();
        let mut task = queue.boxed();

        assert!(!task.step(&mut ctx));

        handle.enqueue(probe("late", 0, &log)).unwrap();
        assert!(!task.step(&mut ctx));
        assert_eq!(log.entries(), vec!["late"]);
        assert!(handle.is_empty());
    }

    #[test]
    fn empty_stop_on_empty_queue_finishes_immediately() {
        let (mut ctx, _clock, _sink) = context();
        let mut task = QueueTask::new().stop_on_empty(true).boxed();
        assert!(!task.step(&mut ctx));
    }

    #[test]
    fn head_task_can_enqueue_follow_up_work() {
        let (mut ctx, _clock, _sink) = context();
        let log = Log::default();
        let queue = QueueTask::bounded(2).unwrap();
        let handle = queue.handle();

        let producer = handle.clone();
        let follow_log = log.clone();
        let spawner = FnTask::new("spawner", move |_ctx, _elapsed| {
            follow_log.push("spawner");
            // The in-flight head still counts towards the capacity.
            assert_eq!(producer.len(), 1);
            producer.enqueue(probe("follow_up", 0, &follow_log)).unwrap();
            assert!(producer.enqueue(probe("overflow", 0, &follow_log)).is_err());
            false
        });
        queue.enqueue(spawner.boxed()).unwrap();

        let mut task = queue.boxed();
        assert!(task.step(&mut ctx));
        assert_eq!(handle.len(), 1);
        assert!(task.step(&mut ctx));
        assert_eq!(log.entries(), vec!["spawner", "follow_up"]);
        assert!(handle.is_empty());
    }
}
