//! Time sources for elapsed-time measurement.
//!
//! Tasks never read the wall clock directly; they ask the context's [`Clock`]
//! so that tests and the simulator can drive time explicitly with a
//! [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A monotonic time source.  `now` is measured from an arbitrary origin and
/// never decreases.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time since the clock was created.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Simulated time that only moves when told to.  Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Advance by a (non-negative) number of seconds.  Negative or non-finite
    /// values are ignored, keeping the clock monotonic.
    pub fn advance_secs(&self, secs: f64) {
        if let Ok(by) = Duration::try_from_secs_f64(secs) {
            self.advance(by);
        }
    }

    /// Jump to an absolute time.  Ignored when `to` lies in the past.
    pub fn set(&self, to: Duration) {
        if to >= self.now.get() {
            self.now.set(to);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
