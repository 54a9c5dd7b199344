//! Telemetry sinks: the key/value channel states and tasks report through.
//!
//! A sink collects `key -> value` pairs during a tick and publishes them as
//! one frame when [`Telemetry::update`] is called by the host loop.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use murphy_types::TelemetryValue;
use tracing::{info, trace};

/// Target used for every event emitted by [`TracingTelemetry`].
pub const TELEMETRY_TARGET: &str = "murphy::telemetry";

/// A driver-station style telemetry sink.
pub trait Telemetry {
    /// Stage `value` under `key` for the current frame.  Writing the same key
    /// twice in one frame keeps the latest value.
    fn add_data(&mut self, key: &str, value: TelemetryValue);

    /// Publish the staged frame and start a new one.
    fn update(&mut self);
}

impl<'a> dyn Telemetry + 'a {
    /// Convenience wrapper around [`Telemetry::add_data`] accepting anything
    /// convertible into a [`TelemetryValue`].
    pub fn add(&mut self, key: &str, value: impl Into<TelemetryValue>) {
        self.add_data(key, value.into());
    }
}

fn render_frame(frame: &BTreeMap<String, TelemetryValue>) -> String {
    frame
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// ─────────────────────────────────────────────────────────────────────────────
// RecordingTelemetry
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Frames {
    staged: BTreeMap<String, TelemetryValue>,
    published: BTreeMap<String, TelemetryValue>,
    updates: u64,
}

/// In-memory sink that keeps the frame being built and the last published
/// frame.  Clones share the same storage, so a test can keep one clone and
/// hand the other to a [`RobotContext`][crate::context::RobotContext].
///
/// Memory use is bounded by the number of distinct keys; no history is kept.
#[derive(Clone, Default)]
pub struct RecordingTelemetry {
    frames: Rc<RefCell<Frames>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value staged under `key` in the frame currently being built.
    pub fn staged(&self, key: &str) -> Option<TelemetryValue> {
        self.frames.borrow().staged.get(key).cloned()
    }

    /// Value under `key` in the most recently published frame.
    pub fn published(&self, key: &str) -> Option<TelemetryValue> {
        self.frames.borrow().published.get(key).cloned()
    }

    /// Number of frames published so far.
    pub fn update_count(&self) -> u64 {
        self.frames.borrow().updates
    }
}

impl Telemetry for RecordingTelemetry {
    fn add_data(&mut self, key: &str, value: TelemetryValue) {
        self.frames.borrow_mut().staged.insert(key.to_string(), value);
    }

    fn update(&mut self) {
        let mut frames = self.frames.borrow_mut();
        frames.published = std::mem::take(&mut frames.staged);
        frames.updates += 1;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingTelemetry
// ─────────────────────────────────────────────────────────────────────────────

/// Sink that forwards frames to `tracing` under [`TELEMETRY_TARGET`].
///
/// Individual writes are logged at `TRACE`, published frames at `INFO`.
#[derive(Default)]
pub struct TracingTelemetry {
    staged: BTreeMap<String, TelemetryValue>,
    frame: u64,
}

impl TracingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Telemetry for TracingTelemetry {
    fn add_data(&mut self, key: &str, value: TelemetryValue) {
        trace!(target: TELEMETRY_TARGET, key, value = %value, "telemetry write");
        self.staged.insert(key.to_string(), value);
    }

    fn update(&mut self) {
        if !self.staged.is_empty() {
            info!(
                target: TELEMETRY_TARGET,
                frame = self.frame,
                data = %render_frame(&self.staged),
                "telemetry frame"
            );
        }
        self.staged.clear();
        self.frame += 1;
    }
}
