//! Simulator configuration – reads `murphy.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Where telemetry frames go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TelemetrySink {
    /// Log each published frame through `tracing`.
    #[default]
    Tracing,
    /// Keep frames in memory only.
    Silent,
}

/// Settings for one simulator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Control-loop frequency.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,

    /// Simulated run length in seconds.
    #[serde(default = "default_run_secs")]
    pub run_secs: f64,

    /// Pace the loop against the wall clock.  When false the simulation
    /// runs as fast as possible.
    #[serde(default = "default_realtime")]
    pub realtime: bool,

    #[serde(default)]
    pub telemetry: TelemetrySink,

    /// Maximum number of steps in the scoring routine's queue.
    #[serde(default = "default_score_queue_capacity")]
    pub score_queue_capacity: usize,

    /// Scoring is abandoned if it has not finished after this many seconds.
    #[serde(default = "default_score_timeout_secs")]
    pub score_timeout_secs: f64,
}

fn default_tick_hz() -> u32 {
    50
}
fn default_run_secs() -> f64 {
    20.0
}
fn default_realtime() -> bool {
    true
}
fn default_score_queue_capacity() -> usize {
    8
}
fn default_score_timeout_secs() -> f64 {
    5.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            run_secs: default_run_secs(),
            realtime: default_realtime(),
            telemetry: TelemetrySink::default(),
            score_queue_capacity: default_score_queue_capacity(),
            score_timeout_secs: default_score_timeout_secs(),
        }
    }
}

impl Config {
    /// Reject settings the control loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_hz == 0 || self.tick_hz > 1000 {
            return Err(ConfigError::Invalid(format!(
                "tick_hz must be between 1 and 1000 (got {})",
                self.tick_hz
            )));
        }
        if !self.run_secs.is_finite() || self.run_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "run_secs must be a non-negative number (got {})",
                self.run_secs
            )));
        }
        if self.score_timeout_secs <= 0.0
            || Duration::try_from_secs_f64(self.score_timeout_secs).is_err()
        {
            return Err(ConfigError::Invalid(format!(
                "score_timeout_secs must be a positive, finite duration (got {})",
                self.score_timeout_secs
            )));
        }
        if self.score_queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "score_queue_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Number of ticks covering `run_secs`.
    pub fn total_ticks(&self) -> u64 {
        (self.run_secs * f64::from(self.tick_hz)).ceil() as u64
    }
}

/// `./murphy.toml`.
pub fn default_path() -> PathBuf {
    PathBuf::from("murphy.toml")
}

/// Load the config from `path`, applying environment overrides.
/// Returns `None` if the file does not exist.
pub fn load_from(path: &Path) -> Result<Option<Config>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut cfg: Config = toml::from_str(&raw)?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `MURPHY_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `MURPHY_TICK_HZ` | `tick_hz` |
/// | `MURPHY_RUN_SECS` | `run_secs` |
/// | `MURPHY_REALTIME` | `realtime` |
pub fn apply_env_overrides(cfg: &mut Config) {
    apply_overrides(cfg, |name| std::env::var(name).ok());
}

/// Override logic behind [`apply_env_overrides`], with the variable lookup
/// injected.  Unparseable values are ignored.
pub(crate) fn apply_overrides(cfg: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("MURPHY_TICK_HZ")
        && let Ok(hz) = v.parse::<u32>()
    {
        cfg.tick_hz = hz;
    }
    if let Some(v) = lookup("MURPHY_RUN_SECS")
        && let Ok(secs) = v.parse::<f64>()
    {
        cfg.run_secs = secs;
    }
    if let Some(v) = lookup("MURPHY_REALTIME")
        && let Ok(realtime) = v.parse::<bool>()
    {
        cfg.realtime = realtime;
    }
}
