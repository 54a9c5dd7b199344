//! `tracing` subscriber initialisation for hosts embedding the runtime.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `RUST_LOG` | Log filter (default `"info"`). |
//! | `MURPHY_LOG_FORMAT=json` | Emit newline-delimited JSON logs. |
//!
//! # Example
//!
//! ```rust,no_run
//! murphy_runtime::logging::init_tracing().expect("a subscriber was already installed");
//! ```

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_VAR: &str = "MURPHY_LOG_FORMAT";

/// Install the global `tracing` subscriber.
///
/// # Errors
///
/// Fails when a global subscriber has already been installed.
pub fn init_tracing() -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = std::env::var(LOG_FORMAT_VAR).ok();

    let registry = tracing_subscriber::registry().with(env_filter);
    if wants_json(format.as_deref()) {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact().with_target(true))
            .try_init()
    }
}

fn wants_json(format: Option<&str>) -> bool {
    format.is_some_and(|f| f.eq_ignore_ascii_case("json"))
}
