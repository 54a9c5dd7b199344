//! `murphy-sim` – runs the demo robot's state machine against simulated
//! mechanisms and a scripted drive team.
//!
//! 1. Installs the `tracing` subscriber (`RUST_LOG`, `MURPHY_LOG_FORMAT`).
//! 2. Loads `murphy.toml` (or the path given as the first argument), falling
//!    back to defaults when the file is absent.
//! 3. Ticks the control loop until the configured run time elapses or
//!    **Ctrl-C** is pressed, then brings every mechanism to rest.

mod config;
mod robot;
mod sim;
mod tasks;

use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, warn};

fn main() -> ExitCode {
    if let Err(e) = murphy_runtime::logging::init_tracing() {
        eprintln!("failed to initialise logging: {e}");
    }

    print_banner();

    // ── Shutdown flag ─────────────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – stopping after this tick …".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; the run cannot be interrupted");
    }

    // ── Configuration ─────────────────────────────────────────────────────
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(config::default_path);
    let cfg = match config::load_from(&path) {
        Ok(Some(cfg)) => {
            println!("  Config loaded from {}", path.display().to_string().bold());
            cfg
        }
        Ok(None) => {
            println!("  No config at {}, using defaults.", path.display().to_string().dimmed());
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = cfg.validate() {
        println!("{}: {}", "Config error".red(), e);
        return ExitCode::FAILURE;
    }

    println!(
        "  {} Hz for {} s ({} ticks){}\n",
        cfg.tick_hz.to_string().bold(),
        cfg.run_secs,
        cfg.total_ticks(),
        if cfg.realtime { "" } else { ", unpaced" }
    );

    // ── Control loop ──────────────────────────────────────────────────────
    match sim::run(&cfg, &shutdown) {
        Ok(summary) => {
            let status = if summary.interrupted {
                "interrupted".yellow()
            } else {
                "complete".green()
            };
            println!(
                "\n  {} Run {} after {} ticks in state {}.",
                "✓".green().bold(),
                status,
                summary.ticks,
                summary.final_state.bold()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "control loop halted");
            println!("\n  {} {}", "✗ Control loop halted:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", "  ╔══════════════════════════════════════╗".bold().cyan());
    println!("{}", "  ║          Murphy Robot Simulator      ║".bold().cyan());
    println!("{}", "  ╚══════════════════════════════════════╝".bold().cyan());
    println!();
}
