//! Palletizer cell controller.
//!
//! Single entry point, no arguments: loads an optional `palletizer.toml`
//! from the working directory, then runs the fixed-period control loop
//! until terminated. One status line per tick; `RUST_LOG` adjusts
//! verbosity.

use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use pallet_common::Config;
use pallet_control::driver::{TickStats, TickTimer, spawn_cell, status_line};
use pallet_control::plant::Plant;
use pallet_tasks::StackArena;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        error!("palletizer startup failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default(Path::new("palletizer.toml"))?;
    info!(
        "palletizer cell controller v{} starting ({} ms tick)",
        env!("CARGO_PKG_VERSION"),
        config.tick_period_ms
    );

    let plant = Rc::new(Plant::new(&config));
    let actuators = plant.actuators();
    let arm_arena = StackArena::new("arm", config.arena_capacity);
    let mut cell = spawn_cell(&plant, &arm_arena);

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })?;
    }

    plant.process.set_active();

    let mut timer = TickTimer::new(Duration::from_millis(config.tick_period_ms));
    let mut stats = TickStats::new();
    while running.load(Ordering::SeqCst) {
        cell.step_once(&actuators);
        let slack_ns = timer.wait();
        stats.record(slack_ns);
        if slack_ns < 0 {
            warn!(
                "{} TOOK {:.3} ms TOO LONG",
                status_line(&plant),
                (-slack_ns) as f64 / 1e6
            );
        } else {
            info!("{} ({:.3} ms left)", status_line(&plant), slack_ns as f64 / 1e6);
        }
    }

    info!(
        ticks = stats.ticks,
        overruns = stats.overruns,
        "shutdown requested, stopping"
    );
    Ok(())
}
