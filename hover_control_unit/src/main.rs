//! # Hover Control Unit
//!
//! Altitude-hold take-off against the built-in vertical vehicle simulation.
//!
//! Loads `config/hover.toml` (or the given path; defaults if absent), starts
//! the simulation, and runs the control loop until the simulation shuts
//! down. Ctrl-C requests a simulation shutdown, so the loop still exits
//! through the regular sentinel path.

use clap::Parser;
use hover_common::config::ConfigError;
use hover_common::sim::{STATE_DZ, STATE_Z, Simulation};
use hover_control_unit::config::{HoverConfig, load_config};
use hover_control_unit::control::altitude::AltitudeController;
use hover_control_unit::cycle::{ControlLoop, LoopStats, Scheduler, SleepYield, ThreadYield};
use hover_sim::{LockstepSimulation, StopHandle, ThreadedSimulation};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Hover Control Unit: cascaded altitude hold
#[derive(Parser, Debug)]
#[command(name = "hover_control_unit")]
#[command(version)]
#[command(about = "Cascaded altitude-hold controller for a simulated vertical-lift vehicle")]
struct Args {
    /// Path to the configuration TOML.
    #[arg(default_value = "config/hover.toml")]
    config: PathBuf,

    /// Override the simulated flight length [s].
    #[arg(long, value_name = "SECONDS")]
    duration: Option<f64>,

    /// Override the altitude setpoint [m].
    #[arg(long, value_name = "METRES")]
    target: Option<f64>,

    /// Override the per-cycle pause [µs] (0 = yield time slice).
    #[arg(long, value_name = "MICROS")]
    yield_us: Option<u64>,

    /// Run the simulation on its own thread against the wall clock
    /// instead of lock-step.
    #[arg(long)]
    realtime: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let loaded = load_or_default(&args.config);
    let level = match (&loaded, args.verbose) {
        (_, true) => "debug",
        (Ok((cfg, _)), false) => cfg.shared.log_level.as_directive(),
        (Err(_), false) => "info",
    };
    setup_tracing(level, args.json);

    info!("Hover Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok((cfg, from_file)) => {
            if from_file {
                info!("Loaded config from {}", args.config.display());
            } else {
                warn!(
                    "No config at {}, using built-in defaults",
                    args.config.display()
                );
            }
            cfg
        }
        Err(e) => {
            error!("FATAL: {}: {e}", args.config.display());
            process::exit(1);
        }
    };

    match run(&args, config) {
        Ok(stats) => info!(
            cycles = stats.cycles,
            updates = stats.updates,
            held = stats.held,
            saturated = stats.saturated,
            final_altitude = stats.last_altitude,
            final_command = stats.last_command,
            "Hover Control Unit shutdown complete"
        ),
        Err(e) => {
            error!("FATAL: {e}");
            process::exit(1);
        }
    }
}

/// Load the config file; a missing file yields defaults (`from_file = false`).
fn load_or_default(path: &Path) -> Result<(HoverConfig, bool), ConfigError> {
    match load_config(path) {
        Ok(cfg) => Ok((cfg, true)),
        Err(ConfigError::FileNotFound) => Ok((HoverConfig::default(), false)),
        Err(e) => Err(e),
    }
}

/// Apply CLI overrides and re-validate.
fn apply_overrides(args: &Args, mut config: HoverConfig) -> Result<HoverConfig, ConfigError> {
    if let Some(duration) = args.duration {
        config.sim.duration_s = duration;
    }
    if let Some(target) = args.target {
        config.controller.target_altitude = target;
    }
    if let Some(yield_us) = args.yield_us {
        config.control_loop.yield_us = yield_us;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: HoverConfig) -> Result<LoopStats, Box<dyn std::error::Error>> {
    let config = apply_overrides(args, config)?;

    info!(
        "Config OK: target={} m, Kp_alt={}, Kp_vel={}, Ki_vel={}, step={}µs, duration={} s",
        config.controller.target_altitude,
        config.controller.altitude_gain,
        config.controller.velocity_gain,
        config.controller.velocity_integral_gain,
        config.sim.step_us,
        config.sim.duration_s,
    );

    let controller = AltitudeController::new(config.controller)?;

    let (mut sim, stop): (Box<dyn Simulation>, StopHandle) = if args.realtime {
        let sim = ThreadedSimulation::new(config.vehicle, config.sim)?;
        let stop = sim.stop_handle();
        (Box::new(sim), stop)
    } else {
        let sim = LockstepSimulation::new(config.vehicle, config.sim)?;
        let stop = sim.stop_handle();
        (Box::new(sim), stop)
    };

    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        stop.request_stop();
    })?;

    sim.start()?;
    info!(
        "Simulation started ({})",
        if args.realtime { "threaded" } else { "lock-step" }
    );

    let scheduler: Box<dyn Scheduler> = if config.control_loop.yield_us == 0 {
        Box::new(ThreadYield)
    } else {
        Box::new(SleepYield::new(config.control_loop.yield_interval()))
    };

    let mut control_loop = ControlLoop::new(sim, controller, scheduler);
    let stats = control_loop.run();

    let state = control_loop.sim_mut().vehicle_state();
    info!(
        altitude = -state[STATE_Z],
        climb_rate = -state[STATE_DZ],
        integral = control_loop.controller().integrated_velocity_error(),
        "Final vehicle state"
    );

    Ok(stats)
}

/// Setup tracing subscriber.
fn setup_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
