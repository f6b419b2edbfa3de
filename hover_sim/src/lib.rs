//! # Hover Simulation
//!
//! Software stand-in for the vehicle: vertical multirotor dynamics behind the
//! [`hover_common::sim::Simulation`] contract.
//!
//! Two runners are provided:
//! - [`LockstepSimulation`] advances one physics step per motor write. Fully
//!   deterministic, used by tests and batch runs.
//! - [`ThreadedSimulation`] advances on its own thread against the wall
//!   clock, independent of the control loop.
//!
//! Both stop on request through a [`StopHandle`], after which `time()`
//! reports [`hover_common::sim::SHUTDOWN_TIME`].

pub mod dynamics;
pub mod lockstep;
pub mod threaded;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use hover_common::sim::SimError;
use serde::{Deserialize, Serialize};

pub use dynamics::{VehicleParams, VerticalDynamics};
pub use lockstep::LockstepSimulation;
pub use threaded::ThreadedSimulation;

/// Default physics step [µs].
pub const DEFAULT_STEP_US: u64 = 1000;
/// Default simulated flight length [s].
pub const DEFAULT_DURATION_S: f64 = 30.0;

/// Simulation timing parameters.
///
/// # TOML Example
///
/// ```toml
/// [sim]
/// step_us = 1000
/// duration_s = 30.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SimConfig {
    /// Physics integration step [µs].
    pub step_us: u64,
    /// Simulated time after which the simulation shuts down [s].
    pub duration_s: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step_us: DEFAULT_STEP_US,
            duration_s: DEFAULT_DURATION_S,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.step_us == 0 {
            return Err(SimError::InvalidParameter(
                "step_us must be > 0".to_string(),
            ));
        }
        if !(self.duration_s.is_finite() && self.duration_s > 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "duration_s must be finite and > 0, got {}",
                self.duration_s
            )));
        }
        Ok(())
    }

    /// Physics step as Duration.
    #[inline]
    pub fn step(&self) -> Duration {
        Duration::from_micros(self.step_us)
    }

    /// Physics step [s].
    #[inline]
    pub fn step_secs(&self) -> f64 {
        self.step().as_secs_f64()
    }
}

/// Cloneable shutdown request shared with signal handlers.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the simulation to shut down; idempotent.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
