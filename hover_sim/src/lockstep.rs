//! Deterministic lock-step simulation.
//!
//! Physics advances exactly one step per `set_motors()` call, so the clock
//! moves only when the controller has produced a command for the previous
//! sample. No threads, no wall-clock dependency.

use hover_common::sim::{MotorCommand, SHUTDOWN_TIME, SimError, Simulation, VehicleState};
use tracing::{debug, info};

use crate::dynamics::{VehicleParams, VerticalDynamics};
use crate::{SimConfig, StopHandle};

/// Lock-step runner around [`VerticalDynamics`].
pub struct LockstepSimulation {
    dynamics: VerticalDynamics,
    config: SimConfig,
    dt: f64,
    time: f64,
    steps: u64,
    started: bool,
    last_motors: MotorCommand,
    stop: StopHandle,
}

impl LockstepSimulation {
    pub fn new(params: VehicleParams, config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self::from_dynamics(VerticalDynamics::new(params)?, config))
    }

    /// Wrap pre-built dynamics (e.g. a vehicle already in the air).
    pub fn from_dynamics(dynamics: VerticalDynamics, config: SimConfig) -> Self {
        Self {
            dynamics,
            dt: config.step_secs(),
            config,
            time: 0.0,
            steps: 0,
            started: false,
            last_motors: Default::default(),
            stop: StopHandle::new(),
        }
    }

    /// Handle that shuts the simulation down from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    fn is_finished(&self) -> bool {
        self.stop.is_stop_requested() || self.time >= self.config.duration_s
    }

    #[inline]
    pub fn dynamics(&self) -> &VerticalDynamics {
        &self.dynamics
    }

    /// Physics steps executed so far.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Last motor values received.
    #[inline]
    pub fn last_motors(&self) -> &MotorCommand {
        &self.last_motors
    }
}

impl Simulation for LockstepSimulation {
    fn start(&mut self) -> Result<(), SimError> {
        if self.started {
            return Err(SimError::AlreadyStarted);
        }
        self.started = true;
        info!(
            step_us = self.config.step_us,
            duration_s = self.config.duration_s,
            "lock-step simulation started"
        );
        Ok(())
    }

    fn time(&mut self) -> f64 {
        if self.is_finished() {
            SHUTDOWN_TIME
        } else {
            self.time
        }
    }

    fn vehicle_state(&mut self) -> VehicleState {
        self.dynamics.state()
    }

    fn set_motors(&mut self, motors: &MotorCommand) {
        self.last_motors = *motors;
        if !self.started || self.is_finished() {
            return;
        }
        self.dynamics.step(motors, self.dt);
        self.steps += 1;
        // Time is derived from the step count, never summed.
        self.time = self.steps as f64 * self.dt;
        if self.is_finished() {
            debug!(steps = self.steps, time = self.time, "lock-step simulation finished");
        }
    }
}
