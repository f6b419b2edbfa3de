//! Free-running threaded simulation.
//!
//! A dedicated thread integrates the dynamics every `step_us` of wall-clock
//! time using the most recent motor values. The control loop reads time and
//! state through a `parking_lot::Mutex`; every read is a consistent snapshot.

use std::sync::Arc;
use std::thread::JoinHandle;

use hover_common::sim::{MotorCommand, SHUTDOWN_TIME, SimError, Simulation, VehicleState};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::dynamics::{VehicleParams, VerticalDynamics};
use crate::{SimConfig, StopHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Finished,
}

struct Shared {
    dynamics: VerticalDynamics,
    motors: MotorCommand,
    time: f64,
    steps: u64,
    phase: Phase,
}

/// Simulation whose clock runs on its own thread.
pub struct ThreadedSimulation {
    shared: Arc<Mutex<Shared>>,
    config: SimConfig,
    stop: StopHandle,
    worker: Option<JoinHandle<()>>,
}

impl ThreadedSimulation {
    pub fn new(params: VehicleParams, config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let dynamics = VerticalDynamics::new(params)?;
        Ok(Self {
            shared: Arc::new(Mutex::new(Shared {
                dynamics,
                motors: Default::default(),
                time: 0.0,
                steps: 0,
                phase: Phase::Idle,
            })),
            config,
            stop: StopHandle::new(),
            worker: None,
        })
    }

    /// Handle that shuts the simulation down from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Physics steps executed so far.
    pub fn steps(&self) -> u64 {
        self.shared.lock().steps
    }

    /// Block until the simulation thread has exited.
    pub fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("simulation thread panicked");
            }
        }
    }
}

fn run_physics(shared: Arc<Mutex<Shared>>, config: SimConfig, stop: StopHandle) {
    let step = config.step();
    let dt = config.step_secs();

    loop {
        {
            let mut s = shared.lock();
            if stop.is_stop_requested() || s.time >= config.duration_s {
                s.phase = Phase::Finished;
                debug!(steps = s.steps, time = s.time, "simulation thread finished");
                break;
            }
            let motors = s.motors;
            s.dynamics.step(&motors, dt);
            s.steps += 1;
            s.time = s.steps as f64 * dt;
        }
        std::thread::sleep(step);
    }
}

impl Simulation for ThreadedSimulation {
    fn start(&mut self) -> Result<(), SimError> {
        {
            let mut s = self.shared.lock();
            if s.phase != Phase::Idle {
                return Err(SimError::AlreadyStarted);
            }
            s.phase = Phase::Running;
        }

        let shared = Arc::clone(&self.shared);
        let config = self.config;
        let stop = self.stop.clone();
        let worker = std::thread::Builder::new()
            .name("hover-sim".to_string())
            .spawn(move || run_physics(shared, config, stop))
            .map_err(|e| {
                self.shared.lock().phase = Phase::Idle;
                SimError::Spawn(e.to_string())
            })?;
        self.worker = Some(worker);

        info!(
            step_us = self.config.step_us,
            duration_s = self.config.duration_s,
            "threaded simulation started"
        );
        Ok(())
    }

    fn time(&mut self) -> f64 {
        let s = self.shared.lock();
        match s.phase {
            Phase::Finished => SHUTDOWN_TIME,
            Phase::Idle | Phase::Running => s.time,
        }
    }

    fn vehicle_state(&mut self) -> VehicleState {
        self.shared.lock().dynamics.state()
    }

    fn set_motors(&mut self, motors: &MotorCommand) {
        self.shared.lock().motors = *motors;
    }
}

impl Drop for ThreadedSimulation {
    fn drop(&mut self) {
        self.stop.request_stop();
        self.join();
    }
}
