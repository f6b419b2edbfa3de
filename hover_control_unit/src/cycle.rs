//! Sampling loop: read → control → write → yield.
//!
//! The loop is paced by the simulation's clock, not by its own timer. Each
//! iteration:
//! 1. Reads simulation time. A negative value is the shutdown sentinel and
//!    ends the loop before any motor write.
//! 2. Reads the NED state and converts it to an upward-positive [`Sample`].
//! 3. If the clock advanced, runs the controller with the elapsed interval
//!    and clamps the result. Otherwise the previous command is held. A
//!    non-finite clock or state reading is held as well.
//! 4. Broadcasts the command to every motor.
//! 5. Hands control to the [`Scheduler`] so the simulation can advance.

use std::time::Duration;

use hover_common::prelude::DEFAULT_YIELD_INTERVAL;
use hover_common::sim::{Sample, Simulation};
use tracing::{debug, info, trace, warn};

use crate::control::altitude::AltitudeController;
use crate::control::output::{broadcast, clamp_command, is_saturated};

/// Updates between two progress log lines.
const PROGRESS_INTERVAL: u64 = 1000;

// ─── Scheduler ──────────────────────────────────────────────────────

/// The loop's single suspension point.
///
/// Called after each iteration's motor write and before the next time read.
/// Carries no ordering guarantee beyond that.
pub trait Scheduler {
    fn yield_control(&mut self);
}

impl<Y: Scheduler + ?Sized> Scheduler for &mut Y {
    fn yield_control(&mut self) {
        (**self).yield_control()
    }
}

impl<Y: Scheduler + ?Sized> Scheduler for Box<Y> {
    fn yield_control(&mut self) {
        (**self).yield_control()
    }
}

/// Sleep for a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct SleepYield {
    interval: Duration,
}

impl SleepYield {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for SleepYield {
    fn default() -> Self {
        Self::new(DEFAULT_YIELD_INTERVAL)
    }
}

impl Scheduler for SleepYield {
    #[inline]
    fn yield_control(&mut self) {
        std::thread::sleep(self.interval);
    }
}

/// Give up the rest of the time slice to the OS scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadYield;

impl Scheduler for ThreadYield {
    #[inline]
    fn yield_control(&mut self) {
        std::thread::yield_now();
    }
}

/// Return immediately. For lock-step simulations that only advance on
/// motor writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoYield;

impl Scheduler for NoYield {
    #[inline]
    fn yield_control(&mut self) {}
}

// ─── Cycle outcome & statistics ─────────────────────────────────────

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cycle {
    /// Clock advanced; controller ran and produced `command`.
    Updated {
        sample: Sample,
        elapsed: f64,
        raw: f64,
        command: f64,
    },
    /// Clock stalled (or sample unusable); previous `command` re-sent.
    Held { sample: Sample, command: f64 },
    /// Shutdown sentinel read; nothing was written.
    Terminated { time: f64 },
}

impl Cycle {
    /// Command broadcast during this iteration, if any.
    pub fn command(&self) -> Option<f64> {
        match *self {
            Self::Updated { command, .. } | Self::Held { command, .. } => Some(command),
            Self::Terminated { .. } => None,
        }
    }
}

/// Counters accumulated over the loop's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopStats {
    /// Iterations that wrote the motors.
    pub cycles: u64,
    /// Iterations where the controller ran.
    pub updates: u64,
    /// Iterations that re-sent the previous command.
    pub held: u64,
    /// Held iterations caused by a NaN/inf sample.
    pub non_finite_samples: u64,
    /// Updates whose raw output was clamped.
    pub saturated: u64,
    /// Last command written.
    pub last_command: f64,
    /// Last non-sentinel simulation time [s].
    pub last_time: f64,
    /// Last sampled altitude [m].
    pub last_altitude: f64,
}

// ─── Control Loop ───────────────────────────────────────────────────

/// Drives an [`AltitudeController`] against a [`Simulation`].
pub struct ControlLoop<S, Y = SleepYield> {
    sim: S,
    controller: AltitudeController,
    scheduler: Y,
    previous_time: f64,
    last_command: f64,
    stats: LoopStats,
}

impl<S: Simulation, Y: Scheduler> ControlLoop<S, Y> {
    pub fn new(sim: S, controller: AltitudeController, scheduler: Y) -> Self {
        Self {
            sim,
            controller,
            scheduler,
            previous_time: 0.0,
            last_command: 0.0,
            stats: LoopStats::default(),
        }
    }

    #[inline]
    pub fn controller(&self) -> &AltitudeController {
        &self.controller
    }

    #[inline]
    pub fn last_command(&self) -> f64 {
        self.last_command
    }

    #[inline]
    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    #[inline]
    pub fn sim(&self) -> &S {
        &self.sim
    }

    #[inline]
    pub fn sim_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    /// Release the simulation and controller.
    pub fn into_parts(self) -> (S, AltitudeController) {
        (self.sim, self.controller)
    }

    /// Execute one iteration (without the trailing yield).
    pub fn step(&mut self) -> Cycle {
        let current_time = self.sim.time();
        if current_time < 0.0 {
            return Cycle::Terminated { time: current_time };
        }

        let state = self.sim.vehicle_state();
        let sample = Sample::from_ned(current_time, &state);

        let clock_finite = current_time.is_finite();
        let cycle = if clock_finite && current_time > self.previous_time && sample.is_finite() {
            let elapsed = current_time - self.previous_time;
            let raw = self
                .controller
                .update(sample.altitude, sample.vertical_velocity, elapsed);
            self.last_command = clamp_command(raw);

            self.stats.updates += 1;
            if is_saturated(raw) {
                self.stats.saturated += 1;
            }
            trace!(
                t = current_time,
                z = sample.altitude,
                dz = sample.vertical_velocity,
                raw,
                u = self.last_command,
                "control update"
            );
            if self.stats.updates % PROGRESS_INTERVAL == 0 {
                debug!(
                    t = current_time,
                    z = sample.altitude,
                    u = self.last_command,
                    integral = self.controller.integrated_velocity_error(),
                    "altitude hold progress"
                );
            }

            Cycle::Updated {
                sample,
                elapsed,
                raw,
                command: self.last_command,
            }
        } else {
            if !clock_finite {
                self.stats.non_finite_samples += 1;
                warn!(t = current_time, "non-finite clock, holding previous command");
            } else if !sample.is_finite() {
                self.stats.non_finite_samples += 1;
                warn!(
                    t = current_time,
                    z = sample.altitude,
                    dz = sample.vertical_velocity,
                    "non-finite sample, holding previous command"
                );
            }
            self.stats.held += 1;
            Cycle::Held {
                sample,
                command: self.last_command,
            }
        };

        self.sim.set_motors(&broadcast(self.last_command));
        // A non-finite reading must not become the reference for the next interval.
        if clock_finite {
            self.previous_time = current_time;
        }

        self.stats.cycles += 1;
        self.stats.last_command = self.last_command;
        self.stats.last_time = current_time;
        self.stats.last_altitude = sample.altitude;

        cycle
    }

    /// Run until the simulation reports the shutdown sentinel.
    ///
    /// Never returns while the simulation keeps a non-negative clock.
    pub fn run(&mut self) -> LoopStats {
        info!(
            target_altitude = self.controller.target_altitude(),
            "control loop entered"
        );

        loop {
            match self.step() {
                Cycle::Terminated { time } => {
                    info!(
                        sentinel = time,
                        cycles = self.stats.cycles,
                        updates = self.stats.updates,
                        "shutdown sentinel received, leaving control loop"
                    );
                    return self.stats;
                }
                Cycle::Updated { .. } | Cycle::Held { .. } => self.scheduler.yield_control(),
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
