//! Vehicle simulation contract.
//!
//! The control unit never sees the physics. It talks to whatever implements
//! [`Simulation`]: a clock, a 12-element NED state vector and a motor input.
//!
//! # State vector layout
//!
//! | Index | Field  | Index | Field    |
//! |-------|--------|-------|----------|
//! | 0     | x      | 6     | phi      |
//! | 1     | dx     | 7     | dphi     |
//! | 2     | y      | 8     | theta    |
//! | 3     | dy     | 9     | dtheta   |
//! | 4     | z      | 10    | psi      |
//! | 5     | dz     | 11    | dpsi     |
//!
//! Positions and velocities are North-East-Down: `z` grows as the vehicle
//! descends.

use static_assertions::const_assert;
use thiserror::Error;

pub const STATE_X: usize = 0;
pub const STATE_DX: usize = 1;
pub const STATE_Y: usize = 2;
pub const STATE_DY: usize = 3;
pub const STATE_Z: usize = 4;
pub const STATE_DZ: usize = 5;
pub const STATE_PHI: usize = 6;
pub const STATE_DPHI: usize = 7;
pub const STATE_THETA: usize = 8;
pub const STATE_DTHETA: usize = 9;
pub const STATE_PSI: usize = 10;
pub const STATE_DPSI: usize = 11;

/// Number of elements in the vehicle state vector.
pub const STATE_LEN: usize = 12;

/// Number of actuators receiving the broadcast command.
pub const MOTOR_COUNT: usize = 4;

/// Value `time()` reports once the simulation has shut down.
pub const SHUTDOWN_TIME: f64 = -1.0;

const_assert!(STATE_DPSI < STATE_LEN);
const_assert!(MOTOR_COUNT > 0);

/// Full vehicle state, NED convention.
pub type VehicleState = [f64; STATE_LEN];

/// One normalized thrust value per actuator, each in `[0.0, 1.0]`.
pub type MotorCommand = [f64; MOTOR_COUNT];

/// Errors raised by simulation backends.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// `start()` called on a running simulation.
    #[error("Simulation already started")]
    AlreadyStarted,

    /// Physical or timing parameter out of range.
    #[error("Invalid simulation parameter: {0}")]
    InvalidParameter(String),

    /// Simulation thread could not be spawned.
    #[error("Failed to spawn simulation thread: {0}")]
    Spawn(String),
}

/// Interface every simulation backend exposes to the control loop.
///
/// # Contract
///
/// - `time()` is non-decreasing while the simulation runs and returns a
///   negative value once it has shut down.
/// - `vehicle_state()` returns a snapshot in the layout documented above.
/// - `set_motors()` expects values in `[0.0, 1.0]`; callers clamp.
pub trait Simulation {
    /// Begin simulation execution.
    fn start(&mut self) -> Result<(), SimError>;

    /// Current simulation time [s], or a negative sentinel on shutdown.
    fn time(&mut self) -> f64;

    /// Snapshot of the vehicle state.
    fn vehicle_state(&mut self) -> VehicleState;

    /// Apply one normalized thrust value per actuator.
    fn set_motors(&mut self, motors: &MotorCommand);
}

impl<S: Simulation + ?Sized> Simulation for &mut S {
    fn start(&mut self) -> Result<(), SimError> {
        (**self).start()
    }

    fn time(&mut self) -> f64 {
        (**self).time()
    }

    fn vehicle_state(&mut self) -> VehicleState {
        (**self).vehicle_state()
    }

    fn set_motors(&mut self, motors: &MotorCommand) {
        (**self).set_motors(motors)
    }
}

impl<S: Simulation + ?Sized> Simulation for Box<S> {
    fn start(&mut self) -> Result<(), SimError> {
        (**self).start()
    }

    fn time(&mut self) -> f64 {
        (**self).time()
    }

    fn vehicle_state(&mut self) -> VehicleState {
        (**self).vehicle_state()
    }

    fn set_motors(&mut self, motors: &MotorCommand) {
        (**self).set_motors(motors)
    }
}

/// One control-cycle reading, converted to upward-positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Simulation time [s].
    pub time: f64,
    /// Altitude [m], grows as the vehicle rises.
    pub altitude: f64,
    /// Climb rate [m/s], positive when rising.
    pub vertical_velocity: f64,
}

impl Sample {
    /// Build a sample from a NED state vector by negating `z` and `dz`.
    #[inline]
    pub fn from_ned(time: f64, state: &VehicleState) -> Self {
        Self {
            time,
            altitude: -state[STATE_Z],
            vertical_velocity: -state[STATE_DZ],
        }
    }

    /// True when altitude and climb rate are both finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.altitude.is_finite() && self.vertical_velocity.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_inverts_ned_sign() {
        let mut state = [0.0; STATE_LEN];
        state[STATE_Z] = 5.0;
        state[STATE_DZ] = -1.0;
        let s = Sample::from_ned(2.5, &state);
        assert_eq!(s.time, 2.5);
        assert_eq!(s.altitude, -5.0);
        assert_eq!(s.vertical_velocity, 1.0);
    }

    #[test]
    fn sample_ignores_other_components() {
        let mut state = [7.0; STATE_LEN];
        state[STATE_Z] = -3.0;
        state[STATE_DZ] = 0.5;
        let s = Sample::from_ned(0.0, &state);
        assert_eq!(s.altitude, 3.0);
        assert_eq!(s.vertical_velocity, -0.5);
    }

    #[test]
    fn non_finite_sample_detected() {
        let mut state = [0.0; STATE_LEN];
        assert!(Sample::from_ned(0.0, &state).is_finite());
        state[STATE_Z] = f64::NAN;
        assert!(!Sample::from_ned(0.0, &state).is_finite());
        state[STATE_Z] = 0.0;
        state[STATE_DZ] = f64::NEG_INFINITY;
        assert!(!Sample::from_ned(0.0, &state).is_finite());
    }

    #[test]
    fn sim_error_display() {
        let err = SimError::InvalidParameter("mass".to_string());
        assert!(err.to_string().contains("mass"));
        assert_eq!(
            SimError::AlreadyStarted.to_string(),
            "Simulation already started"
        );
    }
}
