//! Vertical multirotor dynamics.
//!
//! Each motor value `u ∈ [0, 1]` maps to a rotor speed
//! `omega = u * max_rpm * pi / 30` [rad/s] and a thrust `b * omega^2` [N].
//! The summed thrust acts along body-up; attitude is held level, so only
//! `z` / `dz` of the state vector ever change.
//!
//! Integration is semi-implicit Euler in NED:
//! `dz += (g - thrust / m) * dt`, then `z += dz * dt`.
//! The ground sits at `z = 0`; the vehicle cannot sink below it.

use hover_common::sim::{MOTOR_COUNT, MotorCommand, STATE_DZ, STATE_LEN, STATE_Z, SimError, VehicleState};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Standard gravity [m/s²].
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Physical vehicle parameters.
///
/// Defaults describe a Phantom-class quadcopter that hovers at roughly half
/// throttle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct VehicleParams {
    /// Vehicle mass [kg].
    pub mass: f64,
    /// Thrust coefficient `b` [N·s²/rad²].
    pub thrust_coefficient: f64,
    /// Rotor speed at full command [rpm].
    pub max_rpm: f64,
    /// Gravitational acceleration [m/s²].
    pub gravity: f64,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            mass: 1.3,
            thrust_coefficient: 5.30216718361085e-6,
            max_rpm: 15000.0,
            gravity: STANDARD_GRAVITY,
        }
    }
}

impl VehicleParams {
    pub fn validate(&self) -> Result<(), SimError> {
        for (name, value) in [
            ("mass", self.mass),
            ("thrust_coefficient", self.thrust_coefficient),
            ("max_rpm", self.max_rpm),
            ("gravity", self.gravity),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidParameter(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Rotor speed at full command [rad/s].
    #[inline]
    pub fn max_omega(&self) -> f64 {
        self.max_rpm * std::f64::consts::PI / 30.0
    }

    /// Uniform motor command whose thrust exactly cancels gravity.
    pub fn hover_command(&self) -> f64 {
        let per_motor = self.mass * self.gravity / MOTOR_COUNT as f64;
        (per_motor / self.thrust_coefficient).sqrt() / self.max_omega()
    }
}

/// Single-axis rigid-body state integrator.
#[derive(Debug, Clone)]
pub struct VerticalDynamics {
    params: VehicleParams,
    state: VehicleState,
}

impl VerticalDynamics {
    /// Create a vehicle resting on the ground.
    pub fn new(params: VehicleParams) -> Result<Self, SimError> {
        params.validate()?;
        Ok(Self {
            params,
            state: [0.0; STATE_LEN],
        })
    }

    /// Place the vehicle at `altitude` metres above ground, at rest.
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.state[STATE_Z] = -altitude.max(0.0);
        self.state[STATE_DZ] = 0.0;
        self
    }

    #[inline]
    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    #[inline]
    pub fn state(&self) -> VehicleState {
        self.state
    }

    /// Total upward thrust [N] for the given motor values.
    ///
    /// Values outside `[0, 1]` are clamped; the motors cannot spin backwards
    /// or above `max_rpm`.
    pub fn thrust(&self, motors: &MotorCommand) -> f64 {
        let max_omega = self.params.max_omega();
        motors
            .iter()
            .map(|&u| {
                let omega = u.clamp(0.0, 1.0) * max_omega;
                self.params.thrust_coefficient * omega * omega
            })
            .sum()
    }

    /// Advance the state by `dt` seconds under the given motor values.
    pub fn step(&mut self, motors: &MotorCommand, dt: f64) {
        if dt <= 0.0 {
            return;
        }

        let accel = self.params.gravity - self.thrust(motors) / self.params.mass;
        self.state[STATE_DZ] += accel * dt;
        self.state[STATE_Z] += self.state[STATE_DZ] * dt;

        // Ground contact.
        if self.state[STATE_Z] > 0.0 {
            self.state[STATE_Z] = 0.0;
            if self.state[STATE_DZ] > 0.0 {
                self.state[STATE_DZ] = 0.0;
            }
        }

        trace!(
            z = self.state[STATE_Z],
            dz = self.state[STATE_DZ],
            accel,
            "physics step"
        );
    }
}
