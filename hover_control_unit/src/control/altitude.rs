//! Cascaded altitude controller: outer P on altitude, inner PI on climb rate.
//!
//! The outer loop turns altitude error into a climb-rate setpoint; the inner
//! loop turns climb-rate error into a thrust correction. Output is returned
//! unsaturated; clamping belongs to the output stage.
//!
//! The integrator has no reset and no anti-windup: it keeps accumulating
//! while the motors are saturated.

use hover_common::config::ConfigError;
use hover_common::control::AltitudeHoldConfig;

/// Controller memory, mutated only by [`AltitudeController::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    /// Altitude setpoint [m].
    pub target_altitude: f64,
    /// ∫ climb-rate error dt [m].
    pub integrated_velocity_error: f64,
    /// Sum of all accepted positive intervals [s].
    pub last_update_time: f64,
}

/// Stateful cascaded P / PI altitude controller.
#[derive(Debug, Clone)]
pub struct AltitudeController {
    gains: AltitudeHoldConfig,
    state: ControllerState,
}

impl AltitudeController {
    /// Build a controller from a validated parameter set.
    ///
    /// # Errors
    /// `ConfigError::ValidationError` for non-finite values or a negative
    /// altitude / velocity gain.
    pub fn new(config: AltitudeHoldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            gains: config,
            state: ControllerState {
                target_altitude: config.target_altitude,
                integrated_velocity_error: 0.0,
                last_update_time: 0.0,
            },
        })
    }

    #[inline]
    pub fn config(&self) -> &AltitudeHoldConfig {
        &self.gains
    }

    #[inline]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    #[inline]
    pub fn target_altitude(&self) -> f64 {
        self.state.target_altitude
    }

    #[inline]
    pub fn integrated_velocity_error(&self) -> f64 {
        self.state.integrated_velocity_error
    }

    /// Outer loop: desired climb rate [m/s] for the given altitude.
    #[inline]
    pub fn velocity_target(&self, altitude: f64) -> f64 {
        self.gains.altitude_gain * (self.state.target_altitude - altitude)
    }

    /// Compute one thrust correction.
    ///
    /// # Arguments
    /// - `altitude`: measured altitude [m, upward-positive].
    /// - `vertical_velocity`: measured climb rate [m/s, upward-positive].
    /// - `elapsed_time`: time since the previous sample [s]. The integral
    ///   only advances when this is strictly positive.
    ///
    /// # Returns
    /// Raw thrust command (not clamped).
    #[inline]
    pub fn update(&mut self, altitude: f64, vertical_velocity: f64, elapsed_time: f64) -> f64 {
        // ── Outer loop ──────────────────────────────────────────
        let velocity_target = self.velocity_target(altitude);

        // ── Inner loop ──────────────────────────────────────────
        let velocity_error = velocity_target - vertical_velocity;

        if elapsed_time > 0.0 {
            self.state.integrated_velocity_error += velocity_error * elapsed_time;
            self.state.last_update_time += elapsed_time;
        }

        self.gains.velocity_gain * velocity_error
            + self.gains.velocity_integral_gain * self.state.integrated_velocity_error
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
