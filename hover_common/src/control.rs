//! Altitude-hold controller parameters.
//!
//! One immutable value configures the cascaded controller: the altitude to
//! hold and the three gains of the outer P / inner PI loops. A zero gain
//! disables its term.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Default altitude setpoint [m, upward-positive].
pub const DEFAULT_TARGET_ALTITUDE: f64 = 10.0;
/// Default outer-loop gain [1/s].
pub const DEFAULT_ALTITUDE_GAIN: f64 = 1.0;
/// Default inner-loop proportional gain.
pub const DEFAULT_VELOCITY_GAIN: f64 = 1.0;
/// Default inner-loop integral gain (integral disabled).
pub const DEFAULT_VELOCITY_INTEGRAL_GAIN: f64 = 0.0;

/// Parameters of the cascaded altitude controller.
///
/// # TOML Example
///
/// ```toml
/// [controller]
/// target_altitude = 10.0
/// altitude_gain = 1.0
/// velocity_gain = 1.0
/// velocity_integral_gain = 0.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AltitudeHoldConfig {
    /// Altitude setpoint [m, upward-positive].
    pub target_altitude: f64,
    /// Outer loop: altitude error → desired climb rate (Kp_alt, ≥ 0).
    pub altitude_gain: f64,
    /// Inner loop: proportional gain on climb-rate error (Kp_vel, ≥ 0).
    pub velocity_gain: f64,
    /// Inner loop: integral gain on climb-rate error (Ki_vel).
    #[serde(default)]
    pub velocity_integral_gain: f64,
}

impl Default for AltitudeHoldConfig {
    fn default() -> Self {
        Self {
            target_altitude: DEFAULT_TARGET_ALTITUDE,
            altitude_gain: DEFAULT_ALTITUDE_GAIN,
            velocity_gain: DEFAULT_VELOCITY_GAIN,
            velocity_integral_gain: DEFAULT_VELOCITY_INTEGRAL_GAIN,
        }
    }
}

impl AltitudeHoldConfig {
    /// Validate the parameter set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if any field is NaN or
    /// infinite, or if `altitude_gain` / `velocity_gain` is negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("target_altitude", self.target_altitude),
            ("altitude_gain", self.altitude_gain),
            ("velocity_gain", self.velocity_gain),
            ("velocity_integral_gain", self.velocity_integral_gain),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("altitude_gain", self.altitude_gain),
            ("velocity_gain", self.velocity_gain),
        ] {
            if value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}
