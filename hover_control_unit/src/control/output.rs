//! Actuator output stage.
//!
//! The controller's raw correction is limited to the motor-valid range and
//! sent identically to every motor. No per-motor mixing.

use hover_common::sim::{MOTOR_COUNT, MotorCommand};

/// Lowest valid motor command.
pub const COMMAND_MIN: f64 = 0.0;
/// Highest valid motor command.
pub const COMMAND_MAX: f64 = 1.0;

/// Limit a raw controller output to `[0, 1]`: `max(0, min(1, raw))`.
///
/// NaN maps to [`COMMAND_MIN`].
#[inline]
pub fn clamp_command(raw: f64) -> f64 {
    if raw.is_nan() {
        return COMMAND_MIN;
    }
    raw.min(COMMAND_MAX).max(COMMAND_MIN)
}

/// Uniform command for every motor.
#[inline]
pub fn broadcast(command: f64) -> MotorCommand {
    [command; MOTOR_COUNT]
}

/// True when the raw output lies outside the motor-valid range.
#[inline]
pub fn is_saturated(raw: f64) -> bool {
    !(COMMAND_MIN..=COMMAND_MAX).contains(&raw)
}
