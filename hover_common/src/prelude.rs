//! Prelude module for common re-exports.
//!
//! ```rust
//! use hover_common::prelude::*;
//! ```

use std::time::Duration;

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::control::AltitudeHoldConfig;

// ─── Simulation ─────────────────────────────────────────────────────
pub use crate::sim::{
    MOTOR_COUNT, MotorCommand, SHUTDOWN_TIME, STATE_DZ, STATE_LEN, STATE_Z, Sample, SimError,
    Simulation, VehicleState,
};

/// Default pause between control cycles in microseconds (1 ms).
pub const DEFAULT_YIELD_INTERVAL_US: u64 = 1000;

/// Default pause between control cycles as Duration.
pub const DEFAULT_YIELD_INTERVAL: Duration = Duration::from_micros(DEFAULT_YIELD_INTERVAL_US);
