//! TOML configuration bundle for the control unit.
//!
//! A single file carries every section; all sections except `[shared]` are
//! optional and fall back to defaults.
//!
//! ```toml
//! [shared]
//! service_name = "hover_control_unit"
//! log_level = "info"
//!
//! [controller]
//! target_altitude = 10.0
//! altitude_gain = 1.0
//! velocity_gain = 1.0
//! velocity_integral_gain = 0.0
//!
//! [loop]
//! yield_us = 1000
//!
//! [vehicle]
//! mass = 1.3
//!
//! [sim]
//! step_us = 1000
//! duration_s = 30.0
//! ```

use std::path::Path;
use std::time::Duration;

use hover_common::config::{ConfigError, ConfigLoader, SharedConfig};
use hover_common::control::AltitudeHoldConfig;
use hover_common::prelude::DEFAULT_YIELD_INTERVAL_US;
use hover_sim::{SimConfig, VehicleParams};
use serde::{Deserialize, Serialize};

/// Control-loop pacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoopConfig {
    /// Pause after each iteration [µs]. `0` yields the time slice instead of
    /// sleeping.
    pub yield_us: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            yield_us: DEFAULT_YIELD_INTERVAL_US,
        }
    }
}

impl LoopConfig {
    #[inline]
    pub fn yield_interval(&self) -> Duration {
        Duration::from_micros(self.yield_us)
    }
}

/// Complete validated configuration, ready for runtime use.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoverConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub controller: AltitudeHoldConfig,
    #[serde(default, rename = "loop")]
    pub control_loop: LoopConfig,
    #[serde(default)]
    pub vehicle: VehicleParams,
    #[serde(default)]
    pub sim: SimConfig,
}

impl HoverConfig {
    /// Run all validation rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.controller.validate()?;
        self.vehicle
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("vehicle: {e}")))?;
        self.sim
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("sim: {e}")))?;
        Ok(())
    }
}

/// Load and validate the configuration file.
pub fn load_config(path: &Path) -> Result<HoverConfig, ConfigError> {
    let config = HoverConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(content: &str) -> Result<HoverConfig, ConfigError> {
    let config = HoverConfig::from_toml(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = load_config_from_str("").unwrap();
        assert_eq!(cfg, HoverConfig::default());
        assert_eq!(cfg.control_loop.yield_interval(), Duration::from_millis(1));
    }

    #[test]
    fn full_file_parses() {
        let cfg = load_config_from_str(
            r#"
[shared]
service_name = "hover-test"
log_level = "debug"

[controller]
target_altitude = 4.0
altitude_gain = 0.8
velocity_gain = 1.5
velocity_integral_gain = 0.05

[loop]
yield_us = 0

[vehicle]
mass = 2.0

[sim]
step_us = 500
duration_s = 12.0
"#,
        )
        .unwrap();
        assert_eq!(cfg.shared.service_name, "hover-test");
        assert_eq!(cfg.controller.target_altitude, 4.0);
        assert_eq!(cfg.controller.velocity_integral_gain, 0.05);
        assert_eq!(cfg.control_loop.yield_us, 0);
        assert_eq!(cfg.vehicle.mass, 2.0);
        assert_eq!(cfg.vehicle.max_rpm, VehicleParams::default().max_rpm);
        assert_eq!(cfg.sim.step_us, 500);
    }

    #[test]
    fn negative_gain_is_validation_error() {
        let err = load_config_from_str(
            r#"
[controller]
target_altitude = 10.0
altitude_gain = 1.0
velocity_gain = -2.0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("velocity_gain"), "got: {err}");
    }

    #[test]
    fn bad_vehicle_and_sim_sections_rejected() {
        let err = load_config_from_str("[vehicle]\nmass = -1.0\n").unwrap_err();
        assert!(err.to_string().contains("vehicle"), "got: {err}");

        let err = load_config_from_str("[sim]\nstep_us = 0\n").unwrap_err();
        assert!(err.to_string().contains("sim"), "got: {err}");
    }

    #[test]
    fn unknown_section_is_parse_error() {
        let err = load_config_from_str("[telemetry]\nport = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
