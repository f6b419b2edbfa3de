//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use hover_common::config::{ConfigError, LogLevel};
use hover_control_unit::config::{HoverConfig, load_config};
use hover_control_unit::control::altitude::AltitudeController;
use tempfile::TempDir;

fn write(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("hover.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn shipped_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/hover.toml");
    let cfg = load_config(&path).unwrap();
    assert_eq!(cfg, HoverConfig::default());
    assert!(AltitudeController::new(cfg.controller).is_ok());
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = load_config(&dir.path().join("nope.toml")).unwrap_err();
    assert_eq!(err, ConfigError::FileNotFound);
}

#[test]
fn partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        r#"
[shared]
service_name = "cu-test"
log_level = "warn"

[controller]
target_altitude = 3.0
altitude_gain = 2.0
velocity_gain = 0.5
"#,
    );
    let cfg = load_config(&path).unwrap();
    assert_eq!(cfg.shared.log_level, LogLevel::Warn);
    assert_eq!(cfg.controller.target_altitude, 3.0);
    assert_eq!(cfg.controller.velocity_integral_gain, 0.0);
    assert_eq!(cfg.sim, HoverConfig::default().sim);

    let controller = AltitudeController::new(cfg.controller).unwrap();
    assert_eq!(controller.target_altitude(), 3.0);
}

#[test]
fn invalid_gain_surfaces_before_flight() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        r#"
[controller]
target_altitude = 10.0
altitude_gain = -1.0
velocity_gain = 1.0
"#,
    );
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn malformed_toml_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "[controller\ntarget_altitude = ");
    assert!(matches!(
        load_config(&path),
        Err(ConfigError::ParseError(_))
    ));
}
