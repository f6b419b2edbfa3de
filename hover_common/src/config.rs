//! TOML configuration plumbing shared by the hover crates.
//!
//! The control unit reads one file (`config/hover.toml`) whose sections are
//! deserialized into plain structs. Loading goes through [`ConfigLoader`],
//! which every `DeserializeOwned` type gets for free; semantic checks stay
//! with each section's own `validate()`.
//!
//! ```rust,no_run
//! use hover_common::config::{ConfigError, ConfigLoader, SharedConfig};
//! use hover_common::control::AltitudeHoldConfig;
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Deserialize)]
//! struct Flight {
//!     shared: SharedConfig,
//!     controller: AltitudeHoldConfig,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let flight = Flight::load(Path::new("config/hover.toml"))?;
//!     flight.controller.validate()?;
//!     println!("{} holds {} m", flight.shared.service_name, flight.controller.target_altitude);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Why a configuration could not be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The file does not exist. Callers may fall back to defaults.
    #[error("Configuration file not found")]
    FileNotFound,

    /// Unreadable file or malformed TOML.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Parsed, but a value is out of range.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Default verbosity when neither `RUST_LOG` nor `-v` is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// `[shared]` table: process identity and log verbosity.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "hover-bench-rig"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Tag attached to the startup log line.
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            service_name: "hover_control_unit".to_string(),
        }
    }
}

impl SharedConfig {
    /// Rejects an empty `service_name`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a TOML-backed type from disk or from a string.
///
/// A missing file yields [`ConfigError::FileNotFound`]; any other I/O or
/// syntax failure yields [`ConfigError::ParseError`]. No validation is run.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
