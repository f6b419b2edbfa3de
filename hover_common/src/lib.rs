//! Hover Common Library
//!
//! Shared types for the altitude-hold workspace: configuration loading,
//! the controller parameter set, and the contract every vehicle simulation
//! implements.
//!
//! # Module Structure
//!
//! - [`config`] - Configuration loading traits and types
//! - [`control`] - Altitude-hold controller parameters
//! - [`sim`] - Simulation contract, state vector layout and samples
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use hover_common::prelude::*;
//!
//! let params = AltitudeHoldConfig::default();
//! assert!(params.validate().is_ok());
//! ```

pub mod config;
pub mod control;
pub mod prelude;
pub mod sim;
