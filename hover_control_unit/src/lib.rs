//! # Hover Control Unit Library
//!
//! Closed-loop altitude hold for a vertical-lift vehicle. Each cycle reads
//! the simulation clock and state, runs a cascaded controller (outer P on
//! altitude, inner PI on climb rate), clamps the result to `[0, 1]` and
//! broadcasts it to every motor.
//!
//! ## Layout
//!
//! - [`control::altitude`]: the cascaded controller and its integrator
//! - [`control::output`]: clamping and uniform motor broadcast
//! - [`cycle`]: the sampling loop and its yield point
//! - [`config`]: TOML configuration bundle

pub mod config;
pub mod control;
pub mod cycle;
