//! Control engine root.
//!
//! Cascaded altitude controller followed by the actuator output stage.

pub mod altitude;
pub mod output;
