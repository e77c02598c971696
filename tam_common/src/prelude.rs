//! Prelude module for common re-exports.
//!
//! ```rust
//! use tam_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Hardware ───────────────────────────────────────────────────────
pub use crate::hal::config::HardwareConfig;
pub use crate::hal::driver::{
    BallMotors, DistanceSensor, DriverFactory, HalDriver, HalError, MotorAxis, PaddleSensors,
    TouchSensor,
};
pub use crate::hal::types::{Axis, AxisVelocity, Direction, MotorState, Side, StallThreshold};

// ─── Rules ──────────────────────────────────────────────────────────
pub use crate::consts::{BALL_SPEED, INCREMENT, MAX_SCORE, PAD_TOL, WALL_TOL};
