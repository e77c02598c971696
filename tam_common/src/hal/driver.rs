//! Hardware collaborator traits, HAL driver trait and error types.
//!
//! This module defines:
//! - `MotorAxis` - one position-counting motor driving a ball axis
//! - `DistanceSensor` - an ultrasonic paddle sensor
//! - `TouchSensor` - the exit button
//! - `HalDriver` trait - factory for the above, one per hardware backend
//! - `HalError` enum - error types for HAL operations

use crate::hal::config::HardwareConfig;
use crate::hal::types::{Axis, AxisVelocity, MotorState, StallThreshold};
use thiserror::Error;

/// Error types for HAL operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// Driver initialization failed
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Hardware communication error
    #[error("Hardware communication error: {0}")]
    CommunicationError(String),

    /// Driver not found
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    /// Sensor could not be switched into the requested mode.
    #[error("Invalid sensor mode: {0}")]
    InvalidSensorMode(String),
}

/// Factory function type for creating driver instances.
pub type DriverFactory = fn() -> Box<dyn HalDriver>;

/// One regulated motor with a position counter.
///
/// Commands are non-blocking: the motor keeps executing the last command
/// until it is reprogrammed. Reads are live, never cached.
pub trait MotorAxis: Send {
    /// Human-readable port or axis name, used in logs.
    fn name(&self) -> &str;

    /// Current position counter [tacho].
    fn position(&self) -> i32;

    /// Run continuously at the given speed and direction.
    fn run(&mut self, velocity: AxisVelocity);

    /// Start moving to an absolute counter value; returns immediately.
    fn move_to(&mut self, target: i32, speed: u32);

    /// Current state flags.
    fn state(&self) -> MotorState;

    /// Whether commanded motion is currently blocked.
    fn is_stalled(&self) -> bool {
        self.state().contains(MotorState::STALLED)
    }

    /// Stop and actively hold position.
    fn stop(&mut self);

    /// Remove power and let the motor float.
    fn coast(&mut self);

    /// Set the position counter to zero at the current position.
    fn reset_position(&mut self);

    /// Configure stall detection margins.
    fn set_stall_threshold(&mut self, threshold: StallThreshold);
}

/// Ultrasonic distance sensor.
pub trait DistanceSensor: Send {
    /// Take a fresh sample [m].
    fn sample(&mut self) -> f32;
}

/// Touch sensor.
pub trait TouchSensor: Send {
    /// Take a fresh sample; nonzero means pressed.
    fn sample(&mut self) -> f32;

    /// Whether the sensor is currently pressed.
    fn is_pressed(&mut self) -> bool {
        self.sample() > 0.0
    }
}

/// The two ball motors.
pub struct BallMotors {
    /// Motor driving the X axis (player 1 ↔ player 2).
    pub x: Box<dyn MotorAxis>,
    /// Motor driving the Y axis (upper wall ↔ lower wall).
    pub y: Box<dyn MotorAxis>,
}

impl BallMotors {
    /// Motor driving `axis`.
    pub fn axis(&self, axis: Axis) -> &dyn MotorAxis {
        match axis {
            Axis::X => self.x.as_ref(),
            Axis::Y => self.y.as_ref(),
        }
    }

    /// Mutable motor driving `axis`.
    pub fn axis_mut(&mut self, axis: Axis) -> &mut dyn MotorAxis {
        match axis {
            Axis::X => self.x.as_mut(),
            Axis::Y => self.y.as_mut(),
        }
    }

    /// Apply the same command to both motors, X first.
    pub fn both(&mut self, mut command: impl FnMut(&mut dyn MotorAxis)) {
        command(self.x.as_mut());
        command(self.y.as_mut());
    }
}

/// The two paddle sensors, indexed by player.
pub struct PaddleSensors {
    /// Player 1's sensor.
    pub player1: Box<dyn DistanceSensor>,
    /// Player 2's sensor.
    pub player2: Box<dyn DistanceSensor>,
}

/// Trait defining the interface for HAL drivers.
///
/// A driver owns the connection to one table and hands out the devices the
/// game needs. Each `open_*` method is called once per device set; callers
/// may retry `open_paddle_sensors` after `HalError::InvalidSensorMode`.
///
/// # Lifecycle
///
/// 1. `init()` - once, with the hardware config section
/// 2. `open_touch_sensor()`, `open_paddle_sensors()`, `open_motors()`
/// 3. `shutdown()` - when the program ends normally
pub trait HalDriver: Send {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Returns the driver's semantic version.
    fn version(&self) -> &'static str;

    /// Initialize the driver.
    ///
    /// # Errors
    /// Return `HalError::InitFailed` or `HalError::ConfigError` if the
    /// driver cannot start.
    fn init(&mut self, config: &HardwareConfig) -> Result<(), HalError>;

    /// Open the exit button.
    fn open_touch_sensor(&mut self) -> Result<Box<dyn TouchSensor>, HalError>;

    /// Open both paddle sensors in distance mode.
    ///
    /// # Errors
    /// `HalError::InvalidSensorMode` is recoverable; callers retry.
    fn open_paddle_sensors(&mut self) -> Result<PaddleSensors, HalError>;

    /// Open both ball motors.
    fn open_motors(&mut self) -> Result<BallMotors, HalError>;

    /// Release the hardware.
    fn shutdown(&mut self) -> Result<(), HalError>;
}
