//! Simulation driver configuration (`[hardware.driver_config.simulation]`).

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tam_common::consts::{PAD_WIDTH, PLANE_X, PLANE_Y, SENSOR_OFFSET_M};
use tam_common::hal::driver::HalError;

fn default_travel_x() -> u32 {
    940
}

fn default_travel_y() -> u32 {
    856
}

fn default_start_x() -> u32 {
    300
}

fn default_start_y() -> u32 {
    200
}

fn default_paddle_speed() -> f64 {
    4.0
}

fn default_plane_x() -> f64 {
    PLANE_X as f64
}

fn default_plane_y() -> f64 {
    PLANE_Y as f64
}

fn default_pad_width() -> f64 {
    PAD_WIDTH as f64
}

fn default_sensor_offset() -> f64 {
    SENSOR_OFFSET_M as f64
}

/// Physical model of the simulated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Mechanical travel of the X carriage between its stops [tacho].
    #[serde(default = "default_travel_x")]
    pub travel_x: u32,

    /// Mechanical travel of the Y carriage between its stops [tacho].
    #[serde(default = "default_travel_y")]
    pub travel_y: u32,

    /// Carriage position at power-on, measured from the X min stop [tacho].
    #[serde(default = "default_start_x")]
    pub start_x: u32,

    /// Carriage position at power-on, measured from the Y min stop [tacho].
    #[serde(default = "default_start_y")]
    pub start_y: u32,

    /// Physical table length along X [cm].
    #[serde(default = "default_plane_x")]
    pub plane_x_cm: f64,

    /// Physical table length along Y [cm].
    #[serde(default = "default_plane_y")]
    pub plane_y_cm: f64,

    /// Paddle width of the simulated players [cm].
    #[serde(default = "default_pad_width")]
    pub pad_width_cm: f64,

    /// Distance from sensor face to the table's upper wall [m].
    #[serde(default = "default_sensor_offset")]
    pub sensor_offset_m: f64,

    /// Virtual clock step per hardware read [µs]; 0 runs on wall-clock time.
    #[serde(default)]
    pub step_us: u64,

    /// Top speed of the simulated players' paddles [cm/s].
    #[serde(default = "default_paddle_speed")]
    pub paddle_speed_cm_s: f64,

    /// Number of times opening the paddle sensors fails with an invalid mode.
    #[serde(default)]
    pub sensor_mode_failures: u32,

    /// Press the exit button after this much simulated time [ms]; 0 = never.
    #[serde(default)]
    pub press_exit_after_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            travel_x: default_travel_x(),
            travel_y: default_travel_y(),
            start_x: default_start_x(),
            start_y: default_start_y(),
            plane_x_cm: default_plane_x(),
            plane_y_cm: default_plane_y(),
            pad_width_cm: default_pad_width(),
            sensor_offset_m: default_sensor_offset(),
            step_us: 0,
            paddle_speed_cm_s: default_paddle_speed(),
            sensor_mode_failures: 0,
            press_exit_after_ms: 0,
        }
    }
}

impl SimulationConfig {
    /// Validate the physical model.
    pub fn validate(&self) -> Result<(), HalError> {
        if self.travel_x == 0 || self.travel_y == 0 {
            return Err(HalError::ConfigError(
                "simulation travel must be greater than 0".to_string(),
            ));
        }
        if self.start_x > self.travel_x || self.start_y > self.travel_y {
            return Err(HalError::ConfigError(format!(
                "simulation start ({}, {}) outside travel ({}, {})",
                self.start_x, self.start_y, self.travel_x, self.travel_y
            )));
        }
        if self.plane_x_cm <= 0.0 || self.plane_y_cm <= 0.0 {
            return Err(HalError::ConfigError(
                "simulation plane lengths must be positive".to_string(),
            ));
        }
        if self.pad_width_cm <= 0.0 || self.pad_width_cm >= self.plane_y_cm {
            return Err(HalError::ConfigError(format!(
                "simulation pad width {} must be in (0, {})",
                self.pad_width_cm, self.plane_y_cm
            )));
        }
        if self.paddle_speed_cm_s < 0.0 {
            return Err(HalError::ConfigError(
                "paddle_speed_cm_s cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Virtual clock step, if the simulation runs on a stepped clock.
    pub fn step(&self) -> Option<Duration> {
        (self.step_us > 0).then(|| Duration::from_micros(self.step_us))
    }

    /// Simulated time at which the exit button goes down.
    pub fn exit_press_at(&self) -> Option<Duration> {
        (self.press_exit_after_ms > 0).then(|| Duration::from_millis(self.press_exit_after_ms))
    }

    /// Tacho counts per cm along Y.
    pub fn tacho_per_cm_y(&self) -> f64 {
        self.travel_y as f64 / self.plane_y_cm
    }
}
