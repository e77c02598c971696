//! Simulation driver implementation.
//!
//! The `SimulationDriver` implements the `HalDriver` trait on top of a
//! software table, so the game can run end to end without hardware.

use super::config::SimulationConfig;
use super::devices::{SimMotor, SimSonar, SimTouch};
use super::table::{SharedTable, SimTable};
use super::DRIVER_NAME;
use tam_common::hal::config::HardwareConfig;
use tam_common::hal::driver::{BallMotors, HalDriver, HalError, PaddleSensors, TouchSensor};
use tam_common::hal::types::{Axis, Side};
use tracing::{debug, info, warn};

/// Simulation driver implementing the HalDriver trait.
pub struct SimulationDriver {
    /// Driver version
    version: &'static str,
    /// Parsed physical model
    config: SimulationConfig,
    /// Table shared with the device handles (set by `init`)
    table: Option<SharedTable>,
    /// Remaining injected sensor mode failures
    mode_failures_left: u32,
}

impl SimulationDriver {
    /// Create a new simulation driver instance.
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            config: SimulationConfig::default(),
            table: None,
            mode_failures_left: 0,
        }
    }

    /// Handle to the simulated table, for inspection and scripted players.
    pub fn table(&self) -> Option<SharedTable> {
        self.table.clone()
    }

    /// Active physical model.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn initialized_table(&self) -> Result<SharedTable, HalError> {
        self.table
            .clone()
            .ok_or_else(|| HalError::InitFailed("simulation driver not initialized".to_string()))
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HalDriver for SimulationDriver {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn version(&self) -> &'static str {
        self.version
    }

    fn init(&mut self, config: &HardwareConfig) -> Result<(), HalError> {
        let sim_config: SimulationConfig = config.driver_section(DRIVER_NAME)?;
        sim_config.validate()?;

        info!(
            "Initializing simulation driver: travel {}x{} tacho, table {:.2}x{:.2} cm, clock {}",
            sim_config.travel_x,
            sim_config.travel_y,
            sim_config.plane_x_cm,
            sim_config.plane_y_cm,
            match sim_config.step() {
                Some(step) => format!("stepped {:?}", step),
                None => "realtime".to_string(),
            }
        );

        self.table = Some(SimTable::new(&sim_config).shared());
        self.mode_failures_left = sim_config.sensor_mode_failures;
        self.config = sim_config;
        Ok(())
    }

    fn open_touch_sensor(&mut self) -> Result<Box<dyn TouchSensor>, HalError> {
        let table = self.initialized_table()?;
        debug!("Opened simulated exit button");
        Ok(Box::new(SimTouch::new(table)))
    }

    fn open_paddle_sensors(&mut self) -> Result<PaddleSensors, HalError> {
        let table = self.initialized_table()?;
        if self.mode_failures_left > 0 {
            self.mode_failures_left -= 1;
            warn!(
                "Simulated sonar refused distance mode ({} failures left)",
                self.mode_failures_left
            );
            return Err(HalError::InvalidSensorMode(
                "sonar did not enter distance mode".to_string(),
            ));
        }

        debug!("Opened simulated paddle sensors");
        Ok(PaddleSensors {
            player1: Box::new(SimSonar::new(table.clone(), Side::Player1)),
            player2: Box::new(SimSonar::new(table, Side::Player2)),
        })
    }

    fn open_motors(&mut self) -> Result<BallMotors, HalError> {
        let table = self.initialized_table()?;
        debug!("Opened simulated ball motors");
        Ok(BallMotors {
            x: Box::new(SimMotor::new(table.clone(), Axis::X)),
            y: Box::new(SimMotor::new(table, Axis::Y)),
        })
    }

    fn shutdown(&mut self) -> Result<(), HalError> {
        info!("Shutting down simulation driver");
        self.table = None;
        Ok(())
    }
}
