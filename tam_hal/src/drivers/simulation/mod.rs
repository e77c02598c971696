//! Simulation driver module.
//!
//! A software table for development and testing without the physical
//! build: two carriages with mechanical stops and stall detection, two
//! simulated players tracking the ball, and an exit button.

mod config;
mod devices;
mod driver;
mod physics;
mod table;

pub use config::SimulationConfig;
pub use devices::{SimMotor, SimSonar, SimTouch};
pub use driver::SimulationDriver;
pub use physics::{AxisSimulator, PaddleMode, PaddleSimulator};
pub use table::{SharedTable, SimClock, SimTable};

use tam_common::hal::driver::HalDriver;

/// Registry name of the simulation driver.
pub const DRIVER_NAME: &str = "simulation";

/// Factory function to create a simulation driver instance.
pub fn create_driver() -> Box<dyn HalDriver> {
    Box::new(SimulationDriver::new())
}
