//! HAL driver implementations.
//!
//! - [`simulation`] - Software table for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `HalDriver` trait from `tam_common::hal::driver`
//! 3. Register it in [`builtin_registry`]

pub mod simulation;

use crate::driver_registry::DriverRegistry;

/// Registry populated with every built-in driver.
pub fn builtin_registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new();
    registry.register(simulation::DRIVER_NAME, simulation::create_driver);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_is_builtin() {
        let registry = builtin_registry();
        assert_eq!(registry.list_drivers(), vec!["simulation"]);
        let driver = registry.create_driver("simulation").unwrap();
        assert_eq!(driver.name(), "simulation");
    }
}
