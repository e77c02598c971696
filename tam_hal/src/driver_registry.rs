//! Driver registry for HAL drivers.
//!
//! Provides a `DriverRegistry` struct for registering and retrieving HAL
//! driver factories by name.

use std::collections::BTreeMap;
use tam_common::hal::driver::{DriverFactory, HalDriver, HalError};
use tracing::debug;

/// Registry of available HAL drivers.
///
/// Constructed at startup, populated via `register()`, then asked for the
/// driver named in the config.
pub struct DriverRegistry {
    factories: BTreeMap<&'static str, DriverFactory>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register a driver factory.
    ///
    /// # Panics
    /// Panics if a driver with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: DriverFactory) {
        if self.factories.contains_key(name) {
            panic!("Driver '{name}' is already registered");
        }
        debug!("Registered HAL driver '{name}'");
        self.factories.insert(name, factory);
    }

    /// Create a driver instance by name.
    ///
    /// # Errors
    /// Returns `HalError::DriverNotFound` if no driver with the given name is registered.
    pub fn create_driver(&self, name: &str) -> Result<Box<dyn HalDriver>, HalError> {
        let factory = self
            .factories
            .get(name)
            .copied()
            .ok_or_else(|| HalError::DriverNotFound(name.to_string()))?;
        Ok(factory())
    }

    /// List all registered driver names, sorted.
    pub fn list_drivers(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
