//! HAL configuration types.
//!
//! The `[hardware]` section names the driver to load and carries one
//! free-form table per driver, parsed by the driver itself:
//!
//! ```toml
//! [hardware]
//! driver = "simulation"
//!
//! [hardware.driver_config.simulation]
//! travel_x = 940
//! ```

use crate::hal::driver::HalError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_driver() -> String {
    "simulation".to_string()
}

/// Hardware section of the application config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareConfig {
    /// Name of the HAL driver to load.
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Per-driver configuration sections.
    /// Key = driver name, Value = driver-specific TOML table.
    #[serde(default)]
    pub driver_config: HashMap<String, toml::Value>,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            driver_config: HashMap::new(),
        }
    }
}

impl HardwareConfig {
    /// Validate the hardware section.
    pub fn validate(&self) -> Result<(), HalError> {
        if self.driver.trim().is_empty() {
            return Err(HalError::ConfigError(
                "hardware.driver cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse the section belonging to `driver`, or its defaults if absent.
    pub fn driver_section<T>(&self, driver: &str) -> Result<T, HalError>
    where
        T: DeserializeOwned + Default,
    {
        match self.driver_config.get(driver) {
            Some(value) => value.clone().try_into().map_err(|e: toml::de::Error| {
                HalError::ConfigError(format!("driver_config.{driver}: {e}"))
            }),
            None => Ok(T::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Section {
        #[serde(default)]
        travel: u32,
    }

    #[test]
    fn defaults_to_simulation() {
        let config = HardwareConfig::default();
        assert_eq!(config.driver, "simulation");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_driver_is_rejected() {
        let config = HardwareConfig {
            driver: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(HalError::ConfigError(_))));
    }

    #[test]
    fn driver_section_is_parsed_on_demand() {
        let config: HardwareConfig = toml::from_str(
            r#"
driver = "simulation"
[driver_config.simulation]
travel = 940
"#,
        )
        .unwrap();

        let section: Section = config.driver_section("simulation").unwrap();
        assert_eq!(section.travel, 940);

        let missing: Section = config.driver_section("ev3").unwrap();
        assert_eq!(missing, Section::default());
    }

    #[test]
    fn malformed_driver_section_is_a_config_error() {
        let config: HardwareConfig = toml::from_str(
            r#"
[driver_config.simulation]
travel = "far"
"#,
        )
        .unwrap();

        let result: Result<Section, _> = config.driver_section("simulation");
        assert!(matches!(result, Err(HalError::ConfigError(_))));
    }
}
