//! # TAM-PONG HAL Library
//!
//! Hardware Abstraction Layer with pluggable driver architecture.
//!
//! Drivers implement the `HalDriver` trait defined in
//! `tam_common::hal::driver` and hand out the motors and sensors of one
//! table. The game never sees a concrete driver type.
//!
//! # Module Structure
//!
//! - [`driver_registry`] - Driver factory registration
//! - [`drivers`] - HAL driver implementations
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      tam_hal                                 │
//! │  ┌──────────────────┐        ┌────────────────────────────┐  │
//! │  │ DriverRegistry   │──────► │ HalDriver (trait object)   │  │
//! │  │ name → factory   │        │  ├─ MotorAxis  × 2         │  │
//! │  └──────────────────┘        │  ├─ DistanceSensor × 2     │  │
//! │                              │  └─ TouchSensor            │  │
//! │                              └────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod driver_registry;
pub mod drivers;

pub use crate::driver_registry::DriverRegistry;
pub use crate::drivers::builtin_registry;
