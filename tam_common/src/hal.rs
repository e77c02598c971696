//! Hardware abstraction layer traits, types and configuration.
//!
//! The game core only talks to hardware through the traits in [`driver`]:
//! motor axes, distance sensors and the touch sensor. Concrete bindings live
//! in `tam_hal`.

pub mod config;
pub mod driver;
pub mod types;
