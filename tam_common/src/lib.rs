//! TAM-PONG Common Library
//!
//! This crate provides shared constants, configuration loading utilities and
//! the hardware-collaborator traits used by all TAM-PONG workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Game rules and table geometry constants
//! - [`config`] - Configuration loading traits and types
//! - [`hal`] - Hardware abstraction layer traits, types and errors
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use tam_common::prelude::*;
//! use tam_common::consts::MAX_SCORE;
//! ```

pub mod config;
pub mod consts;
pub mod hal;
pub mod prelude;
