//! Match module root.
//!
//! - [`machine`] - match lifecycle state machine
//! - [`rally`] - zone detection and paddle window, free of hardware
//! - [`runner`] - the main loop tying ball, players and workers together

pub mod machine;
pub mod rally;
pub mod runner;
