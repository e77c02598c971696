//! Presentation workers.
//!
//! Display and audio each run on their own thread, fed through a
//! single-slot [`latch::CommandLatch`]: the main loop overwrites the slot
//! freely and never waits for a command to be carried out. The exit watcher
//! polls the touch sensor.
//!
//! A worker whose device fails logs the error and stops; the match goes on
//! without it.

pub mod audio;
pub mod display;
pub mod exit;
pub mod latch;

use thiserror::Error;

/// Display and audio device errors.
#[derive(Debug, Clone, Error)]
pub enum PresentationError {
    /// The device cannot carry out this request.
    #[error("Unsupported request: {0}")]
    Unsupported(String),

    /// The device failed.
    #[error("Device error: {0}")]
    Device(String),
}
