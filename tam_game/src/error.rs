//! Game error types.

use crate::presentation::PresentationError;
use tam_common::config::ConfigError;
use tam_common::hal::driver::HalError;
use tam_common::hal::types::Axis;
use thiserror::Error;

/// Errors that end a match.
#[derive(Debug, Error)]
pub enum GameError {
    /// Kickoff called with a scorer other than 0, 1 or 2.
    #[error("Illegal scorer value: {0}")]
    InvalidScorer(u8),

    /// The exit signal was raised.
    #[error("Exit requested")]
    ExitRequested,

    /// A bounded blocking wait ran out.
    #[error("Axis {axis} did not settle within {waited_ms} ms")]
    WaitTimeout { axis: Axis, waited_ms: u64 },

    #[error(transparent)]
    Hal(#[from] HalError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Presentation(#[from] PresentationError),
}

impl GameError {
    /// Whether this is the designed way out rather than a failure.
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::ExitRequested)
    }
}
