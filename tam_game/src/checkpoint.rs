//! Cancellation checkpoints for the main loop.
//!
//! The main loop observes the exit signal at the start of every rally poll,
//! on every poll of a blocking wait and in every slice of a pause.

use crate::config::{CalibrationConfig, TimingConfig, ms};
use crate::error::GameError;
use crate::presentation::exit::ExitSignal;
use std::thread;
use std::time::{Duration, Instant};
use tam_common::hal::types::Axis;
use tracing::warn;

/// Exit-aware pacing for the main loop.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    signal: ExitSignal,
    /// Sleep between polls of a blocking wait
    poll: Duration,
    /// Longest uninterrupted sleep inside a pause
    slice: Duration,
    /// Bound on a blocking wait
    timeout: Option<Duration>,
}

impl Checkpoint {
    pub fn new(signal: ExitSignal, calibration: &CalibrationConfig, timing: &TimingConfig) -> Self {
        Self {
            signal,
            poll: calibration.poll_interval(),
            slice: ms(timing.exit_poll_ms.max(1)),
            timeout: calibration.wait_timeout(),
        }
    }

    /// Fail with `ExitRequested` once the signal is raised.
    #[inline]
    pub fn check(&self) -> Result<(), GameError> {
        if self.signal.is_raised() {
            Err(GameError::ExitRequested)
        } else {
            Ok(())
        }
    }

    /// Sleep for `duration`, waking up early on exit.
    pub fn pause(&self, duration: Duration) -> Result<(), GameError> {
        self.check()?;
        let deadline = Instant::now() + duration;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            thread::sleep(self.slice.min(deadline - now));
            self.check()?;
        }
    }

    /// Poll until `pending` reports no axis left.
    ///
    /// `pending` returns the first axis still outstanding. Waits forever
    /// unless a timeout is configured.
    pub fn wait_for(&self, mut pending: impl FnMut() -> Option<Axis>) -> Result<(), GameError> {
        let started = Instant::now();
        loop {
            self.check()?;
            let Some(axis) = pending() else {
                return Ok(());
            };

            if let Some(limit) = self.timeout {
                let waited = started.elapsed();
                if waited >= limit {
                    warn!("Axis {} still pending after {:?}", axis, waited);
                    return Err(GameError::WaitTimeout {
                        axis,
                        waited_ms: waited.as_millis() as u64,
                    });
                }
            }

            if !self.poll.is_zero() {
                thread::sleep(self.poll);
            }
        }
    }

    /// The signal this checkpoint observes.
    pub fn signal(&self) -> &ExitSignal {
        &self.signal
    }
}
