//! Exit signal and touch-sensor watcher.

use super::PresentationError;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tam_common::hal::driver::TouchSensor;
use tracing::{debug, info};

/// Cross-thread request to end the program.
#[derive(Debug, Clone, Default)]
pub struct ExitSignal(Arc<AtomicBool>);

impl ExitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a press of the exit button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Terminate the process with status 0 on the spot.
    #[default]
    Immediate,
    /// Raise the exit signal; the main loop winds down at its next checkpoint.
    Cooperative,
}

/// Thread polling the exit button.
pub struct ExitWatcher {
    done: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ExitWatcher {
    pub fn spawn(
        mut touch: Box<dyn TouchSensor>,
        signal: ExitSignal,
        policy: ExitPolicy,
        poll: Duration,
    ) -> Result<Self, PresentationError> {
        let done = Arc::new(AtomicBool::new(false));
        let worker = {
            let done = done.clone();
            thread::Builder::new()
                .name("exit-watch".to_string())
                .spawn(move || {
                    while !done.load(Ordering::Acquire) && !signal.is_raised() {
                        if touch.is_pressed() {
                            match policy {
                                ExitPolicy::Immediate => {
                                    info!("Exit button pressed, terminating");
                                    process::exit(0);
                                }
                                ExitPolicy::Cooperative => {
                                    info!("Exit button pressed");
                                    signal.raise();
                                    break;
                                }
                            }
                        }
                        thread::sleep(poll);
                    }
                    debug!("Exit watcher finished");
                })
                .map_err(|e| PresentationError::Device(e.to_string()))?
        };
        Ok(Self {
            done,
            worker: Some(worker),
        })
    }

    /// Stop watching.
    pub fn stop(mut self) {
        self.done.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for ExitWatcher {
    fn drop(&mut self) {
        self.done.store(true, Ordering::Release);
    }
}
