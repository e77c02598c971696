//! Single-slot command latch.
//!
//! One writer, one reader, no queue. Posting replaces whatever the reader
//! has not picked up yet; the reader drains and clears the slot.

use parking_lot::{Condvar, Mutex};

struct Slot<T> {
    pending: Option<T>,
    closed: bool,
}

/// Single pending command shared between the main loop and a worker.
pub struct CommandLatch<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
}

impl<T> CommandLatch<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                pending: None,
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Replace the pending command. Returns the one that was overwritten.
    pub fn post(&self, command: T) -> Option<T> {
        let mut slot = self.slot.lock();
        let previous = slot.pending.replace(command);
        self.ready.notify_one();
        previous
    }

    /// Block until a command is pending and take it.
    ///
    /// Returns `None` once the latch is closed and drained.
    pub fn wait(&self) -> Option<T> {
        let mut slot = self.slot.lock();
        loop {
            if let Some(command) = slot.pending.take() {
                return Some(command);
            }
            if slot.closed {
                return None;
            }
            self.ready.wait(&mut slot);
        }
    }

    /// Wake the reader for good.
    pub fn close(&self) {
        self.slot.lock().closed = true;
        self.ready.notify_all();
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().pending.is_some()
    }
}

impl<T> Default for CommandLatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn newer_command_overwrites() {
        let latch = CommandLatch::new();
        assert_eq!(latch.post(1), None);
        assert_eq!(latch.post(2), Some(1));
        assert!(latch.is_pending());
        assert_eq!(latch.wait(), Some(2));
        assert!(!latch.is_pending());
    }

    #[test]
    fn wait_wakes_on_post() {
        let latch = Arc::new(CommandLatch::new());
        let reader = {
            let latch = latch.clone();
            thread::spawn(move || latch.wait())
        };
        latch.post("score");
        assert_eq!(reader.join().unwrap(), Some("score"));
    }

    #[test]
    fn close_drains_then_ends() {
        let latch = CommandLatch::new();
        latch.post(7);
        latch.close();
        assert_eq!(latch.wait(), Some(7));
        assert_eq!(latch.wait(), None);
    }
}
