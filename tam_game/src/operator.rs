//! Operator input: the start press and the rematch menu.
//!
//! The brick's buttons are not modelled; a console operator reads lines from
//! stdin and a scripted one answers on its own.

use crate::checkpoint::Checkpoint;
use crate::error::GameError;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Human at the table.
pub trait Operator: Send {
    /// Block until the operator starts the game.
    fn wait_for_start(&mut self, checkpoint: &Checkpoint) -> Result<(), GameError>;

    /// Ask for a rematch. `true` plays again.
    fn rematch(&mut self, checkpoint: &Checkpoint) -> Result<bool, GameError>;
}

/// Operator typing on the console.
pub struct ConsoleOperator {
    lines: Receiver<String>,
    poll: Duration,
}

impl ConsoleOperator {
    /// Reads stdin on a helper thread so waits stay cancellable.
    pub fn spawn(poll: Duration) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("console".to_string())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    let Ok(line) = line else { break };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self { lines: rx, poll })
    }

    /// Next line, or `None` once stdin is closed.
    fn next_line(&self, checkpoint: &Checkpoint) -> Result<Option<String>, GameError> {
        loop {
            checkpoint.check()?;
            match self.lines.recv_timeout(self.poll) {
                Ok(line) => return Ok(Some(line)),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Ok(None),
            }
        }
    }
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = io::stdout().flush();
}

/// Parse a rematch answer.
fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

impl Operator for ConsoleOperator {
    fn wait_for_start(&mut self, checkpoint: &Checkpoint) -> Result<(), GameError> {
        prompt("Press Enter to start ");
        match self.next_line(checkpoint)? {
            Some(_) => Ok(()),
            None => {
                info!("Console closed, starting anyway");
                Ok(())
            }
        }
    }

    fn rematch(&mut self, checkpoint: &Checkpoint) -> Result<bool, GameError> {
        loop {
            prompt("Rematch? [Yes/no] ");
            let Some(line) = self.next_line(checkpoint)? else {
                return Ok(false);
            };
            if let Some(answer) = parse_answer(&line) {
                return Ok(answer);
            }
        }
    }
}

/// Operator that starts at once and accepts a fixed number of rematches.
#[derive(Debug, Clone)]
pub struct ScriptedOperator {
    rematches_left: u32,
}

impl ScriptedOperator {
    pub fn new(rematches: u32) -> Self {
        Self {
            rematches_left: rematches,
        }
    }
}

impl Operator for ScriptedOperator {
    fn wait_for_start(&mut self, checkpoint: &Checkpoint) -> Result<(), GameError> {
        checkpoint.check()
    }

    fn rematch(&mut self, checkpoint: &Checkpoint) -> Result<bool, GameError> {
        checkpoint.check()?;
        let accept = self.rematches_left > 0;
        self.rematches_left = self.rematches_left.saturating_sub(1);
        debug!("Scripted rematch answer: {}", accept);
        Ok(accept)
    }
}
