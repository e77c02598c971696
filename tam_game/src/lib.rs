//! # TAM-PONG Game Controller
//!
//! Turns two motor axes, two ultrasonic sensors and a touch sensor into a
//! game of Pong on a physical table.
//!
//! ## Threads
//!
//! - **Main loop** - the only thread that touches the ball motors and
//!   paddle sensors ([`game::runner::MatchRunner`])
//! - **Display worker** - renders screens from a single-slot command latch
//! - **Audio worker** - plays tones and jingles from a single-slot latch
//! - **Exit watcher** - polls the touch sensor and ends the program
//!
//! ## Levels
//!
//! 1. **Ball / Paddle / Player** - hardware-facing controllers
//! 2. **Rally** - pure zone and paddle-window resolution
//! 3. **MatchStateMachine** - AwaitStart → … → Reset | Exit
//! 4. **Session** - startup sequence and worker wiring

pub mod ball;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod game;
pub mod operator;
pub mod paddle;
pub mod player;
pub mod presentation;
pub mod startup;

pub use crate::config::GameConfig;
pub use crate::error::GameError;
