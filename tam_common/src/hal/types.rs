//! HAL value types.
//!
//! - `AxisVelocity` - speed magnitude plus direction command
//! - `StallThreshold` - stall detection margins
//! - `MotorState` - motor state flags reported by a driver
//! - `Axis` / `Side` - naming of the table's axes and players

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction command for a motor axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Position counter increases.
    #[default]
    Forward,
    /// Position counter decreases.
    Backward,
}

impl Direction {
    /// Sign multiplier for this direction.
    #[inline]
    pub const fn sign(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// Continuous-motion command: unsigned speed plus direction.
///
/// Only constructible from a signed rate, so a negative rate always becomes
/// a backward command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisVelocity {
    speed: u32,
    direction: Direction,
}

impl AxisVelocity {
    /// Split a signed rate [tacho/s] into speed and direction. Zero is forward.
    pub fn from_signed(rate: i64) -> Self {
        let direction = if rate < 0 {
            Direction::Backward
        } else {
            Direction::Forward
        };
        Self {
            speed: rate.unsigned_abs().min(u32::MAX as u64) as u32,
            direction,
        }
    }

    /// Speed magnitude [tacho/s].
    #[inline]
    pub const fn speed(&self) -> u32 {
        self.speed
    }

    /// Direction command.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Signed rate [tacho/s].
    #[inline]
    pub const fn signed(&self) -> i64 {
        self.speed as i64 * self.direction.sign()
    }
}

/// Stall detection margins.
///
/// A motor reports a stall once its position error stays above `error`
/// [tacho] for longer than `time` [driver time units].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StallThreshold {
    /// Position error margin.
    pub error: u32,
    /// Time margin.
    pub time: u32,
}

impl StallThreshold {
    /// Create a threshold.
    pub const fn new(error: u32, time: u32) -> Self {
        Self { error, time }
    }
}

bitflags! {
    /// Motor state flags as reported by a driver.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MotorState: u8 {
        /// Power is being sent to the motor.
        const RUNNING    = 0x01;
        /// Motor is accelerating or decelerating.
        const RAMPING    = 0x02;
        /// Motor actively holds its position.
        const HOLDING    = 0x04;
        /// Motor draws more than its rated duty.
        const OVERLOADED = 0x08;
        /// Commanded motion is blocked.
        const STALLED    = 0x10;
    }
}

/// Table axis driven by a ball motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Player 1 to player 2.
    X,
    /// Upper wall to lower wall.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("X"),
            Self::Y => f.write_str("Y"),
        }
    }
}

/// One of the two players (and their paddle and edge of the table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Player 1, at X = 0.
    Player1,
    /// Player 2, at X = max.
    Player2,
}

impl Side {
    /// The other player.
    #[inline]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }

    /// Player number as printed on screen (1 or 2).
    #[inline]
    pub const fn number(self) -> u8 {
        match self {
            Self::Player1 => 1,
            Self::Player2 => 2,
        }
    }

    /// Array index (0 or 1).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Player1 => 0,
            Self::Player2 => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}
