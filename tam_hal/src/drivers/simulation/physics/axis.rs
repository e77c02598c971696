//! Carriage physics simulator.
//!
//! The `AxisSimulator` models one tacho motor pulling a carriage along a
//! rail between two mechanical stops:
//! - Float: no power, carriage stays where it is
//! - Hold: stopped, position held
//! - Run: constant velocity until reprogrammed or blocked by a stop
//! - Seek: move to an absolute target at a given speed, then hold
//!
//! The carriage position is tracked physically (0 = min stop). The position
//! counter reported to the game is relative to the last counter reset.

use std::time::Duration;
use tam_common::hal::types::{AxisVelocity, MotorState, StallThreshold};
use tracing::{debug, trace};

/// Anything below this is treated as no motion [tacho].
const MOTION_EPSILON: f64 = 1e-9;

/// Length of one stall time unit.
const STALL_TIME_UNIT: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq)]
enum DriveMode {
    Float,
    Hold,
    Run { velocity: f64 },
    Seek { target: f64, speed: f64 },
}

/// Carriage simulator providing motion between two mechanical stops.
#[derive(Debug, Clone)]
pub struct AxisSimulator {
    /// Axis name for logs
    name: String,
    /// Distance between the stops [tacho]
    travel: f64,
    /// Position measured from the min stop [tacho]
    physical: f64,
    /// Physical position at the last counter reset
    origin: f64,
    /// Active drive command
    mode: DriveMode,
    /// Stall detection margins
    threshold: StallThreshold,
    /// How long commanded motion has been blocked
    blocked_for: Duration,
    /// Accumulated position error while blocked [tacho]
    blocked_error: f64,
    /// Stall flag
    stalled: bool,
}

impl AxisSimulator {
    /// Create a carriage resting at `start` on a rail of length `travel`.
    pub fn new(name: impl Into<String>, travel: f64, start: f64) -> Self {
        Self {
            name: name.into(),
            travel,
            physical: start.clamp(0.0, travel),
            origin: 0.0,
            mode: DriveMode::Float,
            threshold: StallThreshold::new(50, 50),
            blocked_for: Duration::ZERO,
            blocked_error: 0.0,
            stalled: false,
        }
    }

    /// Advance the carriage by `dt`.
    pub fn update(&mut self, dt: Duration) {
        let dt_s = dt.as_secs_f64();

        match self.mode {
            DriveMode::Float | DriveMode::Hold => self.clear_block(),
            DriveMode::Run { velocity } => {
                let wanted = velocity * dt_s;
                let moved = self.advance(wanted);
                self.track_block(wanted - moved, dt);
            }
            DriveMode::Seek { target, speed } => {
                let remaining = target - self.physical;
                let wanted = (speed * dt_s).min(remaining.abs()) * remaining.signum();
                let moved = self.advance(wanted);
                if (target - self.physical).abs() < MOTION_EPSILON {
                    self.mode = DriveMode::Hold;
                    self.clear_block();
                } else {
                    self.track_block(wanted - moved, dt);
                }
            }
        }

        trace!(
            "Axis {}: phys={:.2}, counter={}, mode={:?}, stalled={}",
            self.name,
            self.physical,
            self.position(),
            self.mode,
            self.stalled
        );
    }

    /// Move the carriage, clamped to the stops. Returns the distance moved.
    fn advance(&mut self, delta: f64) -> f64 {
        let next = (self.physical + delta).clamp(0.0, self.travel);
        let moved = next - self.physical;
        self.physical = next;
        moved
    }

    /// Accumulate blocked motion and raise the stall flag past the threshold.
    fn track_block(&mut self, shortfall: f64, dt: Duration) {
        if shortfall.abs() < MOTION_EPSILON {
            self.clear_block();
            return;
        }

        self.blocked_for += dt;
        self.blocked_error += shortfall.abs();

        let time_margin = STALL_TIME_UNIT * self.threshold.time;
        if !self.stalled
            && self.blocked_error >= self.threshold.error as f64
            && self.blocked_for >= time_margin
        {
            self.stalled = true;
            debug!(
                "Axis {} stalled at phys={:.1} (blocked {:?})",
                self.name, self.physical, self.blocked_for
            );
        }
    }

    fn clear_block(&mut self) {
        self.blocked_for = Duration::ZERO;
        self.blocked_error = 0.0;
        self.stalled = false;
    }

    /// Position counter [tacho].
    pub fn position(&self) -> i32 {
        (self.physical - self.origin).round() as i32
    }

    /// Position measured from the min stop [tacho].
    pub fn physical(&self) -> f64 {
        self.physical
    }

    /// Place the carriage (test setup).
    pub fn set_physical(&mut self, physical: f64) {
        self.physical = physical.clamp(0.0, self.travel);
    }

    /// Current state flags.
    pub fn state(&self) -> MotorState {
        let mut state = match self.mode {
            DriveMode::Float => MotorState::empty(),
            DriveMode::Hold => MotorState::HOLDING,
            DriveMode::Run { .. } | DriveMode::Seek { .. } => MotorState::RUNNING,
        };
        if self.stalled {
            state |= MotorState::STALLED;
        }
        state
    }

    /// Signed velocity command [tacho/s] (0 unless running).
    pub fn commanded_velocity(&self) -> f64 {
        match self.mode {
            DriveMode::Run { velocity } => velocity,
            _ => 0.0,
        }
    }

    /// Run continuously.
    pub fn run(&mut self, velocity: AxisVelocity) {
        self.mode = DriveMode::Run {
            velocity: velocity.signed() as f64,
        };
        self.clear_block();
    }

    /// Seek an absolute counter value.
    pub fn move_to(&mut self, target: i32, speed: u32) {
        self.mode = DriveMode::Seek {
            target: target as f64 + self.origin,
            speed: speed as f64,
        };
        self.clear_block();
    }

    /// Stop and hold.
    pub fn stop(&mut self) {
        self.mode = DriveMode::Hold;
        self.clear_block();
    }

    /// Remove power.
    pub fn coast(&mut self) {
        self.mode = DriveMode::Float;
        self.clear_block();
    }

    /// Zero the counter at the current position.
    pub fn reset_position(&mut self) {
        self.origin = self.physical;
        debug!("Axis {} counter reset at phys={:.1}", self.name, self.physical);
    }

    /// Configure stall detection.
    pub fn set_stall_threshold(&mut self, threshold: StallThreshold) {
        self.threshold = threshold;
    }

    /// Axis name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
