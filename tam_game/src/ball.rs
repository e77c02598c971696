//! Ball controller.
//!
//! The ball is a magnet carried by two motor-driven carriages. Its position
//! is never stored: every read goes to the motors' position counters.
//!
//! Calibration is a two-phase affair. An [`UncalibratedBall`] can only
//! calibrate; calibrating consumes it and yields a [`Ball`] whose
//! tacho-per-cm factors are fixed for its lifetime.

use crate::checkpoint::Checkpoint;
use crate::config::{CalibrationConfig, TableConfig, ms};
use crate::error::GameError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tam_common::consts::{KICKOFF_SPREAD, MAX_BOUNCE_ANGLE};
use tam_common::hal::driver::BallMotors;
use tam_common::hal::types::{Axis, AxisVelocity, Side};
use tracing::{debug, info, trace};

/// Serve heading toward player 2.
pub const TOWARD_PLAYER2: f64 = 0.0;

/// Serve heading toward player 1.
pub const TOWARD_PLAYER1: f64 = 180.0;

// ─── Scorer ─────────────────────────────────────────────────────────

/// Who scored the point before a kickoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scorer {
    /// First serve of a game: random side.
    Nobody,
    /// Serve toward player 1.
    Player1,
    /// Serve toward player 2.
    Player2,
}

impl TryFrom<u8> for Scorer {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Nobody),
            1 => Ok(Self::Player1),
            2 => Ok(Self::Player2),
            other => Err(GameError::InvalidScorer(other)),
        }
    }
}

impl From<Side> for Scorer {
    fn from(side: Side) -> Self {
        match side {
            Side::Player1 => Self::Player1,
            Side::Player2 => Self::Player2,
        }
    }
}

// ─── Pure heading math ──────────────────────────────────────────────

/// Heading after a wall bounce [deg].
#[inline]
pub fn reflect_off_wall(angle: f64) -> f64 {
    360.0 - angle
}

/// Heading after a paddle hit [deg].
///
/// `pos_on_pad / pad_length` maps linearly onto [-70°, 70°]. A ball moving
/// toward player 2 leaves at `180 - a`, one moving toward player 1 at `a`.
pub fn reflect_off_paddle(angle: f64, pos_on_pad: f64, pad_length: f64) -> f64 {
    let share = pos_on_pad / pad_length;
    let outgoing = -MAX_BOUNCE_ANGLE * (1.0 - share) + MAX_BOUNCE_ANGLE * share;
    if angle.to_radians().cos() > 0.0 {
        180.0 - outgoing
    } else {
        outgoing
    }
}

/// Round half up, as the motor firmware expects.
#[inline]
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Per-axis signed rates [tacho/s] for a speed and heading.
pub fn axis_velocities(vel: f64, angle: f64) -> (AxisVelocity, AxisVelocity) {
    let rad = angle.to_radians();
    (
        AxisVelocity::from_signed(round_half_up(vel * rad.cos())),
        AxisVelocity::from_signed(round_half_up(vel * rad.sin())),
    )
}

/// Draw a serve heading around `direction`, redrawing outside ±70°.
fn draw_heading(rng: &mut StdRng, direction: f64) -> f64 {
    loop {
        let z: f64 = rng.sample(StandardNormal);
        let heading = z * KICKOFF_SPREAD + direction;
        if heading <= direction + MAX_BOUNCE_ANGLE && heading >= direction - MAX_BOUNCE_ANGLE {
            return heading;
        }
        trace!("Rejected serve heading {:.1}", heading);
    }
}

// ─── Calibration ────────────────────────────────────────────────────

/// Tacho-per-cm conversion factors measured between the stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    tacho_per_cm_x: f64,
    tacho_per_cm_y: f64,
}

impl Calibration {
    /// Factors from the far-stop counter readings.
    pub fn from_limits(limit_x: i32, limit_y: i32, table: &TableConfig) -> Self {
        Self {
            tacho_per_cm_x: limit_x as f64 / table.plane_x_cm,
            tacho_per_cm_y: limit_y as f64 / table.plane_y_cm,
        }
    }

    #[inline]
    pub fn tacho_per_cm_x(&self) -> f64 {
        self.tacho_per_cm_x
    }

    #[inline]
    pub fn tacho_per_cm_y(&self) -> f64 {
        self.tacho_per_cm_y
    }
}

/// Ball whose geometry is not yet known.
pub struct UncalibratedBall {
    motors: BallMotors,
    table: TableConfig,
    rng: StdRng,
}

impl UncalibratedBall {
    /// Wrap the ball motors. `seed` makes kickoffs reproducible.
    pub fn new(motors: BallMotors, table: TableConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { motors, table, rng }
    }

    /// Find both stops and measure the table.
    ///
    /// Drives both carriages backward into their zero stops, zeroes the
    /// counters, then forward into the far stops. The two axes stall
    /// independently; each is stopped as soon as it stalls.
    pub fn calibrate(
        mut self,
        config: &CalibrationConfig,
        checkpoint: &Checkpoint,
    ) -> Result<Ball, GameError> {
        info!("Calibrating ball axes at {} tacho/s", config.speed);

        let backward = AxisVelocity::from_signed(-(config.speed as i64));
        let forward = AxisVelocity::from_signed(config.speed as i64);

        self.motors
            .both(|m| m.set_stall_threshold(config.seek_threshold));
        self.motors.both(|m| m.run(backward));
        stop_when_stalled(&mut self.motors, checkpoint)?;

        self.motors.both(|m| m.coast());
        checkpoint.pause(ms(config.settle_ms))?;
        self.motors.both(|m| m.reset_position());
        self.motors.both(|m| m.stop());
        checkpoint.pause(ms(config.hold_ms))?;
        debug!("Zero stops found, counters reset");

        self.motors.both(|m| m.run(forward));
        checkpoint.pause(ms(config.forward_run_ms))?;
        self.motors
            .both(|m| m.set_stall_threshold(config.limit_threshold));
        stop_when_stalled(&mut self.motors, checkpoint)?;

        self.motors.both(|m| m.coast());
        checkpoint.pause(ms(config.settle_ms))?;
        self.motors.both(|m| m.stop());

        let limit_x = self.motors.x.position();
        let limit_y = self.motors.y.position();
        let calibration = Calibration::from_limits(limit_x, limit_y, &self.table);

        self.motors
            .both(|m| m.set_stall_threshold(config.play_threshold));
        checkpoint.pause(ms(config.finish_ms))?;

        info!(
            "Calibration done: limits=({}, {}) tacho, factors=({:.2}, {:.2}) tacho/cm",
            limit_x,
            limit_y,
            calibration.tacho_per_cm_x(),
            calibration.tacho_per_cm_y()
        );
        Ok(self.assume(calibration))
    }

    /// Skip the measurement on a table whose factors are already known.
    pub fn assume(self, calibration: Calibration) -> Ball {
        Ball {
            motors: self.motors,
            table: self.table,
            calibration,
            vel: 0.0,
            angle: 0.0,
            rng: self.rng,
        }
    }
}

/// Poll both motors, stopping each one as it stalls, until both have.
fn stop_when_stalled(motors: &mut BallMotors, checkpoint: &Checkpoint) -> Result<(), GameError> {
    let mut moving = [true, true];
    checkpoint.wait_for(|| {
        for (idx, axis) in [Axis::X, Axis::Y].into_iter().enumerate() {
            let motor = motors.axis_mut(axis);
            if moving[idx] && motor.is_stalled() {
                motor.stop();
                moving[idx] = false;
                debug!("Axis {} stalled at {}", axis, motor.position());
            }
        }
        match moving {
            [true, _] => Some(Axis::X),
            [false, true] => Some(Axis::Y),
            [false, false] => None,
        }
    })
}

// ─── Calibrated ball ────────────────────────────────────────────────

/// Calibrated ball: speed and heading over two live position counters.
pub struct Ball {
    motors: BallMotors,
    table: TableConfig,
    calibration: Calibration,
    /// Speed [tacho/s]
    vel: f64,
    /// Heading [deg]; cos > 0 is toward player 2
    angle: f64,
    rng: StdRng,
}

impl Ball {
    /// Live X counter [tacho].
    #[inline]
    pub fn x_pos(&self) -> i32 {
        self.motors.x.position()
    }

    /// Live Y counter [tacho].
    #[inline]
    pub fn y_pos(&self) -> i32 {
        self.motors.y.position()
    }

    /// Current speed [tacho/s].
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.vel
    }

    /// Current heading [deg].
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// X counter at the player 2 edge [tacho].
    pub fn max_x(&self) -> f64 {
        self.table.plane_x_cm * self.calibration.tacho_per_cm_x
    }

    /// Y counter at the lower wall [tacho].
    pub fn max_y(&self) -> f64 {
        self.table.plane_y_cm * self.calibration.tacho_per_cm_y
    }

    /// Table centre [tacho].
    pub fn middle(&self) -> (i32, i32) {
        (
            round_half_up(self.max_x() / 2.0) as i32,
            round_half_up(self.max_y() / 2.0) as i32,
        )
    }

    /// Set the speed and start both axes moving along the heading.
    pub fn set_vel(&mut self, vel: f64) {
        self.vel = vel;
        let (vx, vy) = axis_velocities(vel, self.angle);
        trace!(
            "Ball vel={:.1} angle={:.1} -> x={} y={}",
            vel,
            self.angle,
            vx.signed(),
            vy.signed()
        );
        self.motors.x.run(vx);
        self.motors.y.run(vy);
    }

    /// Point the ball without changing the motor commands.
    pub fn set_heading(&mut self, angle: f64) {
        self.angle = angle;
    }

    /// Bounce off the upper or lower wall.
    pub fn hit_wall(&mut self) {
        self.angle = reflect_off_wall(self.angle);
        self.set_vel(self.vel);
    }

    /// Bounce off a paddle, `pos_on_pad` tacho below its upper edge.
    ///
    /// Only the heading changes; the caller's next `set_vel` applies it.
    pub fn hit_pad(&mut self, pos_on_pad: f64, pad_length: f64) {
        self.angle = reflect_off_paddle(self.angle, pos_on_pad, pad_length);
    }

    /// Pick a serve heading for the next rally.
    ///
    /// # Errors
    /// `GameError::InvalidScorer` for anything outside 0, 1, 2.
    pub fn kick_off(&mut self, scorer: u8) -> Result<(), GameError> {
        let scorer = Scorer::try_from(scorer)?;
        self.serve(scorer);
        Ok(())
    }

    /// Pick a serve heading around the side chosen by `scorer`.
    pub fn serve(&mut self, scorer: Scorer) {
        let direction = match scorer {
            Scorer::Nobody => {
                if self.rng.gen_bool(0.5) {
                    TOWARD_PLAYER1
                } else {
                    TOWARD_PLAYER2
                }
            }
            Scorer::Player1 => TOWARD_PLAYER1,
            Scorer::Player2 => TOWARD_PLAYER2,
        };
        self.angle = draw_heading(&mut self.rng, direction);
        debug!("Kickoff {:?}: heading {:.1}", scorer, self.angle);
    }

    /// Drive to the table centre and wait until both axes are there.
    pub fn go_to_middle(
        &mut self,
        config: &CalibrationConfig,
        checkpoint: &Checkpoint,
    ) -> Result<(), GameError> {
        let (mid_x, mid_y) = self.middle();
        let tol = config.centering_tolerance;

        self.motors.both(|m| m.stop());
        self.motors.x.move_to(mid_x, config.centering_speed);
        self.motors.y.move_to(mid_y, config.centering_speed);

        let motors = &self.motors;
        let mut pending = [true, true];
        checkpoint.wait_for(|| {
            for (idx, (axis, target)) in [(Axis::X, mid_x), (Axis::Y, mid_y)]
                .into_iter()
                .enumerate()
            {
                let pos = motors.axis(axis).position();
                if pos >= target - tol && pos <= target + tol {
                    pending[idx] = false;
                }
            }
            match pending {
                [true, _] => Some(Axis::X),
                [false, true] => Some(Axis::Y),
                [false, false] => None,
            }
        })?;

        debug!("Ball centred at ({}, {})", mid_x, mid_y);
        Ok(())
    }
}
