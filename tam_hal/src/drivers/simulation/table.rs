//! The simulated table: both carriages, both paddles, the exit button and
//! the clock that drives them.
//!
//! Every device handle shares one `SimTable` behind a mutex. Physics is
//! integrated lazily: each device access first brings the table up to the
//! current simulated time.

use super::config::SimulationConfig;
use super::physics::{AxisSimulator, PaddleMode, PaddleSimulator};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tam_common::hal::types::{Axis, Side};
use tracing::debug;

/// Table shared between device handles.
pub type SharedTable = Arc<Mutex<SimTable>>;

/// Time source of the simulation.
#[derive(Debug, Clone, Copy)]
pub enum SimClock {
    /// Simulated time follows the wall clock.
    Realtime { started: Instant },
    /// Simulated time advances by `step` on every motor read.
    Stepped { now: Duration, step: Duration },
}

impl SimClock {
    /// Pick the clock for a configuration.
    pub fn for_config(config: &SimulationConfig) -> Self {
        match config.step() {
            Some(step) => Self::Stepped {
                now: Duration::ZERO,
                step,
            },
            None => Self::Realtime {
                started: Instant::now(),
            },
        }
    }

    /// Current simulated time.
    pub fn now(&self) -> Duration {
        match self {
            Self::Realtime { started } => started.elapsed(),
            Self::Stepped { now, .. } => *now,
        }
    }

    /// Advance a stepped clock by one step.
    fn tick(&mut self) {
        if let Self::Stepped { now, step } = self {
            *now += *step;
        }
    }
}

/// Complete simulated table state.
#[derive(Debug)]
pub struct SimTable {
    clock: SimClock,
    synced_at: Duration,
    x: AxisSimulator,
    y: AxisSimulator,
    paddles: [PaddleSimulator; 2],
    tacho_per_cm_y: f64,
    sensor_offset_m: f64,
    exit_press_at: Option<Duration>,
    exit_pressed: bool,
}

impl SimTable {
    /// Build a table from its physical model.
    pub fn new(config: &SimulationConfig) -> Self {
        let paddle = PaddleSimulator::new(
            config.plane_y_cm,
            config.pad_width_cm,
            config.paddle_speed_cm_s,
        );
        Self {
            clock: SimClock::for_config(config),
            synced_at: Duration::ZERO,
            x: AxisSimulator::new("X", config.travel_x as f64, config.start_x as f64),
            y: AxisSimulator::new("Y", config.travel_y as f64, config.start_y as f64),
            paddles: [paddle.clone(), paddle],
            tacho_per_cm_y: config.tacho_per_cm_y(),
            sensor_offset_m: config.sensor_offset_m,
            exit_press_at: config.exit_press_at(),
            exit_pressed: false,
        }
    }

    /// Wrap into a shared handle.
    pub fn shared(self) -> SharedTable {
        Arc::new(Mutex::new(self))
    }

    /// Integrate physics up to the current simulated time. With `tick` a
    /// stepped clock first advances by one step.
    pub fn sync(&mut self, tick: bool) {
        if tick {
            self.clock.tick();
        }
        let now = self.clock.now();
        let Some(dt) = now.checked_sub(self.synced_at) else {
            return;
        };
        if dt.is_zero() {
            return;
        }

        self.x.update(dt);
        self.y.update(dt);
        let ball_y_cm = self.y.physical() / self.tacho_per_cm_y;
        for paddle in &mut self.paddles {
            paddle.update(dt, ball_y_cm);
        }
        self.synced_at = now;
    }

    /// Current simulated time.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Carriage on the given axis.
    pub fn axis(&self, axis: Axis) -> &AxisSimulator {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Mutable carriage on the given axis.
    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisSimulator {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    /// A player's paddle.
    pub fn paddle(&self, side: Side) -> &PaddleSimulator {
        &self.paddles[side.index()]
    }

    /// Change how a simulated player moves.
    pub fn set_paddle_mode(&mut self, side: Side, mode: PaddleMode) {
        debug!("Simulated {} paddle mode: {:?}", side, mode);
        self.paddles[side.index()].set_mode(mode);
    }

    /// Ultrasonic reading for a paddle [m].
    pub fn paddle_sample(&self, side: Side) -> f32 {
        self.paddles[side.index()].sample(self.sensor_offset_m)
    }

    /// Hold the exit button down from now on.
    pub fn press_exit(&mut self) {
        self.exit_pressed = true;
    }

    /// Whether the exit button is down.
    pub fn exit_pressed(&self) -> bool {
        self.exit_pressed || self.exit_press_at.is_some_and(|at| self.clock.now() >= at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tam_common::hal::types::AxisVelocity;

    fn stepped(step_us: u64) -> SimTable {
        SimTable::new(&SimulationConfig {
            step_us,
            ..Default::default()
        })
    }

    #[test]
    fn stepped_clock_only_moves_on_tick() {
        let mut table = stepped(1_000);
        table.sync(false);
        assert_eq!(table.now(), Duration::ZERO);

        table.sync(true);
        table.sync(true);
        assert_eq!(table.now(), Duration::from_millis(2));
    }

    #[test]
    fn motion_is_integrated_on_sync() {
        let mut table = stepped(10_000);
        table.axis_mut(Axis::X).run(AxisVelocity::from_signed(100));
        for _ in 0..100 {
            table.sync(true);
        }
        assert_eq!(table.axis(Axis::X).position(), 400);
    }

    #[test]
    fn exit_press_follows_simulated_time() {
        let mut table = SimTable::new(&SimulationConfig {
            step_us: 1_000,
            press_exit_after_ms: 5,
            ..Default::default()
        });
        assert!(!table.exit_pressed());
        for _ in 0..5 {
            table.sync(true);
        }
        assert!(table.exit_pressed());
    }

    #[test]
    fn manual_exit_press() {
        let mut table = stepped(1_000);
        table.press_exit();
        assert!(table.exit_pressed());
    }

    #[test]
    fn fixed_paddle_reading() {
        let mut table = stepped(1_000);
        table.set_paddle_mode(Side::Player2, PaddleMode::Fixed(0.0));
        assert!((table.paddle_sample(Side::Player2) - 0.035).abs() < 1e-6);
    }
}
