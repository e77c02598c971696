//! Device handles over the shared simulated table.

use super::table::SharedTable;
use tam_common::hal::driver::{DistanceSensor, MotorAxis, TouchSensor};
use tam_common::hal::types::{Axis, AxisVelocity, MotorState, Side, StallThreshold};
use tracing::trace;

/// One ball motor.
pub struct SimMotor {
    table: SharedTable,
    axis: Axis,
    name: String,
}

impl SimMotor {
    pub fn new(table: SharedTable, axis: Axis) -> Self {
        Self {
            table,
            axis,
            name: format!("sim-{axis}"),
        }
    }

    /// Integrate pending motion, then apply a command.
    fn command(&mut self, apply: impl FnOnce(&mut super::physics::AxisSimulator)) {
        let mut table = self.table.lock();
        table.sync(false);
        apply(table.axis_mut(self.axis));
    }
}

impl MotorAxis for SimMotor {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> i32 {
        let mut table = self.table.lock();
        table.sync(true);
        table.axis(self.axis).position()
    }

    fn run(&mut self, velocity: AxisVelocity) {
        trace!("{}: run {:?}", self.name, velocity);
        self.command(|axis| axis.run(velocity));
    }

    fn move_to(&mut self, target: i32, speed: u32) {
        trace!("{}: move to {} at {}", self.name, target, speed);
        self.command(|axis| axis.move_to(target, speed));
    }

    fn state(&self) -> MotorState {
        let mut table = self.table.lock();
        table.sync(true);
        table.axis(self.axis).state()
    }

    fn stop(&mut self) {
        self.command(|axis| axis.stop());
    }

    fn coast(&mut self) {
        self.command(|axis| axis.coast());
    }

    fn reset_position(&mut self) {
        self.command(|axis| axis.reset_position());
    }

    fn set_stall_threshold(&mut self, threshold: StallThreshold) {
        self.command(|axis| axis.set_stall_threshold(threshold));
    }
}

/// One paddle's ultrasonic sensor.
pub struct SimSonar {
    table: SharedTable,
    side: Side,
}

impl SimSonar {
    pub fn new(table: SharedTable, side: Side) -> Self {
        Self { table, side }
    }
}

impl DistanceSensor for SimSonar {
    fn sample(&mut self) -> f32 {
        let mut table = self.table.lock();
        table.sync(false);
        table.paddle_sample(self.side)
    }
}

/// The exit button.
pub struct SimTouch {
    table: SharedTable,
}

impl SimTouch {
    pub fn new(table: SharedTable) -> Self {
        Self { table }
    }
}

impl TouchSensor for SimTouch {
    fn sample(&mut self) -> f32 {
        if self.table.lock().exit_pressed() {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::simulation::config::SimulationConfig;
    use crate::drivers::simulation::table::SimTable;

    fn table() -> SharedTable {
        SimTable::new(&SimulationConfig {
            step_us: 10_000,
            ..Default::default()
        })
        .shared()
    }

    #[test]
    fn reads_advance_a_stepped_clock() {
        let table = table();
        let mut motor = SimMotor::new(table.clone(), Axis::Y);
        motor.run(AxisVelocity::from_signed(100));
        for _ in 0..10 {
            motor.position();
        }
        assert_eq!(motor.position(), 200 + 11);
        assert_eq!(motor.name(), "sim-Y");
    }

    #[test]
    fn motors_share_one_clock() {
        let table = table();
        let x = SimMotor::new(table.clone(), Axis::X);
        let y = SimMotor::new(table.clone(), Axis::Y);
        x.state();
        y.state();
        assert_eq!(table.lock().now().as_millis(), 20);
    }

    #[test]
    fn touch_reports_exit_press() {
        let table = table();
        let mut touch = SimTouch::new(table.clone());
        assert!(!touch.is_pressed());
        table.lock().press_exit();
        assert!(touch.is_pressed());
    }
}
