//! Paddle controller.
//!
//! A paddle is read through an ultrasonic sensor mounted at the upper wall.
//! Readings are live and unfiltered; both paddles use the Y-axis factor.

use tam_common::hal::driver::DistanceSensor;
use tracing::trace;

/// One player's paddle in table coordinates [tacho].
pub struct Paddle {
    sensor: Box<dyn DistanceSensor>,
    /// Width [tacho]
    width: f64,
    tacho_per_cm: f64,
    sensor_offset_m: f64,
}

impl Paddle {
    /// `width_cm` is converted once with the calibrated Y factor.
    pub fn new(
        sensor: Box<dyn DistanceSensor>,
        width_cm: f64,
        tacho_per_cm: f64,
        sensor_offset_m: f64,
    ) -> Self {
        Self {
            sensor,
            width: width_cm * tacho_per_cm,
            tacho_per_cm,
            sensor_offset_m,
        }
    }

    /// Position of the paddle's upper edge [tacho], from a fresh sample.
    pub fn pos(&mut self) -> f64 {
        let sample = self.sensor.sample() as f64;
        let pos = (sample - self.sensor_offset_m) * self.tacho_per_cm * 100.0;
        trace!("Paddle sample {:.3} m -> {:.1} tacho", sample, pos);
        pos
    }

    /// Width [tacho].
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }
}
