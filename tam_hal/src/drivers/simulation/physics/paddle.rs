//! Simulated player paddle.
//!
//! A paddle is a point along the table's Y edge. In `Track` mode the
//! simulated player chases the ball at a limited speed; in `Fixed` mode it
//! stays put, which lets tests force hits and misses.

use std::time::Duration;

/// How the simulated player moves the paddle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaddleMode {
    /// Keep the paddle centred on the ball, at most `paddle_speed_cm_s`.
    Track,
    /// Hold the paddle's upper edge at this position [cm].
    Fixed(f64),
}

/// One player's paddle.
#[derive(Debug, Clone)]
pub struct PaddleSimulator {
    /// Upper edge of the paddle [cm from the upper wall]
    top_cm: f64,
    /// Paddle width [cm]
    width_cm: f64,
    /// Lowest reachable upper edge [cm]
    max_top_cm: f64,
    /// Top speed [cm/s]
    speed_cm_s: f64,
    mode: PaddleMode,
}

impl PaddleSimulator {
    /// Paddle centred on a table `plane_y_cm` wide.
    pub fn new(plane_y_cm: f64, width_cm: f64, speed_cm_s: f64) -> Self {
        let max_top_cm = (plane_y_cm - width_cm).max(0.0);
        Self {
            top_cm: max_top_cm / 2.0,
            width_cm,
            max_top_cm,
            speed_cm_s,
            mode: PaddleMode::Track,
        }
    }

    /// Advance the paddle by `dt` given the ball's Y position [cm].
    pub fn update(&mut self, dt: Duration, ball_y_cm: f64) {
        match self.mode {
            PaddleMode::Fixed(top) => self.top_cm = top,
            PaddleMode::Track => {
                let wanted = (ball_y_cm - self.width_cm / 2.0).clamp(0.0, self.max_top_cm);
                let reach = self.speed_cm_s * dt.as_secs_f64();
                let delta = (wanted - self.top_cm).clamp(-reach, reach);
                self.top_cm += delta;
            }
        }
    }

    /// Switch the player's behaviour.
    pub fn set_mode(&mut self, mode: PaddleMode) {
        if let PaddleMode::Fixed(top) = mode {
            self.top_cm = top;
        }
        self.mode = mode;
    }

    /// Upper edge of the paddle [cm].
    pub fn top_cm(&self) -> f64 {
        self.top_cm
    }

    /// Ultrasonic reading for this paddle [m].
    pub fn sample(&self, sensor_offset_m: f64) -> f32 {
        (self.top_cm / 100.0 + sensor_offset_m) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_centred() {
        let paddle = PaddleSimulator::new(28.0, 4.0, 4.0);
        assert_eq!(paddle.top_cm(), 12.0);
    }

    #[test]
    fn tracking_is_speed_limited() {
        let mut paddle = PaddleSimulator::new(28.0, 4.0, 4.0);
        paddle.update(Duration::from_millis(500), 0.0);
        assert!((paddle.top_cm() - 10.0).abs() < 1e-9);

        paddle.update(Duration::from_secs(10), 0.0);
        assert_eq!(paddle.top_cm(), 0.0);
    }

    #[test]
    fn fixed_paddle_ignores_ball() {
        let mut paddle = PaddleSimulator::new(28.0, 4.0, 4.0);
        paddle.set_mode(PaddleMode::Fixed(20.0));
        paddle.update(Duration::from_secs(5), 0.0);
        assert_eq!(paddle.top_cm(), 20.0);
        assert!((paddle.sample(0.035) - 0.235).abs() < 1e-6);
    }
}
