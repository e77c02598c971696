//! Game rules and table geometry constants.
//!
//! Single source of truth for the numbers that define a TAM-PONG table.
//! Configuration defaults are taken from here, so a table with an empty
//! config file plays exactly by these rules.

use static_assertions::const_assert;

/// Points needed to win a game.
pub const MAX_SCORE: u32 = 5;

/// Paddle width [cm].
pub const PAD_WIDTH: f32 = 4.68;

/// Table length along the X axis (player 1 to player 2) [cm].
pub const PLANE_X: f32 = 32.76;

/// Table length along the Y axis (upper wall to lower wall) [cm].
pub const PLANE_Y: f32 = 28.08;

/// Base ball speed [tacho/s].
pub const BALL_SPEED: i32 = 150;

/// Speed added on every paddle hit [tacho/s].
pub const INCREMENT: i32 = 15;

/// Paddle zone tolerance [tacho].
pub const PAD_TOL: i32 = 10;

/// Wall zone tolerance [tacho].
pub const WALL_TOL: i32 = 10;

/// Ultrasonic sensor mounting offset [m].
pub const SENSOR_OFFSET_M: f32 = 0.035;

/// Maximum outgoing angle after a paddle hit or kickoff [deg].
pub const MAX_BOUNCE_ANGLE: f64 = 70.0;

/// Standard deviation of the kickoff heading [deg].
pub const KICKOFF_SPREAD: f64 = 30.0;

/// Speed used when driving the ball to a fixed position [tacho/s].
pub const CENTERING_SPEED: u32 = 150;

/// Arrival window around a centering target [tacho].
pub const CENTERING_TOLERANCE: i32 = 2;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/tam_pong.toml";

/// Title shown on the screen.
pub const TITLE: &str = "TAM-PONG";

const_assert!(MAX_SCORE > 0);
const_assert!(BALL_SPEED > 0);
const_assert!(PAD_TOL >= 0 && WALL_TOL >= 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_match_table_geometry() {
        assert_eq!(MAX_SCORE, 5);
        assert_eq!(BALL_SPEED, 150);
        assert_eq!(INCREMENT, 15);
        assert!((PLANE_X - 32.76).abs() < f32::EPSILON);
        assert!((PLANE_Y - 28.08).abs() < f32::EPSILON);
        assert!((PAD_WIDTH - 4.68).abs() < f32::EPSILON);
    }

    #[test]
    fn paddle_fits_on_table() {
        assert!(PAD_WIDTH < PLANE_Y);
    }
}
