//! Game configuration (`config/tam_pong.toml`).
//!
//! One file, six sections. Every field has a default, so an empty file
//! plays by the table constants.
//!
//! ```toml
//! [rules]
//! max_score = 5
//!
//! [calibration]
//! wait_timeout_ms = 0   # wait forever
//!
//! [hardware]
//! driver = "simulation"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tam_common::config::{ConfigError, SharedConfig};
use tam_common::consts::{
    BALL_SPEED, CENTERING_SPEED, CENTERING_TOLERANCE, INCREMENT, MAX_SCORE, PAD_TOL, PAD_WIDTH,
    PLANE_X, PLANE_Y, SENSOR_OFFSET_M, WALL_TOL,
};
use tam_common::hal::config::HardwareConfig;
use tam_common::hal::types::StallThreshold;

// ─── Defaults ───────────────────────────────────────────────────────

fn default_max_score() -> u32 {
    MAX_SCORE
}
fn default_ball_speed() -> i32 {
    BALL_SPEED
}
fn default_increment() -> i32 {
    INCREMENT
}
fn default_pad_tol() -> i32 {
    PAD_TOL
}
fn default_wall_tol() -> i32 {
    WALL_TOL
}
fn default_pad_width() -> f64 {
    PAD_WIDTH as f64
}
fn default_plane_x() -> f64 {
    PLANE_X as f64
}
fn default_plane_y() -> f64 {
    PLANE_Y as f64
}
fn default_sensor_offset() -> f64 {
    SENSOR_OFFSET_M as f64
}
fn default_seek_speed() -> u32 {
    50
}
fn default_seek_threshold() -> StallThreshold {
    StallThreshold::new(5, 1)
}
fn default_limit_threshold() -> StallThreshold {
    StallThreshold::new(2, 1)
}
fn default_play_threshold() -> StallThreshold {
    StallThreshold::new(50, 50)
}
fn default_settle_ms() -> u64 {
    500
}
fn default_hold_ms() -> u64 {
    1000
}
fn default_forward_run_ms() -> u64 {
    3000
}
fn default_finish_ms() -> u64 {
    100
}
fn default_centering_speed() -> u32 {
    CENTERING_SPEED
}
fn default_centering_tolerance() -> i32 {
    CENTERING_TOLERANCE
}
fn default_poll_interval_ms() -> u64 {
    1
}
fn default_start_delay_ms() -> u64 {
    500
}
fn default_countdown_ms() -> u64 {
    2750
}
fn default_miss_pause_ms() -> u64 {
    200
}
fn default_recenter_pause_ms() -> u64 {
    500
}
fn default_victory_ms() -> u64 {
    4000
}
fn default_exit_poll_ms() -> u64 {
    5
}
fn default_sensor_retry_ms() -> u64 {
    500
}
fn default_ready_ms() -> u64 {
    500
}

// ─── Sections ───────────────────────────────────────────────────────

/// Scoring and collision rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Points needed to win a game.
    #[serde(default = "default_max_score")]
    pub max_score: u32,
    /// Base ball speed [tacho/s].
    #[serde(default = "default_ball_speed")]
    pub ball_speed: i32,
    /// Speed added per paddle hit [tacho/s].
    #[serde(default = "default_increment")]
    pub increment: i32,
    /// Paddle zone tolerance [tacho].
    #[serde(default = "default_pad_tol")]
    pub pad_tol: i32,
    /// Wall zone tolerance [tacho].
    #[serde(default = "default_wall_tol")]
    pub wall_tol: i32,
    /// Paddle width [cm].
    #[serde(default = "default_pad_width")]
    pub pad_width_cm: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_score: default_max_score(),
            ball_speed: default_ball_speed(),
            increment: default_increment(),
            pad_tol: default_pad_tol(),
            wall_tol: default_wall_tol(),
            pad_width_cm: default_pad_width(),
        }
    }
}

/// Physical table geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table length from player 1 to player 2 [cm].
    #[serde(default = "default_plane_x")]
    pub plane_x_cm: f64,
    /// Table length from upper to lower wall [cm].
    #[serde(default = "default_plane_y")]
    pub plane_y_cm: f64,
    /// Sonar reading with the paddle against the upper wall [m].
    #[serde(default = "default_sensor_offset")]
    pub sensor_offset_m: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            plane_x_cm: default_plane_x(),
            plane_y_cm: default_plane_y(),
            sensor_offset_m: default_sensor_offset(),
        }
    }
}

/// Calibration and centering parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Speed while seeking the stops [tacho/s].
    #[serde(default = "default_seek_speed")]
    pub speed: u32,
    /// Stall threshold while seeking the zero stop.
    #[serde(default = "default_seek_threshold")]
    pub seek_threshold: StallThreshold,
    /// Stall threshold while seeking the far stop.
    #[serde(default = "default_limit_threshold")]
    pub limit_threshold: StallThreshold,
    /// Stall threshold during play.
    #[serde(default = "default_play_threshold")]
    pub play_threshold: StallThreshold,
    /// Coast time after each stall [ms].
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Hold time at the zero stop [ms].
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
    /// Forward run before the far-stop stall check is armed [ms].
    #[serde(default = "default_forward_run_ms")]
    pub forward_run_ms: u64,
    /// Final pause after calibration [ms].
    #[serde(default = "default_finish_ms")]
    pub finish_ms: u64,
    /// Centering speed [tacho/s].
    #[serde(default = "default_centering_speed")]
    pub centering_speed: u32,
    /// Centering arrival window [tacho].
    #[serde(default = "default_centering_tolerance")]
    pub centering_tolerance: i32,
    /// Pause between polls of a blocking wait [ms]; 0 spins.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Bound on a blocking wait [ms]; 0 waits forever.
    #[serde(default)]
    pub wait_timeout_ms: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            speed: default_seek_speed(),
            seek_threshold: default_seek_threshold(),
            limit_threshold: default_limit_threshold(),
            play_threshold: default_play_threshold(),
            settle_ms: default_settle_ms(),
            hold_ms: default_hold_ms(),
            forward_run_ms: default_forward_run_ms(),
            finish_ms: default_finish_ms(),
            centering_speed: default_centering_speed(),
            centering_tolerance: default_centering_tolerance(),
            poll_interval_ms: default_poll_interval_ms(),
            wait_timeout_ms: 0,
        }
    }
}

impl CalibrationConfig {
    /// Pause between polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Wait bound, if any.
    pub fn wait_timeout(&self) -> Option<Duration> {
        (self.wait_timeout_ms > 0).then(|| Duration::from_millis(self.wait_timeout_ms))
    }
}

/// Fixed delays of the match sequence [ms].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// After the start press, before the countdown.
    #[serde(default = "default_start_delay_ms")]
    pub start_delay_ms: u64,
    /// Countdown jingle length.
    #[serde(default = "default_countdown_ms")]
    pub countdown_ms: u64,
    /// After a miss, before recentering.
    #[serde(default = "default_miss_pause_ms")]
    pub miss_pause_ms: u64,
    /// After recentering, before the next serve.
    #[serde(default = "default_recenter_pause_ms")]
    pub recenter_pause_ms: u64,
    /// Winner announcement.
    #[serde(default = "default_victory_ms")]
    pub victory_ms: u64,
    /// Exit watcher poll period, also the slice of every pause.
    #[serde(default = "default_exit_poll_ms")]
    pub exit_poll_ms: u64,
    /// Between attempts to put the paddle sensors into distance mode.
    #[serde(default = "default_sensor_retry_ms")]
    pub sensor_retry_ms: u64,
    /// After calibration, before the first match.
    #[serde(default = "default_ready_ms")]
    pub ready_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: default_start_delay_ms(),
            countdown_ms: default_countdown_ms(),
            miss_pause_ms: default_miss_pause_ms(),
            recenter_pause_ms: default_recenter_pause_ms(),
            victory_ms: default_victory_ms(),
            exit_poll_ms: default_exit_poll_ms(),
            sensor_retry_ms: default_sensor_retry_ms(),
            ready_ms: default_ready_ms(),
        }
    }
}

impl TimingConfig {
    /// Every delay zero except the exit poll (1 ms). For simulated tables.
    pub fn immediate() -> Self {
        Self {
            start_delay_ms: 0,
            countdown_ms: 0,
            miss_pause_ms: 0,
            recenter_pause_ms: 0,
            victory_ms: 0,
            exit_poll_ms: 1,
            sensor_retry_ms: 0,
            ready_ms: 0,
        }
    }
}

/// Convert a millisecond field.
#[inline]
pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

// ─── Root ───────────────────────────────────────────────────────────

/// Complete `tam_pong` configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub hardware: HardwareConfig,
}

impl GameConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.hardware
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        let rules = &self.rules;
        if rules.max_score == 0 {
            return Err(ConfigError::ValidationError(
                "rules.max_score must be greater than 0".to_string(),
            ));
        }
        if rules.ball_speed <= 0 {
            return Err(ConfigError::ValidationError(
                "rules.ball_speed must be greater than 0".to_string(),
            ));
        }
        if rules.increment < 0 || rules.pad_tol < 0 || rules.wall_tol < 0 {
            return Err(ConfigError::ValidationError(
                "rules.increment, pad_tol and wall_tol cannot be negative".to_string(),
            ));
        }
        if self.table.plane_x_cm <= 0.0 || self.table.plane_y_cm <= 0.0 {
            return Err(ConfigError::ValidationError(
                "table plane lengths must be positive".to_string(),
            ));
        }
        if rules.pad_width_cm <= 0.0 || rules.pad_width_cm >= self.table.plane_y_cm {
            return Err(ConfigError::ValidationError(format!(
                "rules.pad_width_cm {} must be in (0, {})",
                rules.pad_width_cm, self.table.plane_y_cm
            )));
        }
        if self.calibration.speed == 0 || self.calibration.centering_speed == 0 {
            return Err(ConfigError::ValidationError(
                "calibration speeds must be greater than 0".to_string(),
            ));
        }
        if self.calibration.centering_tolerance < 0 {
            return Err(ConfigError::ValidationError(
                "calibration.centering_tolerance cannot be negative".to_string(),
            ));
        }
        if self.timing.exit_poll_ms == 0 {
            return Err(ConfigError::ValidationError(
                "timing.exit_poll_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
