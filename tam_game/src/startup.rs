//! Session bring-up: devices, workers, calibration, then the match.
//!
//! Order matters on the real table. The exit button is watched before
//! anything else so that a stuck calibration can still be aborted, and the
//! display is up before the sensors so a sensor fault can be shown.

use crate::ball::{Ball, UncalibratedBall};
use crate::checkpoint::Checkpoint;
use crate::config::{GameConfig, ms};
use crate::error::GameError;
use crate::game::runner::{MatchRunner, MatchSummary, Table};
use crate::operator::Operator;
use crate::paddle::Paddle;
use crate::player::Player;
use crate::presentation::audio::{Audio, Speaker};
use crate::presentation::display::{Canvas, Display, DisplayTiming};
use crate::presentation::exit::{ExitPolicy, ExitSignal, ExitWatcher};
use tam_common::hal::driver::{BallMotors, HalDriver, HalError, PaddleSensors};
use tam_common::hal::types::Side;
use tracing::{info, warn};

/// What the players see, hear and press.
pub struct Frontend {
    pub canvas: Box<dyn Canvas>,
    pub speaker: Box<dyn Speaker>,
    pub operator: Box<dyn Operator>,
    pub display_timing: DisplayTiming,
}

/// Per-run switches that are not part of the table config.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub exit_policy: ExitPolicy,
    /// Fixed kickoff seed for reproducible runs.
    pub seed: Option<u64>,
}

/// Bring up an initialized driver and play until the operator stops.
///
/// The driver is neither initialized nor shut down here. The display and
/// audio workers are joined and the exit watcher stopped before this
/// returns, whichever way the session ends.
///
/// # Errors
/// `GameError::ExitRequested` when the exit button or a signal ends the
/// session; any device or worker failure otherwise.
pub fn run_session(
    driver: &mut dyn HalDriver,
    config: &GameConfig,
    frontend: Frontend,
    signal: ExitSignal,
    options: SessionOptions,
) -> Result<MatchSummary, GameError> {
    info!(
        "Starting {} on driver '{}' v{}",
        config.shared.service_name,
        driver.name(),
        driver.version()
    );

    let touch = driver.open_touch_sensor()?;
    let watcher = ExitWatcher::spawn(
        touch,
        signal.clone(),
        options.exit_policy,
        ms(config.timing.exit_poll_ms),
    )?;
    let checkpoint = Checkpoint::new(signal, &config.calibration, &config.timing);

    let Frontend {
        canvas,
        speaker,
        mut operator,
        display_timing,
    } = frontend;

    let outcome = match Display::spawn(canvas, display_timing) {
        Ok(display) => {
            let stage = Stage {
                config,
                checkpoint: &checkpoint,
                display: &display,
            };
            let outcome = stage.open_and_play(driver, speaker, operator.as_mut(), options.seed);
            display.shutdown();
            outcome
        }
        Err(e) => Err(e.into()),
    };
    watcher.stop();

    match &outcome {
        Ok(summary) => info!("Session over after {} game(s)", summary.games.len()),
        Err(e) if e.is_exit() => info!("Session ended by exit request"),
        Err(e) => warn!("Session failed: {}", e),
    }
    outcome
}

/// What bring-up and the match share once the display is up.
struct Stage<'a> {
    config: &'a GameConfig,
    checkpoint: &'a Checkpoint,
    display: &'a Display,
}

impl Stage<'_> {
    /// Open the table's devices, start the audio worker and play.
    ///
    /// The audio worker is joined before returning on every path.
    fn open_and_play(
        &self,
        driver: &mut dyn HalDriver,
        speaker: Box<dyn Speaker>,
        operator: &mut dyn Operator,
        seed: Option<u64>,
    ) -> Result<MatchSummary, GameError> {
        let sensors = open_paddle_sensors(driver, self.display, self.checkpoint, self.config)?;
        let motors = driver.open_motors()?;
        let audio = Audio::spawn(speaker)?;

        let outcome = self.calibrate_and_play(motors, sensors, &audio, operator, seed);
        audio.shutdown();
        outcome
    }

    fn calibrate_and_play(
        &self,
        motors: BallMotors,
        sensors: PaddleSensors,
        audio: &Audio,
        operator: &mut dyn Operator,
        seed: Option<u64>,
    ) -> Result<MatchSummary, GameError> {
        let config = self.config;

        self.display.startup_animation();
        let ball = UncalibratedBall::new(motors, config.table, seed)
            .calibrate(&config.calibration, self.checkpoint)?;
        self.display.stop_animation();

        let table = seat_players(ball, sensors, config);
        self.checkpoint.pause(ms(config.timing.ready_ms))?;

        MatchRunner::new(table, config, self.display, audio, self.checkpoint).run(operator)
    }
}

/// Retry until both ultrasonic sensors accept distance mode.
fn open_paddle_sensors(
    driver: &mut dyn HalDriver,
    display: &Display,
    checkpoint: &Checkpoint,
    config: &GameConfig,
) -> Result<PaddleSensors, GameError> {
    loop {
        match driver.open_paddle_sensors() {
            Ok(sensors) => return Ok(sensors),
            Err(HalError::InvalidSensorMode(port)) => {
                warn!("Paddle sensor {} not ready, retrying", port);
                display.print("Invalid sensor mode");
                checkpoint.pause(ms(config.timing.sensor_retry_ms))?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Paddles share the calibrated Y factor.
fn seat_players(ball: Ball, sensors: PaddleSensors, config: &GameConfig) -> Table {
    let tacho_per_cm = ball.calibration().tacho_per_cm_y();
    let offset = config.table.sensor_offset_m;
    let width = config.rules.pad_width_cm;

    let PaddleSensors { player1, player2 } = sensors;
    let players = [
        Player::new(
            Side::Player1,
            Paddle::new(player1, width, tacho_per_cm, offset),
        ),
        Player::new(
            Side::Player2,
            Paddle::new(player2, width, tacho_per_cm, offset),
        ),
    ];
    info!(
        "Paddles ready: width {:.1} tacho",
        players[0].paddle_width()
    );
    Table { ball, players }
}
