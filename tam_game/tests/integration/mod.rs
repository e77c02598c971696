//! Shared rig for the integration tests.

mod full_match;
mod rally;
mod session;

use parking_lot::Mutex;
use std::sync::Arc;
use tam_common::config::ConfigLoader;
use tam_common::hal::driver::{HalDriver, PaddleSensors};
use tam_common::hal::types::{Axis, Side};
use tam_game::GameConfig;
use tam_game::ball::UncalibratedBall;
use tam_game::checkpoint::Checkpoint;
use tam_game::config::TimingConfig;
use tam_game::game::runner::Table;
use tam_game::paddle::Paddle;
use tam_game::player::Player;
use tam_game::presentation::audio::{Audio, Tone, TracingSpeaker};
use tam_game::presentation::display::{Display, DisplayTiming, TracingCanvas};
use tam_game::presentation::exit::ExitSignal;
use tam_hal::drivers::simulation::{PaddleMode, SimulationDriver};

/// Config for a stepped simulated table, `extra` appended to its driver
/// section. All delays are zero.
pub fn sim_config(extra: &str) -> GameConfig {
    let mut config = GameConfig::from_toml_str(&format!(
        r#"
[rules]
max_score = 2

[hardware]
driver = "simulation"

[hardware.driver_config.simulation]
step_us = 1000
{extra}
"#
    ))
    .unwrap();
    config.timing = TimingConfig::immediate();
    let cal = &mut config.calibration;
    cal.settle_ms = 0;
    cal.hold_ms = 0;
    cal.forward_run_ms = 0;
    cal.finish_ms = 0;
    cal.poll_interval_ms = 0;
    config
}

pub fn sim_driver(config: &GameConfig) -> SimulationDriver {
    let mut driver = SimulationDriver::new();
    driver.init(&config.hardware).unwrap();
    driver
}

/// Pin both paddles with their upper edge at `top_cm`.
pub fn fix_paddles(driver: &SimulationDriver, top_cm: f64) {
    let table = driver.table().unwrap();
    let mut table = table.lock();
    table.set_paddle_mode(Side::Player1, PaddleMode::Fixed(top_cm));
    table.set_paddle_mode(Side::Player2, PaddleMode::Fixed(top_cm));
}

/// Teleport the ball carriage [tacho from the zero stops].
pub fn place_ball(driver: &SimulationDriver, x: f64, y: f64) {
    let table = driver.table().unwrap();
    let mut table = table.lock();
    table.axis_mut(Axis::X).set_physical(x);
    table.axis_mut(Axis::Y).set_physical(y);
}

pub fn checkpoint(config: &GameConfig) -> Checkpoint {
    Checkpoint::new(ExitSignal::new(), &config.calibration, &config.timing)
}

/// Unpaced display and audio workers with their transcripts.
pub struct Workers {
    pub display: Display,
    pub audio: Audio,
    pub texts: Arc<Mutex<Vec<String>>>,
    pub tones: Arc<Mutex<Vec<Tone>>>,
}

impl Workers {
    /// Stop both workers once their last request is played and return
    /// what they drew and sounded.
    pub fn finish(self) -> (Vec<String>, Vec<Tone>) {
        self.audio.shutdown();
        self.display.shutdown();
        let texts = self.texts.lock().clone();
        let tones = self.tones.lock().clone();
        (texts, tones)
    }
}

pub fn workers() -> Workers {
    let canvas = TracingCanvas::unpaced();
    let speaker = TracingSpeaker::unpaced();
    let texts = canvas.transcript();
    let tones = speaker.transcript();
    Workers {
        display: Display::spawn(Box::new(canvas), DisplayTiming::default()).unwrap(),
        audio: Audio::spawn(Box::new(speaker)).unwrap(),
        texts,
        tones,
    }
}

/// Calibrate the simulated ball and seat both players.
pub fn seat(driver: &mut SimulationDriver, config: &GameConfig, checkpoint: &Checkpoint) -> Table {
    let motors = driver.open_motors().unwrap();
    let PaddleSensors { player1, player2 } = driver.open_paddle_sensors().unwrap();
    let ball = UncalibratedBall::new(motors, config.table, Some(11))
        .calibrate(&config.calibration, checkpoint)
        .unwrap();

    let tpc = ball.calibration().tacho_per_cm_y();
    let width = config.rules.pad_width_cm;
    let offset = config.table.sensor_offset_m;
    Table {
        ball,
        players: [
            Player::new(Side::Player1, Paddle::new(player1, width, tpc, offset)),
            Player::new(Side::Player2, Paddle::new(player2, width, tpc, offset)),
        ],
    }
}
