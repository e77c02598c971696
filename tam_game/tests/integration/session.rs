//! Full sessions: bring-up, calibration and the match, through `run_session`.

use super::{fix_paddles, sim_config, sim_driver};
use std::thread;
use std::time::{Duration, Instant};
use tam_common::hal::driver::HalDriver;
use tam_game::config::CalibrationConfig;
use tam_game::operator::ScriptedOperator;
use tam_game::presentation::audio::TracingSpeaker;
use tam_game::presentation::display::{DisplayTiming, TracingCanvas};
use tam_game::presentation::exit::{ExitPolicy, ExitSignal};
use tam_game::startup::{Frontend, SessionOptions, run_session};

fn frontend(canvas: TracingCanvas, rematches: u32) -> Frontend {
    Frontend {
        canvas: Box::new(canvas),
        speaker: Box::new(TracingSpeaker::unpaced()),
        operator: Box::new(ScriptedOperator::new(rematches)),
        display_timing: DisplayTiming::default(),
    }
}

fn cooperative(seed: u64) -> SessionOptions {
    SessionOptions {
        exit_policy: ExitPolicy::Cooperative,
        seed: Some(seed),
    }
}

#[test]
fn session_retries_sensors_then_plays() {
    let mut config = sim_config("sensor_mode_failures = 2");
    config.timing.sensor_retry_ms = 30;
    let mut driver = sim_driver(&config);
    fix_paddles(&driver, 0.0);

    let canvas = TracingCanvas::unpaced();
    let texts = canvas.transcript();
    let summary = run_session(
        &mut driver,
        &config,
        frontend(canvas, 0),
        ExitSignal::new(),
        cooperative(3),
    )
    .unwrap();

    assert_eq!(summary.games.len(), 1);
    assert!(
        texts.lock().iter().any(|t| t == "Invalid sensor mode"),
        "sensor fault was never shown"
    );
    driver.shutdown().unwrap();
}

#[test]
fn exit_button_ends_the_session() {
    let config = sim_config("press_exit_after_ms = 20000");
    let mut driver = sim_driver(&config);

    let signal = ExitSignal::new();
    let result = run_session(
        &mut driver,
        &config,
        frontend(TracingCanvas::unpaced(), u32::MAX),
        signal.clone(),
        cooperative(5),
    );

    assert!(result.unwrap_err().is_exit());
    assert!(signal.is_raised());
}

#[test]
fn raised_signal_aborts_bring_up() {
    let config = sim_config("");
    let mut driver = sim_driver(&config);

    let signal = ExitSignal::new();
    signal.raise();
    let result = run_session(
        &mut driver,
        &config,
        frontend(TracingCanvas::unpaced(), 0),
        signal,
        cooperative(1),
    );
    assert!(result.unwrap_err().is_exit());
}

#[test]
fn signal_during_calibration_stops_the_screen() {
    let mut config = sim_config("");
    config.calibration = CalibrationConfig::default();
    let mut driver = sim_driver(&config);

    let canvas = TracingCanvas::new();
    let texts = canvas.transcript();
    let mut front = frontend(canvas, 0);
    front.display_timing = DisplayTiming {
        square: Duration::from_millis(1),
        title: Duration::from_millis(150),
        frame: Duration::from_millis(5),
    };

    let signal = ExitSignal::new();
    let raiser = {
        let signal = signal.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            signal.raise();
        })
    };

    let started = Instant::now();
    let result = run_session(&mut driver, &config, front, signal, cooperative(2));
    raiser.join().unwrap();

    assert!(result.unwrap_err().is_exit());
    assert!(started.elapsed() < Duration::from_millis(2500));

    let drawn = texts.lock().len();
    thread::sleep(Duration::from_millis(1500));
    assert_eq!(texts.lock().len(), drawn, "display kept drawing after return");
    driver.shutdown().unwrap();
}
