//! Drives the simulated table through the public HAL surface only.

use tam_common::prelude::*;
use tam_hal::builtin_registry;
use tam_hal::drivers::simulation::{PaddleMode, SimulationDriver};

const STEPPED: &str = r#"
driver = "simulation"

[driver_config.simulation]
step_us = 1000
start_x = 300
start_y = 200
"#;

fn stepped_driver() -> SimulationDriver {
    let config: HardwareConfig = toml::from_str(STEPPED).unwrap();
    let mut driver = SimulationDriver::new();
    driver.init(&config).unwrap();
    driver
}

#[test]
fn registry_builds_a_working_simulation() {
    let registry = builtin_registry();
    let mut driver = registry.create_driver("simulation").unwrap();
    driver.init(&HardwareConfig::default()).unwrap();

    let motors = driver.open_motors().unwrap();
    assert_eq!(motors.x.position(), 300);
    assert_eq!(motors.y.position(), 200);
    driver.shutdown().unwrap();
}

#[test]
fn unknown_driver_is_reported() {
    let registry = builtin_registry();
    assert!(registry.create_driver("ev3").is_err());
}

#[test]
fn backward_run_stalls_against_the_stop() {
    let mut driver = stepped_driver();
    let mut motors = driver.open_motors().unwrap();

    motors.x.set_stall_threshold(StallThreshold::new(5, 1));
    motors.x.run(AxisVelocity::from_signed(-50));

    let mut reads = 0;
    while !motors.x.is_stalled() {
        reads += 1;
        assert!(reads < 20_000, "carriage never stalled");
    }

    motors.x.coast();
    motors.x.reset_position();
    assert_eq!(motors.x.position(), 0);
    assert!(!motors.x.state().contains(MotorState::STALLED));
}

#[test]
fn rail_length_is_measured_between_stops() {
    let mut driver = stepped_driver();
    let mut motors = driver.open_motors().unwrap();
    let travel = driver.config().travel_y as i32;

    motors.y.set_stall_threshold(StallThreshold::new(5, 1));
    motors.y.run(AxisVelocity::from_signed(-50));
    while !motors.y.is_stalled() {}
    motors.y.stop();
    motors.y.reset_position();

    motors.y.run(AxisVelocity::from_signed(50));
    while !motors.y.is_stalled() {}
    motors.y.stop();

    assert_eq!(motors.y.position(), travel);
}

#[test]
fn paddle_sensors_follow_scripted_players() {
    let mut driver = stepped_driver();
    let table = driver.table().unwrap();
    let mut sensors = driver.open_paddle_sensors().unwrap();

    table.lock().set_paddle_mode(Side::Player1, PaddleMode::Fixed(10.0));
    table.lock().set_paddle_mode(Side::Player2, PaddleMode::Fixed(0.0));

    assert!((sensors.player1.sample() - 0.135).abs() < 1e-5);
    assert!((sensors.player2.sample() - 0.035).abs() < 1e-5);
}

#[test]
fn exit_button_is_scriptable() {
    let mut driver = stepped_driver();
    let table = driver.table().unwrap();
    let mut touch = driver.open_touch_sensor().unwrap();

    assert!(!touch.is_pressed());
    table.lock().press_exit();
    assert!(touch.is_pressed());
}
