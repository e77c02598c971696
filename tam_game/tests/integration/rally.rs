//! Single polls of the rally loop on a positioned ball.

use super::{checkpoint, fix_paddles, place_ball, seat, sim_config, sim_driver, workers};
use tam_common::consts::TITLE;
use tam_common::hal::types::Side;
use tam_game::GameConfig;
use tam_game::game::machine::MatchState;
use tam_game::game::rally::{Touch, rally_speed};
use tam_game::game::runner::MatchRunner;
use tam_game::operator::ScriptedOperator;
use tam_game::presentation::audio::{HIT_TONE, SERVE_TONE, Tone, WALL_TONE};

/// Silent miss jingle followed by the serve beep.
const MISS_THEN_SERVE: [Tone; 4] = [
    Tone::new(0, 50),
    Tone::new(0, 50),
    Tone::new(0, 500),
    SERVE_TONE,
];

/// Paddles exactly 40 tacho wide with their upper edge at Y = 0.
fn forty_tacho_paddles() -> GameConfig {
    let mut config = sim_config("");
    let tacho_per_cm_y = 856.0 / config.table.plane_y_cm;
    config.rules.pad_width_cm = 40.0 / tacho_per_cm_y;
    config
}

#[test]
fn paddle_hit_returns_the_ball_faster() {
    let config = forty_tacho_paddles();
    let mut driver = sim_driver(&config);
    fix_paddles(&driver, 0.0);
    let cp = checkpoint(&config);
    let w = workers();
    let table = seat(&mut driver, &config, &cp);

    let mut runner = MatchRunner::new(table, &config, &w.display, &w.audio, &cp);
    runner.open_game(&mut ScriptedOperator::new(0)).unwrap();
    runner.start_rally(0);
    assert_eq!(runner.state(), MatchState::RallyInPlay);

    place_ball(&driver, 5.0, 20.0);
    let ball = &mut runner.table_mut().ball;
    ball.set_heading(180.0);
    ball.set_vel(150.0);

    assert_eq!(runner.poll().unwrap(), None);

    let markers = runner.markers();
    assert_eq!(markers.last_touched(), Touch::Paddle(Side::Player1));
    assert_eq!(markers.last_pad(), Some(Side::Player1));
    let ball = &runner.table().ball;
    assert!((ball.velocity() - 165.0).abs() < 1e-9);
    assert!(ball.angle().abs() < 1e-3, "centre hit leaves straight, got {}", ball.angle());
    assert_eq!(runner.table().scores(), [0, 0]);

    // The same edge stays disarmed until the ball touches something else.
    assert_eq!(runner.poll().unwrap(), None);
    assert!((runner.table().ball.velocity() - 165.0).abs() < 1e-9);

    let (_, tones) = w.finish();
    assert_eq!(tones.iter().filter(|&&t| t == HIT_TONE).count(), 1);
    assert_eq!(tones.last(), Some(&HIT_TONE));
}

#[test]
fn miss_scores_for_the_opponent_and_recentres() {
    let mut config = forty_tacho_paddles();
    config.timing.miss_pause_ms = 200;
    let mut driver = sim_driver(&config);
    fix_paddles(&driver, 0.0);
    let cp = checkpoint(&config);
    let w = workers();
    let table = seat(&mut driver, &config, &cp);

    let mut runner = MatchRunner::new(table, &config, &w.display, &w.audio, &cp);
    runner.open_game(&mut ScriptedOperator::new(0)).unwrap();
    runner.start_rally(0);

    place_ball(&driver, 5.0, 200.0);
    let ball = &mut runner.table_mut().ball;
    ball.set_heading(180.0);
    ball.set_vel(150.0);

    assert_eq!(runner.poll().unwrap(), Some(Side::Player2));
    assert_eq!(runner.table().scores(), [0, 1]);
    assert_eq!(runner.state(), MatchState::PointScored);

    let ball = &runner.table().ball;
    let (mid_x, mid_y) = ball.middle();
    let tol = config.calibration.centering_tolerance + 1;
    assert!((ball.x_pos() - mid_x).abs() <= tol);
    assert!((ball.y_pos() - mid_y).abs() <= tol);
    assert!(
        ball.angle().to_radians().cos() > 0.0,
        "serve after a player 1 miss heads toward player 2, got {}",
        ball.angle()
    );

    runner.start_rally(1);
    assert_eq!(runner.state(), MatchState::RallyInPlay);
    assert_eq!(runner.markers().last_touched(), Touch::None);
    let expected = rally_speed(config.rules.ball_speed, 1, config.rules.max_score);
    assert!((runner.table().ball.velocity() - expected as f64).abs() < 1e-9);

    let (texts, tones) = w.finish();
    assert!(tones.ends_with(&MISS_THEN_SERVE), "got {tones:?}");
    assert!(!tones.contains(&HIT_TONE));
    assert!(texts.ends_with(&[TITLE.to_string(), "0".to_string(), "1".to_string()]));
}

#[test]
fn far_edge_miss_serves_toward_player_1() {
    let mut config = forty_tacho_paddles();
    config.timing.miss_pause_ms = 200;
    let mut driver = sim_driver(&config);
    fix_paddles(&driver, 0.0);
    let cp = checkpoint(&config);
    let w = workers();
    let table = seat(&mut driver, &config, &cp);

    let mut runner = MatchRunner::new(table, &config, &w.display, &w.audio, &cp);
    runner.open_game(&mut ScriptedOperator::new(0)).unwrap();
    runner.start_rally(0);

    place_ball(&driver, 935.0, 600.0);
    let ball = &mut runner.table_mut().ball;
    ball.set_heading(0.0);
    ball.set_vel(150.0);

    assert_eq!(runner.poll().unwrap(), Some(Side::Player1));
    assert_eq!(runner.table().scores(), [1, 0]);
    assert_eq!(runner.state(), MatchState::PointScored);
    let angle = runner.table().ball.angle();
    assert!(
        angle.to_radians().cos() < 0.0,
        "serve after a player 2 miss heads toward player 1, got {angle}"
    );

    let (texts, tones) = w.finish();
    assert!(tones.ends_with(&MISS_THEN_SERVE), "got {tones:?}");
    assert!(texts.ends_with(&[TITLE.to_string(), "1".to_string(), "0".to_string()]));
}

#[test]
fn wall_bounce_fires_once() {
    let config = sim_config("");
    let mut driver = sim_driver(&config);
    fix_paddles(&driver, 0.0);
    let cp = checkpoint(&config);
    let w = workers();
    let table = seat(&mut driver, &config, &cp);

    let mut runner = MatchRunner::new(table, &config, &w.display, &w.audio, &cp);
    runner.open_game(&mut ScriptedOperator::new(0)).unwrap();
    runner.start_rally(0);

    place_ball(&driver, 470.0, 3.0);
    let ball = &mut runner.table_mut().ball;
    ball.set_heading(300.0);
    ball.set_vel(150.0);

    assert_eq!(runner.poll().unwrap(), None);
    assert_eq!(runner.markers().last_touched(), Touch::UpperWall);
    assert!((runner.table().ball.angle() - 60.0).abs() < 1e-9);

    assert_eq!(runner.poll().unwrap(), None);
    assert!((runner.table().ball.angle() - 60.0).abs() < 1e-9);

    let (_, tones) = w.finish();
    assert_eq!(tones.iter().filter(|&&t| t == WALL_TONE).count(), 1);
    assert_eq!(tones.last(), Some(&WALL_TONE));
}

#[test]
fn polls_are_ignored_until_the_serve() {
    let config = forty_tacho_paddles();
    let mut driver = sim_driver(&config);
    fix_paddles(&driver, 0.0);
    let cp = checkpoint(&config);
    let w = workers();
    let table = seat(&mut driver, &config, &cp);

    let mut runner = MatchRunner::new(table, &config, &w.display, &w.audio, &cp);
    runner.open_game(&mut ScriptedOperator::new(0)).unwrap();
    assert_eq!(runner.state(), MatchState::Serving);

    place_ball(&driver, 5.0, 200.0);
    assert_eq!(runner.poll().unwrap(), None);
    assert_eq!(runner.table().scores(), [0, 0]);
    assert_eq!(runner.markers().last_touched(), Touch::None);
}

#[test]
fn rally_speed_ramps_within_a_game() {
    let config = sim_config("");
    let mut driver = sim_driver(&config);
    let cp = checkpoint(&config);
    let w = workers();
    let table = seat(&mut driver, &config, &cp);

    let mut runner = MatchRunner::new(table, &config, &w.display, &w.audio, &cp);
    runner.open_game(&mut ScriptedOperator::new(0)).unwrap();

    // 150 + 150 * 2 * 3 / 2
    runner.start_rally(3);
    assert!((runner.table().ball.velocity() - 600.0).abs() < 1e-9);
    assert_eq!(rally_speed(150, 3, 5), 330);
}
