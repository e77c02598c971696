//! Whole games through the match runner.

use super::{checkpoint, fix_paddles, seat, sim_config, sim_driver, workers};
use tam_game::game::machine::MatchState;
use tam_game::game::runner::MatchRunner;
use tam_game::operator::ScriptedOperator;
use tam_game::presentation::audio::Tone;

#[test]
fn rematch_plays_a_second_game_from_zero() {
    let mut config = sim_config("");
    config.timing.victory_ms = 50;
    let mut driver = sim_driver(&config);
    fix_paddles(&driver, 0.0);
    let cp = checkpoint(&config);
    let w = workers();
    let table = seat(&mut driver, &config, &cp);
    let calibration = table.ball.calibration();

    let mut runner = MatchRunner::new(table, &config, &w.display, &w.audio, &cp);
    let summary = runner.run(&mut ScriptedOperator::new(1)).unwrap();

    assert_eq!(summary.games.len(), 2);
    for game in &summary.games {
        let max = config.rules.max_score;
        assert_eq!(game.scores[game.winner.index()], max);
        assert!(game.scores[game.winner.opponent().index()] < max);
    }
    assert_eq!(summary.calibration, calibration);
    assert_eq!(runner.state(), MatchState::Exit);
    // Scores of the last game are kept when the operator declines.
    assert_eq!(runner.table().scores(), summary.games[1].scores);

    let (texts, tones) = w.finish();
    for game in &summary.games {
        let banner = format!("PLAYER {} WON!", game.winner.number());
        assert!(texts.contains(&banner), "{banner} never shown");
    }
    let victories = tones.iter().filter(|&&t| t == Tone::new(400, 500)).count();
    assert_eq!(victories, 2);
    assert_eq!(texts.last().map(String::as_str), Some("Rematch?"));
}

#[test]
fn single_game_when_rematch_declined() {
    let config = sim_config("");
    let mut driver = sim_driver(&config);
    fix_paddles(&driver, 0.0);
    let cp = checkpoint(&config);
    let w = workers();
    let table = seat(&mut driver, &config, &cp);

    let mut runner = MatchRunner::new(table, &config, &w.display, &w.audio, &cp);
    let summary = runner.run(&mut ScriptedOperator::new(0)).unwrap();

    assert_eq!(summary.games.len(), 1);
    let total: u32 = summary.games[0].scores.iter().sum();
    assert!(total >= config.rules.max_score);
}

#[test]
fn raised_signal_stops_the_rally() {
    let config = sim_config("");
    let mut driver = sim_driver(&config);
    let cp = checkpoint(&config);
    let w = workers();
    let table = seat(&mut driver, &config, &cp);

    let mut runner = MatchRunner::new(table, &config, &w.display, &w.audio, &cp);
    runner.open_game(&mut ScriptedOperator::new(0)).unwrap();
    runner.start_rally(0);

    cp.signal().raise();
    assert!(runner.poll().unwrap_err().is_exit());
}
