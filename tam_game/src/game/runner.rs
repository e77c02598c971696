//! The main loop: rally → point → game → match.
//!
//! Only this loop touches the ball motors and paddle sensors. Rallies poll
//! as fast as the hardware answers; display and audio requests are
//! fire-and-forget.

use super::machine::{MatchEvent, MatchState, MatchStateMachine, TransitionResult};
use super::rally::{Field, RallyMarkers, Touch, Zone, paddle_contact, rally_speed};
use crate::ball::{Ball, Calibration, Scorer};
use crate::checkpoint::Checkpoint;
use crate::config::{GameConfig, ms};
use crate::error::GameError;
use crate::operator::Operator;
use crate::player::Player;
use crate::presentation::audio::{Audio, HIT_TONE, SERVE_TONE, WALL_TONE};
use crate::presentation::display::Display;
use tam_common::hal::types::Side;
use tracing::{debug, info, warn};

/// Calibrated ball and both players.
pub struct Table {
    pub ball: Ball,
    pub players: [Player; 2],
}

impl Table {
    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        &mut self.players[side.index()]
    }

    /// `[player 1, player 2]` scores.
    pub fn scores(&self) -> [u32; 2] {
        [self.players[0].score(), self.players[1].score()]
    }
}

/// Outcome of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Side,
    /// `[player 1, player 2]`
    pub scores: [u32; 2],
}

/// Everything played until the operator declined a rematch.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub games: Vec<GameResult>,
    /// Geometry used for every game.
    pub calibration: Calibration,
}

/// Main loop state.
pub struct MatchRunner<'a> {
    table: Table,
    config: &'a GameConfig,
    display: &'a Display,
    audio: &'a Audio,
    checkpoint: &'a Checkpoint,
    machine: MatchStateMachine,
    field: Field,
    markers: RallyMarkers,
}

impl<'a> MatchRunner<'a> {
    pub fn new(
        table: Table,
        config: &'a GameConfig,
        display: &'a Display,
        audio: &'a Audio,
        checkpoint: &'a Checkpoint,
    ) -> Self {
        let field = Field::new(table.ball.max_x(), table.ball.max_y(), &config.rules);
        Self {
            table,
            config,
            display,
            audio,
            checkpoint,
            machine: MatchStateMachine::new(),
            field,
            markers: RallyMarkers::new(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn state(&self) -> MatchState {
        self.machine.state()
    }

    pub fn markers(&self) -> RallyMarkers {
        self.markers
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// Play games until the operator declines a rematch.
    ///
    /// # Errors
    /// `GameError::ExitRequested` when the exit signal ends the match.
    pub fn run(&mut self, operator: &mut dyn Operator) -> Result<MatchSummary, GameError> {
        let result = self.play_match(operator);
        if result.as_ref().is_err_and(|e| e.is_exit()) {
            self.transition(MatchEvent::ExitRequested);
        }
        result
    }

    fn play_match(&mut self, operator: &mut dyn Operator) -> Result<MatchSummary, GameError> {
        let mut summary = MatchSummary {
            games: Vec::new(),
            calibration: self.table.ball.calibration(),
        };

        loop {
            let result = self.play_game(operator)?;
            summary.games.push(result);

            self.transition(MatchEvent::RematchPrompted);
            self.display.print("Rematch?");
            if operator.rematch(self.checkpoint)? {
                self.transition(MatchEvent::RematchAccepted);
                for player in &mut self.table.players {
                    player.reset_score();
                }
                info!("Rematch accepted, scores reset");
                self.transition(MatchEvent::NewMatch);
            } else {
                self.transition(MatchEvent::RematchDeclined);
                info!("Rematch declined after {} game(s)", summary.games.len());
            }

            if self.machine.is_finished() {
                return Ok(summary);
            }
        }
    }

    /// Play one game to the winning score and announce the winner.
    pub fn play_game(&mut self, operator: &mut dyn Operator) -> Result<GameResult, GameError> {
        self.open_game(operator)?;

        let mut round = 0;
        loop {
            self.start_rally(round);
            self.play_rally()?;
            round += 1;

            if let Some(winner) = self.winner() {
                let result = GameResult {
                    winner,
                    scores: self.table.scores(),
                };
                self.transition(MatchEvent::VictoryReached);
                self.announce(winner)?;
                return Ok(result);
            }
        }
    }

    /// Centre the ball, wait for the operator, count down and serve.
    pub fn open_game(&mut self, operator: &mut dyn Operator) -> Result<(), GameError> {
        let timing = &self.config.timing;

        self.table
            .ball
            .go_to_middle(&self.config.calibration, self.checkpoint)?;
        self.display.print("Press to start");
        operator.wait_for_start(self.checkpoint)?;
        self.transition(MatchEvent::StartPressed);
        self.checkpoint.pause(ms(timing.start_delay_ms))?;

        self.audio.countdown();
        self.checkpoint.pause(ms(timing.countdown_ms))?;
        self.transition(MatchEvent::CountdownDone);

        self.table.ball.kick_off(0)?;
        let [p1, p2] = self.table.scores();
        self.display.show_score(p1, p2);
        Ok(())
    }

    /// Set the ball moving at the speed of rally `round` and clear the
    /// touch markers.
    pub fn start_rally(&mut self, round: u32) {
        let rules = &self.config.rules;
        let speed = rally_speed(rules.ball_speed, round, rules.max_score);
        self.table.ball.set_vel(speed as f64);
        self.markers = RallyMarkers::new();

        let event = if self.machine.state() == MatchState::Serving {
            MatchEvent::Served
        } else {
            MatchEvent::RallyResumed
        };
        self.transition(event);
        debug!("Rally {} at {} tacho/s", round, speed);
    }

    /// Poll until a miss. Returns the player who scored.
    pub fn play_rally(&mut self) -> Result<Side, GameError> {
        loop {
            if let Some(scorer) = self.poll()? {
                return Ok(scorer);
            }
        }
    }

    /// One iteration of the rally loop.
    ///
    /// Returns the scorer when the poll ended the rally with a miss.
    pub fn poll(&mut self) -> Result<Option<Side>, GameError> {
        self.checkpoint.check()?;
        if !self.machine.in_play() {
            return Ok(None);
        }

        let ball = &self.table.ball;
        let x = ball.x_pos();
        let y = ball.y_pos();

        let Some(zone) = self.field.zone(&self.markers, x, y) else {
            return Ok(None);
        };

        match zone {
            Zone::Edge(side) => {
                let player = self.table.player_mut(side);
                let paddle = player.paddle_pos();
                let width = player.paddle_width();

                match paddle_contact(y, paddle, width, self.config.rules.pad_tol) {
                    Some(contact) => {
                        self.markers.record(Touch::Paddle(side));
                        self.audio.tone(HIT_TONE);
                        let ball = &mut self.table.ball;
                        ball.hit_pad(contact, width);
                        ball.set_vel(ball.velocity() + self.config.rules.increment as f64);
                        debug!(
                            "{} hit at {:.1}/{:.1}: heading {:.1}, speed {:.0}",
                            side,
                            contact,
                            width,
                            ball.angle(),
                            ball.velocity()
                        );
                        Ok(None)
                    }
                    None => {
                        debug!("{} missed: ball y={}, paddle {:.1}+{:.1}", side, y, paddle, width);
                        self.score_miss(side)?;
                        Ok(Some(side.opponent()))
                    }
                }
            }
            Zone::UpperWall | Zone::LowerWall => {
                let touch = if zone == Zone::UpperWall {
                    Touch::UpperWall
                } else {
                    Touch::LowerWall
                };
                self.markers.record(touch);
                self.table.ball.hit_wall();
                self.audio.tone(WALL_TONE);
                debug!("{:?} bounce: heading {:.1}", zone, self.table.ball.angle());
                Ok(None)
            }
        }
    }

    /// Award the point, recentre and serve toward the scorer.
    fn score_miss(&mut self, missed: Side) -> Result<(), GameError> {
        let timing = &self.config.timing;
        let scorer = missed.opponent();

        self.table.player_mut(scorer).add_point();
        self.transition(MatchEvent::PointScored);
        let [p1, p2] = self.table.scores();
        info!("{} scores ({}:{})", scorer, p1, p2);

        self.display.show_score(p1, p2);
        self.audio.miss();
        self.checkpoint.pause(ms(timing.miss_pause_ms))?;
        self.table
            .ball
            .go_to_middle(&self.config.calibration, self.checkpoint)?;
        self.checkpoint.pause(ms(timing.recenter_pause_ms))?;

        match missed {
            Side::Player1 => {
                self.audio.tone(SERVE_TONE);
                self.table.ball.serve(Scorer::from(scorer));
            }
            Side::Player2 => {
                self.table.ball.serve(Scorer::from(scorer));
                self.audio.tone(SERVE_TONE);
            }
        }
        Ok(())
    }

    fn winner(&self) -> Option<Side> {
        let max = self.config.rules.max_score;
        [Side::Player1, Side::Player2]
            .into_iter()
            .map(|side| self.table.player(side))
            .find(|player| player.score() == max)
            .map(Player::side)
    }

    fn announce(&mut self, winner: Side) -> Result<(), GameError> {
        info!("{} won the game", winner);
        self.display
            .print(format!("PLAYER {} WON!", winner.number()));
        self.audio.victory();
        self.checkpoint.pause(ms(self.config.timing.victory_ms))?;
        self.display.print("");
        Ok(())
    }

    fn transition(&mut self, event: MatchEvent) {
        match self.machine.handle_event(event) {
            TransitionResult::Ok(state) => debug!("Match {:?} -> {}", event, state),
            TransitionResult::Rejected(reason) => {
                warn!("Match event {:?} rejected: {}", event, reason)
            }
        }
    }
}
