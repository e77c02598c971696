//! Match lifecycle.
//!
//! AwaitStart → Countdown → Serving → RallyInPlay → PointScored →
//! (RallyInPlay | GameOver) → RematchPrompt → (Reset | Exit), and
//! Reset → AwaitStart. An exit request ends the match from anywhere.

use std::fmt;

/// Match lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchState {
    /// Ball centred, waiting for the operator.
    AwaitStart,
    /// Countdown jingle playing.
    Countdown,
    /// First kickoff of a game.
    Serving,
    /// Ball moving, zones polled.
    RallyInPlay,
    /// A miss was scored; ball recentred and served again.
    PointScored,
    /// A player reached the winning score.
    GameOver,
    /// Waiting for the rematch answer.
    RematchPrompt,
    /// Scores zeroed for a new game.
    Reset,
    /// Terminal.
    Exit,
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of a MatchState transition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition succeeded: new state.
    Ok(MatchState),
    /// Transition rejected: reason.
    Rejected(&'static str),
}

/// Event that can move the match along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    /// Operator started the game.
    StartPressed,
    /// Countdown finished.
    CountdownDone,
    /// First kickoff issued and ball set moving.
    Served,
    /// A miss on either edge.
    PointScored,
    /// Next rally started after a point.
    RallyResumed,
    /// A score reached the winning score.
    VictoryReached,
    /// Winner announced, menu shown.
    RematchPrompted,
    /// Operator wants another game.
    RematchAccepted,
    /// Operator is done.
    RematchDeclined,
    /// Scores zeroed, back to the start screen.
    NewMatch,
    /// Exit button or Ctrl-C.
    ExitRequested,
}

/// Match state holder.
#[derive(Debug, Clone)]
pub struct MatchStateMachine {
    state: MatchState,
}

impl MatchStateMachine {
    /// Starts in AwaitStart.
    pub const fn new() -> Self {
        Self {
            state: MatchState::AwaitStart,
        }
    }

    #[inline]
    pub const fn state(&self) -> MatchState {
        self.state
    }

    /// Whether the ball may be moving.
    #[inline]
    pub const fn in_play(&self) -> bool {
        matches!(self.state, MatchState::RallyInPlay)
    }

    #[inline]
    pub const fn is_finished(&self) -> bool {
        matches!(self.state, MatchState::Exit)
    }

    /// Attempt a transition given an event.
    pub fn handle_event(&mut self, event: MatchEvent) -> TransitionResult {
        use MatchEvent::*;
        use MatchState::*;

        let next = match (self.state, event) {
            (Exit, _) => return TransitionResult::Rejected("Exit: match is over"),
            (_, ExitRequested) => Exit,

            (AwaitStart, StartPressed) => Countdown,
            (Countdown, CountdownDone) => Serving,
            (Serving, Served) => RallyInPlay,

            (RallyInPlay, MatchEvent::PointScored) => MatchState::PointScored,
            (MatchState::PointScored, RallyResumed) => RallyInPlay,
            (MatchState::PointScored, VictoryReached) => GameOver,

            (GameOver, RematchPrompted) => RematchPrompt,
            (RematchPrompt, RematchAccepted) => Reset,
            (RematchPrompt, RematchDeclined) => Exit,
            (Reset, NewMatch) => AwaitStart,

            _ => {
                return TransitionResult::Rejected(invalid_transition_reason(self.state, event));
            }
        };

        self.state = next;
        TransitionResult::Ok(next)
    }
}

impl Default for MatchStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid_transition_reason(state: MatchState, _event: MatchEvent) -> &'static str {
    use MatchState::*;
    match state {
        AwaitStart => "AwaitStart: only StartPressed allowed",
        Countdown => "Countdown: only CountdownDone allowed",
        Serving => "Serving: only Served allowed",
        RallyInPlay => "RallyInPlay: only PointScored allowed",
        PointScored => "PointScored: only RallyResumed or VictoryReached allowed",
        GameOver => "GameOver: only RematchPrompted allowed",
        RematchPrompt => "RematchPrompt: only RematchAccepted or RematchDeclined allowed",
        Reset => "Reset: only NewMatch allowed",
        Exit => "Exit: match is over",
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
