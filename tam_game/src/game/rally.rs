//! Rally rules: which zone the ball is in and whether a paddle covers it.
//!
//! Zones are checked in a fixed order (player 1 edge, player 2 edge, upper
//! wall, lower wall) and only the first match counts. The element touched
//! last is ignored until something else is touched, and a paddle edge stays
//! disarmed until the other paddle hits, so a ball lingering in a zone or a
//! corner cannot trigger twice.

use crate::config::RulesConfig;
use tam_common::hal::types::Side;

/// Element the ball touched last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Touch {
    #[default]
    None,
    Paddle(Side),
    UpperWall,
    LowerWall,
}

/// Zone the ball has entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// A player's edge: hit or miss.
    Edge(Side),
    UpperWall,
    LowerWall,
}

/// Per-rally touch memory, discarded when the rally ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RallyMarkers {
    last_touched: Touch,
    last_pad: Option<Side>,
}

impl RallyMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn last_touched(&self) -> Touch {
        self.last_touched
    }

    #[inline]
    pub fn last_pad(&self) -> Option<Side> {
        self.last_pad
    }

    /// Remember what the ball just touched.
    pub fn record(&mut self, touch: Touch) {
        self.last_touched = touch;
        if let Touch::Paddle(side) = touch {
            self.last_pad = Some(side);
        }
    }
}

/// Zone thresholds of a calibrated table [tacho].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub max_x: f64,
    pub max_y: f64,
    pub pad_tol: i32,
    pub wall_tol: i32,
}

impl Field {
    pub fn new(max_x: f64, max_y: f64, rules: &RulesConfig) -> Self {
        Self {
            max_x,
            max_y,
            pad_tol: rules.pad_tol,
            wall_tol: rules.wall_tol,
        }
    }

    /// First armed zone containing `(x, y)`, in priority order.
    pub fn zone(&self, markers: &RallyMarkers, x: i32, y: i32) -> Option<Zone> {
        let armed_edge = |side: Side| {
            markers.last_touched != Touch::Paddle(side) && markers.last_pad != Some(side)
        };

        if x <= self.pad_tol && armed_edge(Side::Player1) {
            Some(Zone::Edge(Side::Player1))
        } else if x as f64 >= self.max_x - self.pad_tol as f64 && armed_edge(Side::Player2) {
            Some(Zone::Edge(Side::Player2))
        } else if y <= self.wall_tol && markers.last_touched != Touch::UpperWall {
            Some(Zone::UpperWall)
        } else if y as f64 >= self.max_y - self.wall_tol as f64
            && markers.last_touched != Touch::LowerWall
        {
            Some(Zone::LowerWall)
        } else {
            None
        }
    }
}

/// Contact point on a paddle, if the ball is strictly inside its window.
///
/// The window is the paddle widened by `tol` on both sides. Returns the
/// distance from the paddle's upper edge.
pub fn paddle_contact(y: i32, paddle_pos: f64, width: f64, tol: i32) -> Option<f64> {
    let y = y as f64;
    let tol = tol as f64;
    (y > paddle_pos - tol && y < paddle_pos + width + tol).then(|| y - paddle_pos)
}

/// Starting speed of rally `round` within a game [tacho/s].
///
/// `base + base * 2 * round / max_score` in integer arithmetic.
pub fn rally_speed(base: i32, round: u32, max_score: u32) -> i32 {
    let ramp = (base as i64 * round as i64 * 2) / max_score.max(1) as i64;
    (base as i64 + ramp) as i32
}
