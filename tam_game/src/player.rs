//! Player: a score bound to one paddle.

use crate::paddle::Paddle;
use tam_common::hal::types::Side;

pub struct Player {
    side: Side,
    score: u32,
    paddle: Paddle,
}

impl Player {
    pub fn new(side: Side, paddle: Paddle) -> Self {
        Self {
            side,
            score: 0,
            paddle,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_point(&mut self) {
        self.score += 1;
    }

    /// Only a rematch resets a score.
    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    /// Live paddle position [tacho].
    pub fn paddle_pos(&mut self) -> f64 {
        self.paddle.pos()
    }

    /// Paddle width [tacho].
    pub fn paddle_width(&self) -> f64 {
        self.paddle.width()
    }
}
