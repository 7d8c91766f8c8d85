//! Game outcomes

use serde::{Deserialize, Serialize};

use super::board::Player;

/// Outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Terminal reward for `player`: +1 win, -1 loss, 0 draw
    pub fn reward_for(self, player: Player) -> f64 {
        match self {
            GameOutcome::Win(winner) if winner == player => 1.0,
            GameOutcome::Win(_) => -1.0,
            GameOutcome::Draw => 0.0,
        }
    }
}
