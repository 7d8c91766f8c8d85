//! Move selector port - anything that can pick a cell for the side to move
//!
//! Implemented by the greedy Q-learning view, the minimax solver and a
//! uniform random baseline, so arenas can pit any two against each other.

use crate::{
    Result,
    tictactoe::{Board, Player},
};

/// Chooses a move on an absolute board for `mover`.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_rl::ports::MoveSelector;
/// use tictactoe_rl::tictactoe::{Board, Player};
///
/// fn opening<S: MoveSelector>(selector: &mut S) -> tictactoe_rl::Result<usize> {
///     selector.select_move(&Board::new(), Player::X)
/// }
/// ```
pub trait MoveSelector {
    /// Pick a cell (0-8) for `mover`.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid moves are available.
    fn select_move(&mut self, board: &Board, mover: Player) -> Result<usize>;

    /// Short name used in reports and logs.
    fn name(&self) -> &str;
}
