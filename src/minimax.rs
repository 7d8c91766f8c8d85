//! Exact minimax solver with memoization
//!
//! Values are always relative to the player about to move: `+1` when that
//! player can force a win, `-1` when the opponent can, `0` for a forced draw.
//! The search is a full negamax over the (small) tic-tac-toe state space,
//! memoized on the exact `(board, mover)` pair without symmetry folding.
//!
//! Among several optimal moves the lowest cell index is returned. Actions are
//! enumerated in ascending order and only a strictly better value replaces the
//! current best, so stopping early on a `+1` never changes the answer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    tictactoe::{Board, Player},
};

/// Game-theoretic value of a position and every move that achieves it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimalPolicy {
    pub value: i8,
    pub optimal_moves: Vec<usize>,
}

/// Memoizing negamax solver.
///
/// The cache persists across calls, so one solver instance can answer many
/// queries (a training run asks for thousands of moves) cheaply.
#[derive(Debug, Clone, Default)]
pub struct MinimaxSolver {
    memo: HashMap<(Board, Player), i8>,
}

impl MinimaxSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized positions
    pub fn cache_size(&self) -> usize {
        self.memo.len()
    }

    /// Value of `board` for `mover`, the player about to move.
    pub fn value(&mut self, board: &Board, mover: Player) -> i8 {
        let key = (*board, mover);
        if let Some(&value) = self.memo.get(&key) {
            return value;
        }

        let value = if let Some(winner) = board.winner() {
            if winner == mover { 1 } else { -1 }
        } else if board.is_full() {
            0
        } else {
            let mut best = -2;
            for action in board.legal_actions() {
                let child = self.child_value(board, action, mover);
                if child > best {
                    best = child;
                    if best == 1 {
                        break;
                    }
                }
            }
            best
        };

        self.memo.insert(key, value);
        value
    }

    /// Value for `mover` of playing `action`: the negated value of the
    /// resulting position for the opponent.
    fn child_value(&mut self, board: &Board, action: usize, mover: Player) -> i8 {
        let mut next = *board;
        next.cells[action] = mover.to_cell();
        -self.value(&next, mover.opponent())
    }

    /// Lowest-index move achieving the optimal value for `mover`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] when the board has no empty cell.
    pub fn best_move(&mut self, board: &Board, mover: Player) -> Result<usize> {
        let mut best: Option<(usize, i8)> = None;
        for action in board.legal_actions() {
            let value = self.child_value(board, action, mover);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((action, value));
                if value == 1 {
                    break;
                }
            }
        }
        best.map(|(action, _)| action).ok_or(Error::NoValidMoves)
    }

    /// Every move that attains the optimal value, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] when the board has no empty cell.
    pub fn optimal_policy(&mut self, board: &Board, mover: Player) -> Result<OptimalPolicy> {
        let actions = board.legal_actions();
        if actions.is_empty() {
            return Err(Error::NoValidMoves);
        }

        let scored: Vec<(usize, i8)> = actions
            .into_iter()
            .map(|action| (action, self.child_value(board, action, mover)))
            .collect();
        let value = scored.iter().map(|&(_, v)| v).max().unwrap_or(-1);
        let optimal_moves = scored
            .into_iter()
            .filter(|&(_, v)| v == value)
            .map(|(action, _)| action)
            .collect();

        Ok(OptimalPolicy {
            value,
            optimal_moves,
        })
    }
}

/// One-shot optimal move for `mover` on an absolute board.
///
/// Builds a fresh solver; hold a [`MinimaxSolver`] instead when asking
/// repeatedly.
pub fn minimax_best_move(board: &Board, mover: Player) -> Result<usize> {
    MinimaxSolver::new().best_move(board, mover)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(values: [i8; 9]) -> Board {
        Board::from_values(&values).unwrap()
    }

    #[test]
    fn test_completes_winning_line() {
        let b = board([1, 1, 0, -1, -1, 0, 0, 0, 0]);
        assert_eq!(minimax_best_move(&b, Player::X).unwrap(), 2);
    }

    #[test]
    fn test_o_takes_own_win_over_block() {
        // O can win at 5; blocking X at 2 would only delay
        let b = board([1, 1, 0, -1, -1, 0, 1, 0, 0]);
        assert_eq!(minimax_best_move(&b, Player::O).unwrap(), 5);
    }

    #[test]
    fn test_blocks_immediate_threat() {
        // X threatens 2; O has no win of its own
        let b = board([1, 1, 0, 0, -1, 0, 0, 0, 0]);
        assert_eq!(minimax_best_move(&b, Player::O).unwrap(), 2);
    }

    #[test]
    fn test_empty_board_is_a_draw() {
        let mut solver = MinimaxSolver::new();
        assert_eq!(solver.value(&Board::new(), Player::X), 0);
        assert_eq!(solver.value(&Board::new(), Player::O), 0);
        assert!(solver.cache_size() > 0);
    }

    #[test]
    fn test_terminal_values_relative_to_mover() {
        let mut solver = MinimaxSolver::new();
        let x_won = board([1, 1, 1, -1, -1, 0, 0, 0, 0]);
        assert_eq!(solver.value(&x_won, Player::O), -1);
        assert_eq!(solver.value(&x_won, Player::X), 1);

        let drawn = board([1, -1, 1, 1, -1, -1, -1, 1, 1]);
        assert_eq!(solver.value(&drawn, Player::X), 0);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let drawn = board([1, -1, 1, 1, -1, -1, -1, 1, 1]);
        assert!(matches!(
            minimax_best_move(&drawn, Player::X),
            Err(Error::NoValidMoves)
        ));
    }

    #[test]
    fn test_best_move_is_first_optimal() {
        let mut solver = MinimaxSolver::new();
        let b = board([1, 0, 0, 0, -1, 0, 0, 0, 0]);
        let policy = solver.optimal_policy(&b, Player::X).unwrap();
        let best = solver.best_move(&b, Player::X).unwrap();
        assert_eq!(policy.optimal_moves.first(), Some(&best));
        assert_eq!(policy.value, 0);
    }

    #[test]
    fn test_edge_reply_to_corner_loses() {
        // Only the centre holds the draw after a corner opening
        let mut solver = MinimaxSolver::new();
        let edge_reply = board([1, -1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(solver.value(&edge_reply, Player::X), 1);

        let centre_reply = board([1, 0, 0, 0, -1, 0, 0, 0, 0]);
        assert_eq!(solver.value(&centre_reply, Player::X), 0);
    }
}
