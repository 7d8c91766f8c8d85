//! Winning line analysis for Tic-Tac-Toe

use super::{Cell, Player};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Sum of the numeric cell values along a line (+3 X owns it, -3 O owns it)
    pub fn line_sum(cells: &[Cell; 9], line: &[usize; 3]) -> i8 {
        line.iter().map(|&idx| cells[idx].value()).sum()
    }

    /// First line found with a full set of one mark decides the winner.
    pub fn winner(cells: &[Cell; 9]) -> Option<Player> {
        WINNING_LINES
            .iter()
            .find_map(|line| match Self::line_sum(cells, line) {
                3 => Some(Player::X),
                -3 => Some(Player::O),
                _ => None,
            })
    }
}
