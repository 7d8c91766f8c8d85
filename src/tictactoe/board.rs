//! Absolute board representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{game::GameOutcome, lines::LineAnalyzer, state::State};
use crate::{Error, Result};

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '_' | '-' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    /// Numeric encoding: X = +1, O = -1, Empty = 0
    pub fn value(self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => -1,
        }
    }

    /// Decode a numeric cell, rejecting anything outside {-1, 0, 1}.
    pub fn from_value(value: i8, position: usize) -> Result<Cell> {
        match value {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::X),
            -1 => Ok(Cell::O),
            _ => Err(Error::InvalidCellValue { value, position }),
        }
    }
}

/// A player (mark) in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    /// +1 for X, -1 for O
    pub fn sign(self) -> i8 {
        match self {
            Player::X => 1,
            Player::O => -1,
        }
    }

    pub fn to_char(self) -> char {
        self.to_cell().to_char()
    }

    /// Parse "X"/"O" (case-insensitive).
    pub fn parse(token: &str) -> Result<Player> {
        match token.trim() {
            "X" | "x" => Ok(Player::X),
            "O" | "o" => Ok(Player::O),
            other => Err(Error::InvalidPlayerString {
                player: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Absolute board: cell meaning does not depend on whose turn it is.
///
/// This type implements `Copy` since it is only 9 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    pub cells: [Cell; 9],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; 9],
        }
    }

    /// Build a board from its numeric encoding (X = +1, O = -1, Empty = 0).
    ///
    /// # Errors
    ///
    /// Returns error if the slice does not hold exactly 9 values or any value
    /// lies outside {-1, 0, 1}.
    pub fn from_values(values: &[i8]) -> Result<Self> {
        if values.len() != 9 {
            return Err(Error::InvalidBoardLength {
                expected: 9,
                got: values.len(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (position, &value) in values.iter().enumerate() {
            cells[position] = Cell::from_value(value, position)?;
        }
        Ok(Board { cells })
    }

    /// Numeric encoding of the board.
    pub fn values(&self) -> [i8; 9] {
        self.cells.map(Cell::value)
    }

    /// Create a board from a string representation such as `"XX.OO...."`.
    ///
    /// Whitespace is ignored; exactly 9 cell characters must remain.
    ///
    /// # Errors
    ///
    /// Returns error if the cell count is not 9 or a character is not a cell.
    pub fn from_string(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != 9 {
            return Err(Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }
        Ok(Board { cells })
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// All empty positions in ascending order
    pub fn legal_actions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Place `player`'s mark at `pos` and return the new board
    #[must_use = "place returns a new board; the original is unchanged"]
    pub fn place(&self, pos: usize, player: Player) -> Result<Board> {
        if pos >= 9 {
            return Err(Error::InvalidPosition { position: pos });
        }
        if !self.is_empty(pos) {
            return Err(Error::InvalidMove { position: pos });
        }

        let mut next = *self;
        next.cells[pos] = player.to_cell();
        Ok(next)
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        LineAnalyzer::winner(&self.cells)
    }

    /// True when no cell is empty
    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Outcome of a finished game, `None` while play continues
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.winner() {
            Some(player) => Some(GameOutcome::Win(player)),
            None if self.is_full() => Some(GameOutcome::Draw),
            None => None,
        }
    }

    /// View the board from `mover`'s side: +1 mine, -1 opponent's, 0 empty.
    pub fn to_perspective(&self, mover: Player) -> State {
        let sign = mover.sign();
        State::from_raw(self.values().map(|v| v * sign))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
