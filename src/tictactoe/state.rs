//! Perspective state: the board as seen by the player about to move

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, Player};
use crate::{Error, Result};

/// Board cells relative to the mover: +1 mine, -1 opponent's, 0 empty.
///
/// Ordering is lexicographic over the nine cells, which is what
/// canonicalization minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[i8; 9]", into = "[i8; 9]")]
pub struct State([i8; 9]);

impl State {
    /// The empty board (identical from either side)
    pub const EMPTY: State = State([0; 9]);

    /// Wrap cells already known to be in {-1, 0, 1}
    pub(crate) fn from_raw(values: [i8; 9]) -> Self {
        State(values)
    }

    /// Build a state from nine values in {-1, 0, 1}.
    ///
    /// # Errors
    ///
    /// Returns error on a wrong length or an out-of-range value.
    pub fn from_values(values: &[i8]) -> Result<Self> {
        if values.len() != 9 {
            return Err(Error::InvalidBoardLength {
                expected: 9,
                got: values.len(),
            });
        }

        let mut cells = [0; 9];
        for (position, &value) in values.iter().enumerate() {
            if !(-1..=1).contains(&value) {
                return Err(Error::InvalidCellValue { value, position });
            }
            cells[position] = value;
        }
        Ok(State(cells))
    }

    pub fn values(&self) -> &[i8; 9] {
        &self.0
    }

    pub fn get(&self, pos: usize) -> i8 {
        self.0[pos]
    }

    /// Empty positions in ascending order
    pub fn legal_actions(&self) -> Vec<usize> {
        (0..9).filter(|&i| self.0[i] == 0).collect()
    }

    pub fn is_legal(&self, action: usize) -> bool {
        action < 9 && self.0[action] == 0
    }

    pub fn has_legal_action(&self) -> bool {
        self.0.contains(&0)
    }

    /// Recover the absolute board given who the mover is.
    ///
    /// Inverse of [`Board::to_perspective`] for the same mover.
    pub fn to_board(&self, mover: Player) -> Board {
        let sign = mover.sign();
        let mut cells = [Cell::Empty; 9];
        for (cell, &value) in cells.iter_mut().zip(self.0.iter()) {
            *cell = match value * sign {
                1 => Cell::X,
                -1 => Cell::O,
                _ => Cell::Empty,
            };
        }
        Board { cells }
    }
}

impl TryFrom<[i8; 9]> for State {
    type Error = Error;

    fn try_from(values: [i8; 9]) -> Result<Self> {
        State::from_values(&values)
    }
}

impl From<State> for [i8; 9] {
    fn from(state: State) -> Self {
        state.0
    }
}

impl Default for State {
    fn default() -> Self {
        State::EMPTY
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &v) in self.0.iter().enumerate() {
            let c = match v {
                1 => 'M',
                -1 => 'T',
                _ => '.',
            };
            write!(f, "{c}")?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_roundtrip_both_movers() {
        let board = Board::from_values(&[1, -1, 0, 0, 1, 0, -1, 0, 0]).unwrap();
        for mover in [Player::X, Player::O] {
            let state = board.to_perspective(mover);
            assert_eq!(state.to_board(mover), board);
        }
    }

    #[test]
    fn test_from_values_validation() {
        assert!(State::from_values(&[0; 8]).is_err());
        assert!(matches!(
            State::from_values(&[0, 0, 0, 0, 0, 0, 0, 0, -2]),
            Err(Error::InvalidCellValue {
                value: -2,
                position: 8
            })
        ));
        assert_eq!(State::from_values(&[0; 9]).unwrap(), State::EMPTY);
    }

    #[test]
    fn test_deserialize_validates_cells() {
        let state: State = serde_json::from_str("[1,-1,0,0,0,0,0,0,0]").unwrap();
        assert_eq!(state.legal_actions(), (2..9).collect::<Vec<_>>());
        assert!(serde_json::from_str::<State>("[7,0,0,0,0,0,0,0,0]").is_err());
        assert!(serde_json::from_str::<State>("[0,0,0]").is_err());
    }

    #[test]
    fn test_legal_actions() {
        let state = State::from_values(&[1, -1, 0, 0, 1, 0, -1, 0, 0]).unwrap();
        assert_eq!(state.legal_actions(), vec![2, 3, 5, 7, 8]);
        assert!(state.is_legal(2));
        assert!(!state.is_legal(0));
        assert!(!state.is_legal(9));
    }

    #[test]
    fn test_lexicographic_order() {
        let low = State::from_values(&[-1, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        let high = State::from_values(&[0, 0, 0, 0, 0, 0, 0, 0, 1]).unwrap();
        assert!(low < State::EMPTY);
        assert!(State::EMPTY < high);
    }
}
