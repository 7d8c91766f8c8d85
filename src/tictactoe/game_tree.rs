//! Reachable position enumeration

use std::collections::{BTreeSet, HashSet, VecDeque};

use super::{Board, Player, State};

/// A board together with the player about to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Board,
    pub to_move: Player,
}

impl Position {
    pub fn new(board: Board, to_move: Player) -> Self {
        Self { board, to_move }
    }

    /// The board from the mover's side
    pub fn state(&self) -> State {
        self.board.to_perspective(self.to_move)
    }
}

/// Every position reachable from the empty board when `first` opens,
/// terminal positions included, in breadth-first order.
pub fn reachable_positions(first: Player) -> Vec<Position> {
    let root = Position::new(Board::new(), first);
    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    let mut positions = Vec::new();

    while let Some(position) = queue.pop_front() {
        positions.push(position);

        if position.board.is_terminal() {
            continue;
        }

        for pos in position.board.legal_actions() {
            let Ok(board) = position.board.place(pos, position.to_move) else {
                continue;
            };
            let next = Position::new(board, position.to_move.opponent());
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    positions
}

/// Distinct perspective states at which some player has to decide,
/// across games opened by either mark. Sorted.
pub fn reachable_decision_states() -> Vec<State> {
    let states: BTreeSet<State> = [Player::X, Player::O]
        .into_iter()
        .flat_map(reachable_positions)
        .filter(|position| !position.board.is_terminal())
        .map(|position| position.state())
        .collect();
    states.into_iter().collect()
}

/// Canonical representatives of [`reachable_decision_states`]. Sorted.
pub fn canonical_decision_states() -> Vec<State> {
    let states: BTreeSet<State> = reachable_decision_states()
        .iter()
        .map(State::canonical)
        .collect();
    states.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_first_position_count() {
        let boards: HashSet<Board> = reachable_positions(Player::X)
            .into_iter()
            .map(|p| p.board)
            .collect();
        assert_eq!(boards.len(), 5478);
    }

    #[test]
    fn test_symmetry_shrinks_decision_states() {
        let all = reachable_decision_states();
        let canonical = canonical_decision_states();
        assert!(!canonical.is_empty());
        assert!(canonical.len() * 4 < all.len());
        assert!(all.iter().all(|s| s.has_legal_action()));
    }
}
