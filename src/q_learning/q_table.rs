//! Sparse action-value table keyed by canonical perspective states

use std::collections::HashMap;

use crate::tictactoe::State;

/// One row of action values, indexed by cell in canonical orientation
pub type ActionValues = [f64; 9];

/// Q-table mapping canonical states to nine action values.
///
/// Rows are created on demand and start at zero. Callers only ever hand in
/// canonical states and canonical action indices; the agent owns the mapping
/// from concrete orientations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    rows: HashMap<State, ActionValues>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Row for `state`, if one has been created
    pub fn get(&self, state: &State) -> Option<&ActionValues> {
        self.rows.get(state)
    }

    /// Q-value for a state-action pair; zero for rows not yet created
    pub fn value(&self, state: &State, action: usize) -> f64 {
        self.rows.get(state).map_or(0.0, |row| row[action])
    }

    /// Get-or-insert-zero access to the row for `state`
    pub fn row_mut(&mut self, state: State) -> &mut ActionValues {
        self.rows.entry(state).or_insert([0.0; 9])
    }

    /// Maximum Q-value over the given actions, `None` when there are none
    pub fn max_value(&self, state: &State, actions: &[usize]) -> Option<f64> {
        actions
            .iter()
            .map(|&action| self.value(state, action))
            .reduce(f64::max)
    }

    /// Highest-valued action; ties go to the earliest entry of `actions`
    pub fn greedy_action(&self, state: &State, actions: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &action in actions {
            let value = self.value(state, action);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((action, value));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop every row
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&State, &ActionValues)> {
        self.rows.iter()
    }
}

impl FromIterator<(State, ActionValues)> for QTable {
    fn from_iter<I: IntoIterator<Item = (State, ActionValues)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(values: [i8; 9]) -> State {
        State::from_values(&values).unwrap()
    }

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new();
        assert_eq!(qtable.value(&State::EMPTY, 0), 0.0);
        assert!(qtable.is_empty());
    }

    #[test]
    fn test_row_mut_inserts_zero_row() {
        let mut qtable = QTable::new();
        assert_eq!(*qtable.row_mut(State::EMPTY), [0.0; 9]);
        qtable.row_mut(State::EMPTY)[4] = 1.5;
        assert_eq!(qtable.value(&State::EMPTY, 4), 1.5);
        assert_eq!(qtable.len(), 1);
    }

    #[test]
    fn test_max_value() {
        let mut qtable = QTable::new();
        let row = qtable.row_mut(State::EMPTY);
        row[0] = 0.5;
        row[1] = 1.5;
        row[2] = 0.8;

        assert_eq!(qtable.max_value(&State::EMPTY, &[0, 1, 2]), Some(1.5));
        assert_eq!(qtable.max_value(&State::EMPTY, &[0, 2]), Some(0.8));
        assert_eq!(qtable.max_value(&State::EMPTY, &[]), None);
    }

    #[test]
    fn test_max_value_of_all_negative_row() {
        let mut qtable = QTable::new();
        let s = state([1, -1, 0, 0, 0, 0, 0, 0, 0]);
        qtable.row_mut(s)[2] = -0.3;
        qtable.row_mut(s)[3] = -0.1;
        assert_eq!(qtable.max_value(&s, &[2, 3]), Some(-0.1));
    }

    #[test]
    fn test_greedy_action() {
        let mut qtable = QTable::new();
        let row = qtable.row_mut(State::EMPTY);
        row[0] = 0.5;
        row[1] = 1.5;
        row[2] = 0.8;

        assert_eq!(qtable.greedy_action(&State::EMPTY, &[0, 1, 2]), Some(1));
        assert_eq!(qtable.greedy_action(&State::EMPTY, &[]), None);
    }

    #[test]
    fn test_greedy_ties_follow_given_order() {
        let qtable = QTable::new();
        assert_eq!(qtable.greedy_action(&State::EMPTY, &[7, 3, 5]), Some(7));
    }
}
