//! Symmetry-aware tabular Q-learning agent
//!
//! The agent always reasons from the mover's perspective: the state it sees
//! has `+1` for its own marks and `-1` for the opponent's, whichever mark it
//! actually plays. Every state is folded onto its canonical D4 image before
//! the table is touched, and actions are mapped through the same transform.

use std::{fmt, path::PathBuf, sync::Arc};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    app::AgentConfig,
    ports::TableRepository,
    q_learning::{
        q_table::{ActionValues, QTable},
        serialization::SavedQTable,
    },
    tictactoe::{GameOutcome, Player, State},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Repository plus location the agent saves to and loads from.
#[derive(Clone)]
pub struct TableStorage {
    repository: Arc<dyn TableRepository + Send + Sync>,
    path: PathBuf,
}

impl TableStorage {
    pub fn new(repository: Arc<dyn TableRepository + Send + Sync>, path: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl fmt::Debug for TableStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableStorage")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Q-learning agent (off-policy TD control) over canonical perspective states.
///
/// Because the game is zero-sum and the next state is seen by the opponent,
/// the bootstrap term is subtracted:
/// `target = r - γ · max_a' Q(canon(s'), a')`.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    alpha: f64,
    gamma: f64,
    epsilon: f64,
    epsilon_min: f64,
    epsilon_decay: f64,
    table: QTable,
    rng: StdRng,
    rng_seed: Option<u64>,
    storage: Option<TableStorage>,
}

impl QLearningAgent {
    /// Create an agent with an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if any scalar is out of range.
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            alpha: config.alpha,
            gamma: config.gamma,
            epsilon: config.epsilon,
            epsilon_min: config.epsilon_min,
            epsilon_decay: config.epsilon_decay,
            table: QTable::new(),
            rng: build_rng(config.seed),
            rng_seed: config.seed,
            storage: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Bind the agent to the storage used by [`save`](Self::save) and
    /// [`load`](Self::load).
    pub fn with_storage(mut self, storage: TableStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// ε-greedy choice of a cell in the caller's orientation.
    ///
    /// `epsilon_override` replaces the agent's own exploration rate for this
    /// call only; pass `Some(0.0)` for pure exploitation. Choosing never
    /// creates table rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] if `state` has no empty cell.
    pub fn choose_action(&mut self, state: &State, epsilon_override: Option<f64>) -> Result<usize> {
        let epsilon = epsilon_override.unwrap_or(self.epsilon);
        if epsilon > 0.0 && self.rng.random::<f64>() < epsilon {
            return state
                .legal_actions()
                .choose(&mut self.rng)
                .copied()
                .ok_or(Error::NoValidMoves);
        }
        self.greedy_action(state)
    }

    /// Highest-valued legal cell in the caller's orientation.
    ///
    /// Ties go to the lowest original cell index among the tied actions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] if `state` has no empty cell.
    pub fn greedy_action(&self, state: &State) -> Result<usize> {
        let context = state.canonical_context();
        let canonical_actions: Vec<usize> = state
            .legal_actions()
            .into_iter()
            .map(|action| context.map_move_to_canonical(action))
            .collect();

        self.table
            .greedy_action(&context.state, &canonical_actions)
            .map(|action| context.map_canonical_to_original(action))
            .ok_or(Error::NoValidMoves)
    }

    /// One temporal-difference step for `action` taken in `state`.
    ///
    /// `next_state` is the position the opponent now faces, already in the
    /// opponent's perspective. A missing next state, a terminal step, or a
    /// next state without legal actions all bootstrap from zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPosition`] for an action outside `0..9` and
    /// [`Error::InvalidMove`] for an action onto an occupied cell.
    pub fn update(
        &mut self,
        state: &State,
        action: usize,
        reward: f64,
        next_state: Option<&State>,
        terminal: bool,
    ) -> Result<()> {
        if action >= 9 {
            return Err(Error::InvalidPosition { position: action });
        }
        if !state.is_legal(action) {
            return Err(Error::InvalidMove { position: action });
        }

        let context = state.canonical_context();
        let canonical_action = context.map_move_to_canonical(action);

        let bootstrap = match next_state {
            Some(next) if !terminal => self.best_next_value(next),
            _ => 0.0,
        };
        let target = reward - self.gamma * bootstrap;

        let alpha = self.alpha;
        let row = self.table.row_mut(context.state);
        row[canonical_action] += alpha * (target - row[canonical_action]);
        Ok(())
    }

    /// Best value the opponent can expect from `next`, seen in its own
    /// canonical frame. Creates the row for `next` only when it has moves.
    fn best_next_value(&mut self, next: &State) -> f64 {
        let legal = next.legal_actions();
        if legal.is_empty() {
            return 0.0;
        }

        let context = next.canonical_context();
        let canonical_actions: Vec<usize> = legal
            .iter()
            .map(|&action| context.map_move_to_canonical(action))
            .collect();
        self.table.row_mut(context.state);
        self.table
            .max_value(&context.state, &canonical_actions)
            .unwrap_or(0.0)
    }

    /// Terminal update crediting `player`'s move with the final outcome.
    pub fn credit_terminal(
        &mut self,
        state: &State,
        action: usize,
        outcome: GameOutcome,
        player: Player,
    ) -> Result<()> {
        self.update(state, action, outcome.reward_for(player), None, true)
    }

    /// Multiply epsilon by the decay factor, never dropping below the floor.
    ///
    /// A rate already at or under the floor (for example one set by hand) is
    /// left alone.
    pub fn decay_epsilon(&mut self) {
        if self.epsilon > self.epsilon_min {
            self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Set the exploration rate, clamped into `[0, 1]`.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = if epsilon.is_nan() {
            0.0
        } else {
            epsilon.clamp(0.0, 1.0)
        };
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Number of canonical states with a row
    pub fn table_size(&self) -> usize {
        self.table.len()
    }

    /// Stored values for `state`, rearranged into the caller's orientation.
    ///
    /// Returns `None` if the canonical state has no row yet.
    pub fn action_values(&self, state: &State) -> Option<ActionValues> {
        let context = state.canonical_context();
        let row = self.table.get(&context.state)?;
        let mut values = [0.0; 9];
        for (action, value) in values.iter_mut().enumerate() {
            *value = row[context.map_move_to_canonical(action)];
        }
        Some(values)
    }

    /// Snapshot of the table and current exploration rate.
    pub fn snapshot(&self) -> SavedQTable {
        SavedQTable::new(&self.table, self.epsilon)
    }

    /// Replace the table and exploration rate with a snapshot's.
    pub fn restore(&mut self, snapshot: &SavedQTable) -> Result<()> {
        self.table = snapshot.to_table()?;
        self.set_epsilon(snapshot.epsilon);
        Ok(())
    }

    /// Persist the whole table through the bound storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageNotConfigured`] if no storage is bound, or the
    /// repository's error if writing fails.
    pub fn save(&self) -> Result<()> {
        let storage = self.storage.as_ref().ok_or(Error::StorageNotConfigured)?;
        storage.repository.save(&self.snapshot(), &storage.path)?;
        info!(
            path = %storage.path.display(),
            states = self.table.len(),
            epsilon = self.epsilon,
            "saved value table"
        );
        Ok(())
    }

    /// Replace the table with the stored one.
    ///
    /// Missing, unreadable or corrupt storage is not an error: the agent
    /// continues with an empty table and a warning is logged.
    pub fn load(&mut self) {
        let Some(storage) = self.storage.clone() else {
            warn!("no table storage configured, starting with an empty table");
            self.table.clear();
            return;
        };

        let restored = storage
            .repository
            .load(&storage.path)
            .and_then(|snapshot| self.restore(&snapshot));

        match restored {
            Ok(()) => info!(
                path = %storage.path.display(),
                states = self.table.len(),
                epsilon = self.epsilon,
                "loaded value table"
            ),
            Err(error) => {
                warn!(
                    path = %storage.path.display(),
                    %error,
                    "could not load value table, starting with an empty table"
                );
                self.table.clear();
            }
        }
        debug!(states = self.table.len(), "table ready");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRepository;

    fn state(values: [i8; 9]) -> State {
        State::from_values(&values).unwrap()
    }

    fn agent() -> QLearningAgent {
        QLearningAgent::new(AgentConfig::default().with_seed(7)).unwrap()
    }

    fn stored_agent(repo: &InMemoryRepository) -> QLearningAgent {
        let storage = TableStorage::new(Arc::new(repo.clone()), "table");
        agent().with_storage(storage)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AgentConfig::default().with_alpha(2.0);
        assert!(matches!(
            QLearningAgent::new(config),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_choose_on_full_board_fails() {
        let mut agent = agent();
        let full = state([1, -1, 1, 1, -1, -1, -1, 1, 1]);
        assert!(matches!(
            agent.choose_action(&full, None),
            Err(Error::NoValidMoves)
        ));
    }

    #[test]
    fn test_greedy_choice_maps_back_to_caller_orientation() {
        let mut agent = agent();
        let s = state([0, 0, 1, 0, -1, 0, 0, 0, 0]);
        let context = s.canonical_context();
        agent.table.row_mut(context.state)[context.map_move_to_canonical(5)] = 1.0;

        assert_eq!(agent.choose_action(&s, Some(0.0)).unwrap(), 5);
    }

    #[test]
    fn test_choosing_does_not_create_rows() {
        let mut agent = agent();
        agent.choose_action(&State::EMPTY, Some(0.0)).unwrap();
        agent.choose_action(&State::EMPTY, Some(1.0)).unwrap();
        assert_eq!(agent.table_size(), 0);
    }

    #[test]
    fn test_exploration_only_picks_legal_cells() {
        let mut agent = agent();
        let s = state([1, 0, -1, 0, 1, 0, -1, 0, 0]);
        for _ in 0..200 {
            let action = agent.choose_action(&s, Some(1.0)).unwrap();
            assert!(s.is_legal(action));
        }
    }

    #[test]
    fn test_terminal_updates_approach_reward() {
        let mut agent = agent();
        let s = state([1, 1, 0, -1, -1, 0, 0, 0, 0]);
        let mut previous = 0.0;
        for _ in 0..20 {
            agent.update(&s, 2, 1.0, None, true).unwrap();
            let q = agent.action_values(&s).unwrap()[2];
            assert!(q > previous && q < 1.0);
            previous = q;
        }
    }

    #[test]
    fn test_bootstrap_is_subtracted() {
        let config = AgentConfig::default().with_alpha(1.0).with_gamma(0.5);
        let mut agent = QLearningAgent::new(config).unwrap();

        let s = State::EMPTY;
        // After the mover takes the centre, the opponent sees -1 there
        let next = state([0, 0, 0, 0, -1, 0, 0, 0, 0]);
        let next_context = next.canonical_context();
        agent.table.row_mut(next_context.state)[next_context.map_move_to_canonical(0)] = 0.8;

        agent.update(&s, 4, 0.0, Some(&next), false).unwrap();
        assert!((agent.action_values(&s).unwrap()[4] + 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_terminal_flag_ignores_next_state() {
        let config = AgentConfig::default().with_alpha(1.0);
        let mut agent = QLearningAgent::new(config).unwrap();
        let next = state([0, 0, 0, 0, -1, 0, 0, 0, 0]);
        agent
            .table
            .row_mut(next.canonical())
            .iter_mut()
            .for_each(|q| *q = 0.9);

        agent.update(&State::EMPTY, 4, 1.0, Some(&next), true).unwrap();
        assert_eq!(agent.action_values(&State::EMPTY).unwrap()[4], 1.0);
    }

    #[test]
    fn test_full_next_state_gets_no_row() {
        let mut agent = agent();
        let s = state([1, -1, 1, 1, -1, -1, -1, 1, 0]);
        let next = state([-1, 1, -1, -1, 1, 1, 1, -1, -1]);
        agent.update(&s, 8, 0.0, Some(&next), false).unwrap();
        assert_eq!(agent.table_size(), 1);
    }

    #[test]
    fn test_update_rejects_bad_actions() {
        let mut agent = agent();
        let s = state([1, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(matches!(
            agent.update(&s, 9, 1.0, None, true),
            Err(Error::InvalidPosition { position: 9 })
        ));
        assert!(matches!(
            agent.update(&s, 0, 1.0, None, true),
            Err(Error::InvalidMove { position: 0 })
        ));
        assert_eq!(agent.table_size(), 0);
    }

    #[test]
    fn test_symmetric_states_share_a_row() {
        let mut agent = agent();
        let corner = state([1, 0, 0, 0, 0, 0, 0, 0, 0]);
        let mirrored = state([0, 0, 1, 0, 0, 0, 0, 0, 0]);

        agent.update(&corner, 4, 1.0, None, true).unwrap();
        assert_eq!(agent.table_size(), 1);
        assert_eq!(
            agent.action_values(&corner).unwrap()[4],
            agent.action_values(&mirrored).unwrap()[4]
        );
    }

    #[test]
    fn test_credit_terminal_uses_outcome_for_player() {
        let config = AgentConfig::default().with_alpha(1.0);
        let mut agent = QLearningAgent::new(config).unwrap();
        let s = state([1, 1, 0, -1, -1, 0, 0, 0, 0]);

        agent
            .credit_terminal(&s, 6, GameOutcome::Win(Player::O), Player::X)
            .unwrap();
        assert_eq!(agent.action_values(&s).unwrap()[6], -1.0);
    }

    #[test]
    fn test_decay_respects_floor() {
        let config = AgentConfig::default()
            .with_epsilon(0.5)
            .with_epsilon_min(0.1)
            .with_epsilon_decay(0.5);
        let mut agent = QLearningAgent::new(config).unwrap();

        agent.decay_epsilon();
        assert_eq!(agent.epsilon(), 0.25);
        for _ in 0..10 {
            agent.decay_epsilon();
            assert!(agent.epsilon() >= 0.1);
        }
        assert_eq!(agent.epsilon(), 0.1);
    }

    #[test]
    fn test_set_epsilon_clamps() {
        let mut agent = agent();
        agent.set_epsilon(1.7);
        assert_eq!(agent.epsilon(), 1.0);
        agent.set_epsilon(-0.3);
        assert_eq!(agent.epsilon(), 0.0);
    }

    #[test]
    fn test_save_without_storage_fails() {
        assert!(matches!(agent().save(), Err(Error::StorageNotConfigured)));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let repo = InMemoryRepository::new();
        let mut trained = stored_agent(&repo);
        trained.update(&State::EMPTY, 4, 1.0, None, true).unwrap();
        trained.set_epsilon(0.05);
        trained.save().unwrap();

        let mut fresh = stored_agent(&repo);
        fresh.load();
        assert_eq!(fresh.table(), trained.table());
        assert_eq!(fresh.epsilon(), 0.05);
    }

    #[test]
    fn test_load_corrupt_storage_yields_empty_table() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(std::path::Path::new("table"), b"garbage".to_vec());

        let mut agent = stored_agent(&repo);
        agent.update(&State::EMPTY, 0, 1.0, None, true).unwrap();
        agent.load();
        assert_eq!(agent.table_size(), 0);
    }

    #[test]
    fn test_load_missing_storage_yields_empty_table() {
        let repo = InMemoryRepository::new();
        let mut agent = stored_agent(&repo);
        agent.load();
        assert_eq!(agent.table_size(), 0);
    }
}
