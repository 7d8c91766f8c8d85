//! Bot-versus-bot matches and the players that take part in them

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    Error, Result,
    minimax::MinimaxSolver,
    ports::MoveSelector,
    q_learning::QLearningAgent,
    tictactoe::{Board, GameOutcome, Player},
};

/// Greedy (ε = 0) view of a trained agent.
///
/// Holds a shared borrow, so one agent can sit on both sides of a match.
#[derive(Debug, Clone, Copy)]
pub struct GreedyAgent<'a> {
    agent: &'a QLearningAgent,
}

impl<'a> GreedyAgent<'a> {
    pub fn new(agent: &'a QLearningAgent) -> Self {
        Self { agent }
    }
}

impl MoveSelector for GreedyAgent<'_> {
    fn select_move(&mut self, board: &Board, mover: Player) -> Result<usize> {
        self.agent.greedy_action(&board.to_perspective(mover))
    }

    fn name(&self) -> &str {
        "rl"
    }
}

/// Perfect player backed by a memoizing solver.
#[derive(Debug, Clone, Default)]
pub struct MinimaxPlayer {
    solver: MinimaxSolver,
}

impl MinimaxPlayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MoveSelector for MinimaxPlayer {
    fn select_move(&mut self, board: &Board, mover: Player) -> Result<usize> {
        self.solver.best_move(board, mover)
    }

    fn name(&self) -> &str {
        "minimax"
    }
}

/// Uniformly random legal moves.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { rng }
    }
}

impl MoveSelector for RandomPlayer {
    fn select_move(&mut self, board: &Board, _mover: Player) -> Result<usize> {
        board
            .legal_actions()
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoValidMoves)
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Tally of a match, from X's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaReport {
    pub x: String,
    pub o: String,
    pub games: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub avg_moves: f64,
    /// Games aborted by a failing or illegal selector; also counted as draws
    pub errors: usize,
    pub last_error: Option<String>,
}

impl ArenaReport {
    pub fn draw_rate(&self) -> f64 {
        self.draws as f64 / self.games.max(1) as f64
    }
}

/// Play `games` games from the empty board with X moving first.
///
/// A selector that fails or names an unplayable cell ends that game, which
/// then counts as a draw and as an error.
pub fn play_match(
    x: &mut dyn MoveSelector,
    o: &mut dyn MoveSelector,
    games: usize,
) -> ArenaReport {
    let mut report = ArenaReport {
        x: x.name().to_string(),
        o: o.name().to_string(),
        games,
        x_wins: 0,
        o_wins: 0,
        draws: 0,
        avg_moves: 0.0,
        errors: 0,
        last_error: None,
    };
    let mut total_moves = 0;

    for _ in 0..games {
        let (result, moves) = play_game(x, o);
        total_moves += moves;
        match result {
            Ok(GameOutcome::Win(Player::X)) => report.x_wins += 1,
            Ok(GameOutcome::Win(Player::O)) => report.o_wins += 1,
            Ok(GameOutcome::Draw) => report.draws += 1,
            Err(error) => {
                warn!(%error, "arena game aborted");
                report.errors += 1;
                report.draws += 1;
                report.last_error = Some(error.to_string());
            }
        }
    }

    report.avg_moves = total_moves as f64 / games.max(1) as f64;
    info!(
        x = %report.x,
        o = %report.o,
        games,
        x_wins = report.x_wins,
        o_wins = report.o_wins,
        draws = report.draws,
        "arena finished"
    );
    report
}

fn play_game(x: &mut dyn MoveSelector, o: &mut dyn MoveSelector) -> (Result<GameOutcome>, usize) {
    let mut board = Board::new();
    let mut mover = Player::X;
    let mut moves = 0;

    loop {
        if let Some(outcome) = board.outcome() {
            return (Ok(outcome), moves);
        }

        let selected = match mover {
            Player::X => x.select_move(&board, mover),
            Player::O => o.select_move(&board, mover),
        };
        let placed = selected.and_then(|action| board.place(action, mover));
        match placed {
            Ok(next) => board = next,
            Err(error) => return (Err(error), moves),
        }

        moves += 1;
        mover = mover.opponent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AgentConfig;

    /// Always asks for the same cell, legal or not
    struct Stubborn(usize);

    impl MoveSelector for Stubborn {
        fn select_move(&mut self, _board: &Board, _mover: Player) -> Result<usize> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "stubborn"
        }
    }

    #[test]
    fn test_minimax_mirror_match_is_all_draws() {
        let mut x = MinimaxPlayer::new();
        let mut o = MinimaxPlayer::new();
        let report = play_match(&mut x, &mut o, 3);

        assert_eq!(report.draws, 3);
        assert_eq!(report.avg_moves, 9.0);
        assert_eq!(report.errors, 0);
    }

    #[test]
    fn test_minimax_never_loses_to_random() {
        let mut x = RandomPlayer::new(Some(11));
        let mut o = MinimaxPlayer::new();
        let report = play_match(&mut x, &mut o, 50);
        assert_eq!(report.x_wins, 0);
        assert_eq!(report.games, 50);
    }

    #[test]
    fn test_illegal_move_counts_as_draw_and_error() {
        let mut x = Stubborn(4);
        let mut o = Stubborn(4);
        let report = play_match(&mut x, &mut o, 2);

        assert_eq!(report.errors, 2);
        assert_eq!(report.draws, 2);
        assert_eq!(report.avg_moves, 1.0);
        assert!(report.last_error.is_some());
    }

    #[test]
    fn test_same_agent_on_both_sides() {
        let agent = QLearningAgent::new(AgentConfig::default().with_seed(1)).unwrap();
        let mut x = GreedyAgent::new(&agent);
        let mut o = GreedyAgent::new(&agent);
        let report = play_match(&mut x, &mut o, 1);

        // Untrained greedy play fills cells in index order, so X wins with 2-4-6
        assert_eq!(report.x_wins, 1);
        assert_eq!(report.avg_moves, 7.0);
    }
}
