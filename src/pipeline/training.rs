//! Training drivers for the Q-learning agent
//!
//! Both drivers play complete episodes from the empty board, update the agent
//! after each of its own moves and decay epsilon once per episode.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    minimax::MinimaxSolver,
    ports::TrainingObserver,
    q_learning::QLearningAgent,
    tictactoe::{Board, GameOutcome, Player, State},
};

/// Episodes between debug progress lines
const LOG_EVERY: usize = 1000;

fn rate(count: usize, episodes: usize) -> f64 {
    count as f64 / episodes.max(1) as f64
}

/// Statistics of a self-play run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfPlayReport {
    pub episodes: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub x_win_rate: f64,
    pub o_win_rate: f64,
    pub draw_rate: f64,
    pub avg_moves: f64,
    /// Exploration rate after the last episode
    pub epsilon: f64,
    /// Rows in the value table after the last episode
    pub table_size: usize,
}

/// Statistics of a run against the minimax solver, from the agent's side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimaxTrainingReport {
    pub episodes: usize,
    pub agent_wins: usize,
    pub agent_losses: usize,
    pub draws: usize,
    pub agent_win_rate: f64,
    pub agent_loss_rate: f64,
    pub draw_rate: f64,
    pub avg_moves: f64,
    pub epsilon: f64,
    pub table_size: usize,
}

/// Summary of either kind of training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum TrainingReport {
    SelfPlay(SelfPlayReport),
    Minimax(MinimaxTrainingReport),
}

impl TrainingReport {
    /// Save report to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load report from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}

/// Train by playing the agent against itself.
///
/// The starting mark alternates every episode (X on even episodes). Each move
/// is updated toward the opponent's perspective of the resulting position, or
/// credited terminally with `+1` for a win and `0` for a draw.
#[tracing::instrument(skip(agent, observer))]
pub fn self_play(
    agent: &mut QLearningAgent,
    episodes: usize,
    observer: &mut dyn TrainingObserver,
) -> Result<SelfPlayReport> {
    let (mut x_wins, mut o_wins, mut draws) = (0, 0, 0);
    let mut total_moves = 0;

    observer.on_training_start(episodes)?;
    for episode in 0..episodes {
        let first = if episode.is_multiple_of(2) {
            Player::X
        } else {
            Player::O
        };
        let (outcome, moves) = self_play_episode(agent, first)?;

        match outcome {
            GameOutcome::Win(Player::X) => x_wins += 1,
            GameOutcome::Win(Player::O) => o_wins += 1,
            GameOutcome::Draw => draws += 1,
        }
        total_moves += moves;
        agent.decay_epsilon();

        observer.on_episode_end(episode, outcome, moves)?;
        if (episode + 1).is_multiple_of(LOG_EVERY) {
            debug!(
                episode = episode + 1,
                epsilon = agent.epsilon(),
                states = agent.table_size(),
                "self-play progress"
            );
        }
    }
    observer.on_training_end()?;

    let report = SelfPlayReport {
        episodes,
        x_wins,
        o_wins,
        draws,
        x_win_rate: rate(x_wins, episodes),
        o_win_rate: rate(o_wins, episodes),
        draw_rate: rate(draws, episodes),
        avg_moves: rate(total_moves, episodes),
        epsilon: agent.epsilon(),
        table_size: agent.table_size(),
    };
    info!(
        episodes,
        draw_rate = report.draw_rate,
        epsilon = report.epsilon,
        states = report.table_size,
        "self-play finished"
    );
    Ok(report)
}

fn self_play_episode(agent: &mut QLearningAgent, first: Player) -> Result<(GameOutcome, usize)> {
    let mut board = Board::new();
    let mut mover = first;
    let mut moves = 0;

    loop {
        let state = board.to_perspective(mover);
        let action = agent.choose_action(&state, None)?;
        board = board.place(action, mover)?;
        moves += 1;

        if let Some(outcome) = board.outcome() {
            agent.credit_terminal(&state, action, outcome, mover)?;
            return Ok((outcome, moves));
        }

        let next = board.to_perspective(mover.opponent());
        agent.update(&state, action, 0.0, Some(&next), false)?;
        mover = mover.opponent();
    }
}

/// Train against the exact minimax player.
///
/// The agent's mark alternates every two episodes and the starting mark every
/// episode, so all four (mark, starter) pairs recur. Only the agent's moves
/// are updated. When minimax ends the game, the agent's most recent move is
/// credited terminally with the outcome (`-1` for a loss, `0` for a draw).
#[tracing::instrument(skip(agent, solver, observer))]
pub fn train_vs_minimax(
    agent: &mut QLearningAgent,
    solver: &mut MinimaxSolver,
    episodes: usize,
    observer: &mut dyn TrainingObserver,
) -> Result<MinimaxTrainingReport> {
    let (mut agent_wins, mut agent_losses, mut draws) = (0, 0, 0);
    let mut total_moves = 0;

    observer.on_training_start(episodes)?;
    for episode in 0..episodes {
        let first = if episode.is_multiple_of(2) {
            Player::X
        } else {
            Player::O
        };
        let agent_mark = if (episode / 2).is_multiple_of(2) {
            Player::X
        } else {
            Player::O
        };
        let (outcome, moves) = minimax_episode(agent, solver, first, agent_mark)?;

        match outcome {
            GameOutcome::Win(winner) if winner == agent_mark => agent_wins += 1,
            GameOutcome::Win(_) => agent_losses += 1,
            GameOutcome::Draw => draws += 1,
        }
        total_moves += moves;
        agent.decay_epsilon();

        observer.on_episode_end(episode, outcome, moves)?;
        if (episode + 1).is_multiple_of(LOG_EVERY) {
            debug!(
                episode = episode + 1,
                agent_losses,
                epsilon = agent.epsilon(),
                "minimax training progress"
            );
        }
    }
    observer.on_training_end()?;

    let report = MinimaxTrainingReport {
        episodes,
        agent_wins,
        agent_losses,
        draws,
        agent_win_rate: rate(agent_wins, episodes),
        agent_loss_rate: rate(agent_losses, episodes),
        draw_rate: rate(draws, episodes),
        avg_moves: rate(total_moves, episodes),
        epsilon: agent.epsilon(),
        table_size: agent.table_size(),
    };
    info!(
        episodes,
        draw_rate = report.draw_rate,
        loss_rate = report.agent_loss_rate,
        states = report.table_size,
        "minimax training finished"
    );
    Ok(report)
}

fn minimax_episode(
    agent: &mut QLearningAgent,
    solver: &mut MinimaxSolver,
    first: Player,
    agent_mark: Player,
) -> Result<(GameOutcome, usize)> {
    let mut board = Board::new();
    let mut mover = first;
    let mut moves = 0;
    let mut last_agent_move: Option<(State, usize)> = None;

    loop {
        if let Some(outcome) = board.outcome() {
            if let Some((state, action)) = last_agent_move {
                agent.credit_terminal(&state, action, outcome, agent_mark)?;
            }
            return Ok((outcome, moves));
        }

        if mover == agent_mark {
            let state = board.to_perspective(mover);
            let action = agent.choose_action(&state, None)?;
            board = board.place(action, mover)?;
            moves += 1;

            if let Some(outcome) = board.outcome() {
                agent.credit_terminal(&state, action, outcome, mover)?;
                return Ok((outcome, moves));
            }

            let next = board.to_perspective(mover.opponent());
            agent.update(&state, action, 0.0, Some(&next), false)?;
            last_agent_move = Some((state, action));
        } else {
            let action = solver.best_move(&board, mover)?;
            board = board.place(action, mover)?;
            moves += 1;
        }
        mover = mover.opponent();
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::{app::AgentConfig, ports::NullObserver};

    fn agent(seed: u64) -> QLearningAgent {
        QLearningAgent::new(AgentConfig::default().with_seed(seed)).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        started: Option<usize>,
        lengths: Vec<usize>,
        finished: bool,
    }

    impl TrainingObserver for Recorder {
        fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
            self.started = Some(total_episodes);
            Ok(())
        }

        fn on_episode_end(&mut self, _episode: usize, _outcome: GameOutcome, moves: usize) -> Result<()> {
            self.lengths.push(moves);
            Ok(())
        }

        fn on_training_end(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn test_self_play_counts_add_up() {
        let mut agent = agent(1);
        let report = self_play(&mut agent, 200, &mut NullObserver).unwrap();

        assert_eq!(report.episodes, 200);
        assert_eq!(report.x_wins + report.o_wins + report.draws, 200);
        assert!((report.x_win_rate + report.o_win_rate + report.draw_rate - 1.0).abs() < 1e-9);
        assert!(report.avg_moves >= 5.0 && report.avg_moves <= 9.0);
        assert_eq!(report.table_size, agent.table_size());
        assert!(report.table_size > 0);
    }

    #[test]
    fn test_self_play_decays_once_per_episode() {
        let config = AgentConfig::default()
            .with_seed(3)
            .with_epsilon(0.5)
            .with_epsilon_min(0.0)
            .with_epsilon_decay(0.9);
        let mut agent = QLearningAgent::new(config).unwrap();
        self_play(&mut agent, 3, &mut NullObserver).unwrap();
        assert!((agent.epsilon() - 0.5 * 0.9f64.powi(3)).abs() < 1e-12);
    }

    #[test]
    fn test_observer_sees_every_episode() {
        let mut agent = agent(2);
        let mut recorder = Recorder::default();
        let report = self_play(&mut agent, 25, &mut recorder).unwrap();

        assert_eq!(recorder.started, Some(25));
        assert_eq!(recorder.lengths.len(), 25);
        assert!(recorder.finished);
        let total: usize = recorder.lengths.iter().sum();
        assert_eq!(report.avg_moves, total as f64 / 25.0);
    }

    #[test]
    fn test_minimax_never_loses_to_learner() {
        let mut agent = agent(4);
        let mut solver = MinimaxSolver::new();
        let report = train_vs_minimax(&mut agent, &mut solver, 40, &mut NullObserver).unwrap();

        assert_eq!(report.agent_wins, 0);
        assert_eq!(report.agent_losses + report.draws, 40);
        assert!(agent.table_size() > 0);
    }

    #[test]
    fn test_zero_episodes() {
        let mut agent = agent(5);
        let report = self_play(&mut agent, 0, &mut NullObserver).unwrap();
        assert_eq!(report.draw_rate, 0.0);
        assert_eq!(report.avg_moves, 0.0);
        assert_eq!(report.table_size, 0);
    }

    #[test]
    fn test_report_json_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut agent = agent(6);
        let report = TrainingReport::SelfPlay(self_play(&mut agent, 10, &mut NullObserver).unwrap());
        report.save(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"mode\": \"self-play\""));
        match TrainingReport::load(&path).unwrap() {
            TrainingReport::SelfPlay(loaded) => {
                assert_eq!(loaded.episodes, 10);
                assert_eq!(loaded.table_size, agent.table_size());
            }
            other => panic!("unexpected report {other:?}"),
        }
    }
}
