//! Observer port - hooks into the training loop
//!
//! Keeps progress reporting and other side channels out of the training
//! drivers themselves.

use crate::{Result, tictactoe::GameOutcome};

/// Observer for training runs.
///
/// Methods are called in order: `on_training_start` once, `on_episode_end`
/// after every episode, then `on_training_end` once.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_rl::{ports::TrainingObserver, tictactoe::GameOutcome};
///
/// struct Counter {
///     draws: usize,
/// }
///
/// impl TrainingObserver for Counter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         outcome: GameOutcome,
///         _moves: usize,
///     ) -> tictactoe_rl::Result<()> {
///         if outcome == GameOutcome::Draw {
///             self.draws += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait TrainingObserver {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode with its outcome and length in moves.
    fn on_episode_end(&mut self, _episode: usize, _outcome: GameOutcome, _moves: usize) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl TrainingObserver for NullObserver {}
