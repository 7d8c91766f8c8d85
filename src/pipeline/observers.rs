//! Observers for training runs

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Error, Result,
    ports::TrainingObserver,
    tictactoe::{GameOutcome, Player},
};

/// Progress bar observer - Shows training progress with a running X/O/draw tally
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    hidden: bool,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
}

impl ProgressObserver {
    /// Create a new progress observer drawing to stderr
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            hidden: false,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
        }
    }

    /// Observer that keeps the tally but draws nothing
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::new()
        }
    }

    /// (X wins, O wins, draws) seen so far
    pub fn tally(&self) -> (usize, usize, usize) {
        (self.x_wins, self.o_wins, self.draws)
    }

    fn message(&self) -> String {
        format!("X:{} O:{} D:{}", self.x_wins, self.o_wins, self.draws)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingObserver for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = if self.hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total_episodes as u64)
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, outcome: GameOutcome, _moves: usize) -> Result<()> {
        match outcome {
            GameOutcome::Win(Player::X) => self.x_wins += 1,
            GameOutcome::Win(Player::O) => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_observer_tallies_outcomes() {
        let mut observer = ProgressObserver::hidden();
        observer.on_training_start(3).unwrap();
        observer
            .on_episode_end(0, GameOutcome::Win(Player::X), 5)
            .unwrap();
        observer.on_episode_end(1, GameOutcome::Draw, 9).unwrap();
        observer.on_episode_end(2, GameOutcome::Draw, 9).unwrap();
        observer.on_training_end().unwrap();

        assert_eq!(observer.tally(), (1, 0, 2));
    }
}
