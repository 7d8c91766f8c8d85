//! Training and evaluation pipelines
//!
//! - Training drivers (self-play, against minimax)
//! - Bot-versus-bot arena matches
//! - Observers for progress reporting

pub mod arena;
pub mod observers;
pub mod training;

pub use arena::{ArenaReport, GreedyAgent, MinimaxPlayer, RandomPlayer, play_match};
pub use observers::ProgressObserver;
pub use training::{
    MinimaxTrainingReport, SelfPlayReport, TrainingReport, self_play, train_vs_minimax,
};

pub use crate::ports::{MoveSelector, TrainingObserver};
