//! Tic-tac-toe with an exact minimax solver and a symmetry-aware Q-learning agent
//!
//! This crate provides:
//! - Board model with absolute and mover-relative (perspective) encodings
//! - D4 symmetry engine for canonicalizing states and mapping actions
//! - Memoized negamax solver with a deterministic tie-break
//! - Tabular Q-learning agent with zero-sum TD updates and persistence
//! - Training drivers (self-play, against minimax) and bot-versus-bot arenas

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod minimax;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;

pub use error::{Error, Result};
pub use minimax::{MinimaxSolver, minimax_best_move};
pub use q_learning::QLearningAgent;
pub use tictactoe::{Board, GameOutcome, Player, State};
