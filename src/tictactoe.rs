//! Tic-Tac-Toe board model and symmetry engine

pub mod board;
pub mod game;
pub mod game_tree;
pub mod lines;
pub mod state;
pub mod symmetry;

pub use board::{Board, Cell, Player};
pub use game::GameOutcome;
pub use game_tree::{
    Position, canonical_decision_states, reachable_decision_states, reachable_positions,
};
pub use lines::{LineAnalyzer, WINNING_LINES};
pub use state::State;
pub use symmetry::{CanonicalContext, D4Transform, canonicalize};
