//! Tabular Q-learning over canonical perspective states
//!
//! The table stores one row of nine action values per canonical state. States
//! are always presented from the mover's point of view, so a single table
//! serves both marks, and the D4 symmetry fold shares experience between all
//! eight orientations of a position.
//!
//! ## Usage Example
//!
//! ```
//! use tictactoe_rl::app::AgentConfig;
//! use tictactoe_rl::q_learning::QLearningAgent;
//! use tictactoe_rl::tictactoe::State;
//!
//! let mut agent = QLearningAgent::new(AgentConfig::default().with_seed(1))?;
//! let action = agent.choose_action(&State::EMPTY, None)?;
//! agent.update(&State::EMPTY, action, 0.0, None, false)?;
//! agent.decay_epsilon();
//! # Ok::<(), tictactoe_rl::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

pub use agent::{QLearningAgent, TableStorage};
pub use q_table::{ActionValues, QTable};
pub use serialization::SavedQTable;
