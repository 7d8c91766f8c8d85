//! Command-line interface for training and querying the agent

pub mod commands;
pub mod output;
