//! Subcommand implementations
//!
//! Each module exposes an `Args` struct parsed by clap and an `execute`
//! function returning `anyhow::Result`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::{app::AgentConfig, tictactoe::Player};

pub mod arena;
pub mod epsilon;
pub mod next_move;
pub mod train;

/// Table file used when `--table` is not given
pub const DEFAULT_TABLE: &str = "qtable.msgpack";

/// Agent configuration from an optional JSON file, else the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<AgentConfig> {
    match path {
        Some(path) => AgentConfig::from_json_file(path)
            .with_context(|| format!("failed to read agent config {}", path.display())),
        None => Ok(AgentConfig::default()),
    }
}

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    Player::parse(value).with_context(|| format!("invalid value for {flag}"))
}
