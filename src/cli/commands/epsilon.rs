//! Epsilon command - show or set the stored exploration rate

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::DEFAULT_TABLE;
use crate::{
    app::{AgentConfig, App},
    cli::output::print_kv,
};

#[derive(Parser, Debug)]
#[command(about = "Show or set the exploration rate", allow_negative_numbers = true)]
pub struct EpsilonArgs {
    /// New exploration rate (clamped to [0, 1])
    #[arg(long)]
    pub set: Option<f64>,

    /// Value table holding the rate
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: PathBuf,
}

/// Current (or newly stored) exploration rate.
pub fn run(args: &EpsilonArgs) -> Result<f64> {
    let mut agent = App::new().open_agent(AgentConfig::default(), &args.table)?;
    if let Some(epsilon) = args.set {
        agent.set_epsilon(epsilon);
        agent
            .save()
            .with_context(|| format!("failed to save value table to {}", args.table.display()))?;
    }
    Ok(agent.epsilon())
}

pub fn execute(args: EpsilonArgs) -> Result<()> {
    let epsilon = run(&args)?;
    print_kv("Epsilon", &format!("{epsilon:.4}"));
    Ok(())
}
