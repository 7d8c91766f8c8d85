//! Tic-tac-toe Q-learning CLI
//!
//! - Train the agent by self-play or against minimax
//! - Run bot-versus-bot arenas
//! - Ask a bot for its move on a board
//! - Inspect or set the stored exploration rate

use anyhow::Result;
use clap::{Parser, Subcommand};
use tictactoe_rl::cli::commands::{arena, epsilon, next_move, train};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "tictactoe")]
#[command(version, about = "Tic-tac-toe minimax solver and Q-learning agent", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent and save its value table
    Train(train::TrainArgs),

    /// Play bot-versus-bot games
    Arena(arena::ArenaArgs),

    /// Print a bot's move for a board
    Move(next_move::MoveArgs),

    /// Show or set the stored exploration rate
    Epsilon(epsilon::EpsilonArgs),
}

fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Train(args) => train::execute(args),
        Commands::Arena(args) => arena::execute(args),
        Commands::Move(args) => next_move::execute(args),
        Commands::Epsilon(args) => epsilon::execute(args),
    }
}
