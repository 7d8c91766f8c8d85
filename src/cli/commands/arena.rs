//! Arena command - pit two bots against each other

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use super::DEFAULT_TABLE;
use crate::{
    app::{AgentConfig, App},
    cli::output::{format_number, print_kv, print_section},
    pipeline::{ArenaReport, GreedyAgent, MinimaxPlayer, MoveSelector, RandomPlayer, play_match},
    q_learning::QLearningAgent,
};

/// Most games a single arena run will play
pub const MAX_GAMES: usize = 5000;

/// Kind of bot in an arena seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Contender {
    /// Trained agent, greedy (no exploration)
    Rl,
    /// Exact minimax player
    Minimax,
    /// Uniformly random legal moves
    Random,
}

#[derive(Parser, Debug)]
#[command(about = "Play bot-versus-bot games")]
pub struct ArenaArgs {
    /// Bot playing X (moves first)
    #[arg(long, value_enum, default_value_t = Contender::Rl)]
    pub x: Contender,

    /// Bot playing O
    #[arg(long, value_enum, default_value_t = Contender::Minimax)]
    pub o: Contender,

    /// Number of games (1 to 5000)
    #[arg(long, short = 'g', default_value_t = 50)]
    pub games: usize,

    /// Value table used by `rl` bots
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: PathBuf,

    /// Seed for `random` bots
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

fn contender<'a>(
    kind: Contender,
    agent: &'a QLearningAgent,
    seed: Option<u64>,
) -> Box<dyn MoveSelector + 'a> {
    match kind {
        Contender::Rl => Box::new(GreedyAgent::new(agent)),
        Contender::Minimax => Box::new(MinimaxPlayer::new()),
        Contender::Random => Box::new(RandomPlayer::new(seed)),
    }
}

/// Load whatever the seats need and play the match.
pub fn run(args: &ArenaArgs) -> Result<ArenaReport> {
    let app = App::new();
    let agent = if args.x == Contender::Rl || args.o == Contender::Rl {
        app.open_agent(AgentConfig::default(), &args.table)?
    } else {
        app.create_agent(AgentConfig::default())?
    };

    let games = args.games.clamp(1, MAX_GAMES);
    let mut x = contender(args.x, &agent, args.seed);
    let mut o = contender(args.o, &agent, args.seed.map(|s| s.wrapping_add(1)));
    Ok(play_match(x.as_mut(), o.as_mut(), games))
}

pub fn execute(args: ArenaArgs) -> Result<()> {
    let report = run(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_section(&format!("Arena: {} (X) vs {} (O)", report.x, report.o));
    print_kv("Games", &format_number(report.games));
    print_kv("X wins", &report.x_wins.to_string());
    print_kv("O wins", &report.o_wins.to_string());
    print_kv(
        "Draws",
        &format!("{} ({:.1}%)", report.draws, report.draw_rate() * 100.0),
    );
    print_kv("Avg moves", &format!("{:.2}", report.avg_moves));
    if report.errors > 0 {
        print_kv("Errors", &report.errors.to_string());
        if let Some(error) = &report.last_error {
            print_kv("Last error", error);
        }
    }
    Ok(())
}
