//! Move command - ask a bot for its move on a given board

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use super::{DEFAULT_TABLE, arena::Contender, parse_player_token};
use crate::{
    app::{AgentConfig, App},
    cli::output::print_kv,
    minimax::MinimaxSolver,
    pipeline::{MoveSelector, RandomPlayer},
    tictactoe::Board,
};

#[derive(Parser, Debug)]
#[command(about = "Print a bot's move for a board")]
pub struct MoveArgs {
    /// Board as nine characters, row by row: X, O and '.' for empty
    #[arg(long, short = 'b')]
    pub board: String,

    /// Side to move (`x` or `o`)
    #[arg(long, short = 'm', default_value = "x")]
    pub mover: String,

    /// Bot answering
    #[arg(long, value_enum, default_value_t = Contender::Rl)]
    pub agent: Contender,

    /// Value table used by the `rl` bot
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: PathBuf,

    /// Also print the board and the values behind the choice
    #[arg(long, short = 'e')]
    pub explain: bool,
}

/// Chosen cell for the parsed board.
pub fn run(args: &MoveArgs) -> Result<usize> {
    let board = Board::from_string(&args.board)?;
    let mover = parse_player_token(&args.mover, "--mover")?;
    if board.is_terminal() {
        bail!("the game on this board is already over");
    }

    let action = match args.agent {
        Contender::Rl => {
            let agent = App::new().open_agent(AgentConfig::default(), &args.table)?;
            let state = board.to_perspective(mover);
            let action = agent.greedy_action(&state)?;
            if args.explain {
                println!("{board}");
                match agent.action_values(&state) {
                    Some(values) => {
                        for cell in state.legal_actions() {
                            print_kv(&format!("Q[{cell}]"), &format!("{:+.4}", values[cell]));
                        }
                    }
                    None => print_kv("Q", "unseen state"),
                }
            }
            action
        }
        Contender::Minimax => {
            let mut solver = MinimaxSolver::new();
            let policy = solver.optimal_policy(&board, mover)?;
            if args.explain {
                println!("{board}");
                print_kv("Value", &policy.value.to_string());
                print_kv("Optimal", &format!("{:?}", policy.optimal_moves));
            }
            solver.best_move(&board, mover)?
        }
        Contender::Random => RandomPlayer::new(None).select_move(&board, mover)?,
    };
    Ok(action)
}

pub fn execute(args: MoveArgs) -> Result<()> {
    let action = run(&args)?;
    println!("{action}");
    Ok(())
}
