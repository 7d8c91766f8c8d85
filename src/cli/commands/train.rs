//! Train command - self-play or play against minimax, then save the table

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use super::{DEFAULT_TABLE, load_config};
use crate::{
    app::App,
    cli::output::{format_number, print_kv, print_section},
    minimax::MinimaxSolver,
    pipeline::{ProgressObserver, TrainingReport, self_play, train_vs_minimax},
};

/// Who the agent learns against
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TrainingMode {
    /// The agent plays both sides
    SelfPlay,
    /// The agent plays the exact minimax solver
    Minimax,
}

#[derive(Parser, Debug)]
#[command(about = "Train the Q-learning agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Training opponent
    #[arg(long, value_enum, default_value_t = TrainingMode::SelfPlay)]
    pub mode: TrainingMode,

    /// Number of training episodes
    #[arg(long, short = 'n', default_value_t = 500)]
    pub episodes: usize,

    /// Value table to resume from and save to
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: PathBuf,

    /// JSON file with agent hyperparameters
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the exploration rate before training (clamped to [0, 1])
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name: treat as a directory
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut agent = App::new()
        .open_agent(config, &args.table)
        .context("failed to create agent")?;
    if let Some(epsilon) = args.epsilon {
        agent.set_epsilon(epsilon);
    }

    let mut observer = if args.quiet {
        ProgressObserver::hidden()
    } else {
        ProgressObserver::new()
    };

    let report = match args.mode {
        TrainingMode::SelfPlay => {
            TrainingReport::SelfPlay(self_play(&mut agent, args.episodes, &mut observer)?)
        }
        TrainingMode::Minimax => {
            let mut solver = MinimaxSolver::new();
            TrainingReport::Minimax(train_vs_minimax(
                &mut agent,
                &mut solver,
                args.episodes,
                &mut observer,
            )?)
        }
    };

    agent
        .save()
        .with_context(|| format!("failed to save value table to {}", args.table.display()))?;

    print_report(&report);
    print_kv("Table", &args.table.display().to_string());

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        report
            .save(&path)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        print_kv("Summary", &path.display().to_string());
    }

    Ok(())
}

fn print_report(report: &TrainingReport) {
    match report {
        TrainingReport::SelfPlay(r) => {
            print_section("Self-Play Training");
            print_kv("Episodes", &format_number(r.episodes));
            print_kv("X wins", &format!("{} ({:.1}%)", r.x_wins, r.x_win_rate * 100.0));
            print_kv("O wins", &format!("{} ({:.1}%)", r.o_wins, r.o_win_rate * 100.0));
            print_kv("Draws", &format!("{} ({:.1}%)", r.draws, r.draw_rate * 100.0));
            print_kv("Avg moves", &format!("{:.2}", r.avg_moves));
            print_kv("Epsilon", &format!("{:.4}", r.epsilon));
            print_kv("States", &format_number(r.table_size));
        }
        TrainingReport::Minimax(r) => {
            print_section("Training vs Minimax");
            print_kv("Episodes", &format_number(r.episodes));
            print_kv(
                "Agent wins",
                &format!("{} ({:.1}%)", r.agent_wins, r.agent_win_rate * 100.0),
            );
            print_kv(
                "Agent losses",
                &format!("{} ({:.1}%)", r.agent_losses, r.agent_loss_rate * 100.0),
            );
            print_kv("Draws", &format!("{} ({:.1}%)", r.draws, r.draw_rate * 100.0));
            print_kv("Avg moves", &format!("{:.2}", r.avg_moves));
            print_kv("Epsilon", &format!("{:.4}", r.epsilon));
            print_kv("States", &format_number(r.table_size));
        }
    }
}
