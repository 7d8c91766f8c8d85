//! Shared helpers for the integration tests.

#![allow(dead_code)]

use rand::{Rng, rngs::StdRng};
use tictactoe_rl::{
    QLearningAgent,
    pipeline::{GreedyAgent, MinimaxPlayer, play_match},
    tictactoe::{Board, Player},
};

/// Play random legal moves from the empty board (random opener) and stop at a
/// random non-terminal position. Returns the board and the side to move.
pub fn random_decision_position(rng: &mut StdRng) -> (Board, Player) {
    let mut board = Board::new();
    let mut mover = if rng.random::<bool>() { Player::X } else { Player::O };
    let stop_after = rng.random_range(0..9);

    for _ in 0..stop_after {
        let legal = board.legal_actions();
        let action = legal[rng.random_range(0..legal.len())];
        let next = board.place(action, mover).unwrap();
        if next.is_terminal() {
            break;
        }
        board = next;
        mover = mover.opponent();
    }

    (board, mover)
}

/// Fraction of drawn games when the greedy agent meets minimax once on each side.
pub fn greedy_draw_rate_vs_minimax(agent: &QLearningAgent) -> f64 {
    let as_x = play_match(&mut GreedyAgent::new(agent), &mut MinimaxPlayer::new(), 1);
    let as_o = play_match(&mut MinimaxPlayer::new(), &mut GreedyAgent::new(agent), 1);
    (as_x.draws + as_o.draws) as f64 / 2.0
}
