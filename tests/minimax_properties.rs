//! Game-theoretic properties of the minimax solver.

mod common;

use rand::{SeedableRng, rngs::StdRng};
use tictactoe_rl::{
    MinimaxSolver, minimax_best_move,
    pipeline::{MinimaxPlayer, RandomPlayer, play_match},
    tictactoe::{Board, GameOutcome, Player},
};

fn self_game(first: Player) -> (GameOutcome, usize) {
    let mut solver = MinimaxSolver::new();
    let mut board = Board::new();
    let mut mover = first;
    let mut moves = 0;
    loop {
        if let Some(outcome) = board.outcome() {
            return (outcome, moves);
        }
        let action = solver.best_move(&board, mover).unwrap();
        board = board.place(action, mover).unwrap();
        mover = mover.opponent();
        moves += 1;
    }
}

#[test]
fn minimax_against_itself_always_draws() {
    for first in [Player::X, Player::O] {
        let (outcome, moves) = self_game(first);
        assert_eq!(outcome, GameOutcome::Draw, "{first} opening");
        assert_eq!(moves, 9);
    }
}

#[test]
fn tactical_position_completes_the_row() {
    let board = Board::from_values(&[1, 1, 0, -1, -1, 0, 0, 0, 0]).unwrap();
    assert_eq!(minimax_best_move(&board, Player::X).unwrap(), 2);
}

#[test]
fn best_move_preserves_the_position_value() {
    let mut solver = MinimaxSolver::new();
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..300 {
        let (board, mover) = common::random_decision_position(&mut rng);
        let value = solver.value(&board, mover);
        let action = solver.best_move(&board, mover).unwrap();
        let next = board.place(action, mover).unwrap();
        let after = match next.outcome() {
            Some(outcome) => outcome.reward_for(mover) as i8,
            None => -solver.value(&next, mover.opponent()),
        };
        assert_eq!(after, value, "best move {action} does not keep the value");
    }
}

#[test]
fn random_players_never_beat_minimax() {
    for seed in 0..4 {
        let mut random = RandomPlayer::new(Some(seed));
        let mut minimax = MinimaxPlayer::new();
        let as_o = play_match(&mut random, &mut minimax, 25);
        assert_eq!(as_o.x_wins, 0);

        let mut random = RandomPlayer::new(Some(seed + 100));
        let as_x = play_match(&mut minimax, &mut random, 25);
        assert_eq!(as_x.o_wins, 0);
    }
}
