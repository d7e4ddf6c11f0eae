use rand::Rng;

use super::board::Board;
use super::state::{Position, Snake};

/// Rejection-sampling attempts per board cell before falling back to an
/// exhaustive scan
///
/// Occupancy is normally far below the cell count, so sampling succeeds
/// almost immediately; the cap keeps placement bounded on crowded boards.
const SAMPLE_ATTEMPTS_PER_CELL: usize = 4;

/// Pick a random cell that is not occupied by the snake
///
/// Samples uniformly at random, then falls back to a uniform pick over the
/// remaining free cells once the board gets crowded. Returns `None` only
/// when the snake covers the whole board.
pub fn spawn_avoiding<R: Rng>(rng: &mut R, board: Board, snake: &Snake) -> Option<Position> {
    let attempts = SAMPLE_ATTEMPTS_PER_CELL * board.cell_count();

    for _ in 0..attempts {
        let position = Position::new(
            rng.gen_range(0..board.columns) as i32,
            rng.gen_range(0..board.rows) as i32,
        );

        if !snake.contains(position) {
            return Some(position);
        }
    }

    let free: Vec<Position> = board.cells().filter(|cell| !snake.contains(*cell)).collect();

    if free.is_empty() {
        None
    } else {
        Some(free[rng.gen_range(0..free.len())])
    }
}
