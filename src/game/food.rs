use super::grid::{Cell, Grid};
use super::snake::SnakeBody;
use rand::Rng;
use rand::seq::IteratorRandom;

/// Random draws tried before falling back to scanning for free cells
const MAX_REJECTIONS: usize = 64;

/// Pick a uniformly random cell not occupied by `snake`.
///
/// Rejection sampling covers normal play. Once the body fills most of the grid
/// the free cells are collected and one is chosen directly, which keeps the
/// choice uniform. Returns `None` only when the grid is full.
pub fn place<R: Rng>(grid: &Grid, snake: &SnakeBody, rng: &mut R) -> Option<Cell> {
    for _ in 0..MAX_REJECTIONS {
        let cell = Cell::new(
            rng.gen_range(0..grid.width()),
            rng.gen_range(0..grid.height()),
        );
        if !snake.occupies(cell) {
            return Some(cell);
        }
    }

    grid.cells().filter(|&cell| !snake.occupies(cell)).choose(rng)
}
