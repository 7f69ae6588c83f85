//! Apple placement

use std::collections::HashSet;

use rand::Rng;

use super::grid::{Cell, Grid};

/// The single apple on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Apple {
    pub position: Cell,
}

/// Pick a uniformly random cell not in `excluded` by rejection sampling.
///
/// Returns `None` only when `excluded` covers the whole board.
pub fn place<R: Rng + ?Sized>(grid: &Grid, excluded: &HashSet<Cell>, rng: &mut R) -> Option<Cell> {
    let free = grid
        .cell_count()
        .saturating_sub(excluded.iter().filter(|c| grid.contains(**c)).count() as u32);
    if free == 0 {
        return None;
    }

    loop {
        let cell = grid.random_cell(rng);
        if !excluded.contains(&cell) {
            return Some(cell);
        }
    }
}
