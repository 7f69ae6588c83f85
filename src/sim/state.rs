//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::apple::{self, Apple};
use super::grid::Grid;
use super::snake::Snake;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Snake hit itself; the board is rebuilt on the next reset
    Resetting,
    /// Every cell is snake. Terminal.
    Won,
}

/// Things that happened during a tick, for the orchestrator to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    AppleEaten { length: usize },
    Collided { length: usize },
    Won { length: usize },
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub grid: Grid,
    pub snake: Snake,
    pub apple: Apple,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Number of resets so far (bumps whenever the board is rebuilt)
    pub resets: u32,
    rng: Pcg32,
}

impl GameState {
    /// Create a new game on the standard board
    pub fn new(seed: u64) -> Self {
        Self::with_grid(Grid::DEFAULT, seed)
    }

    /// Create a new game on an arbitrary board
    pub fn with_grid(grid: Grid, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let snake = Snake::new(grid.center());
        let position = apple::place(&grid, &snake.cells(), &mut rng).unwrap_or(grid.center());

        Self {
            seed,
            grid,
            snake,
            apple: Apple { position },
            phase: GamePhase::Running,
            time_ticks: 0,
            resets: 0,
            rng,
        }
    }

    /// Fresh snake, fresh apple, back to running
    pub fn reset(&mut self) {
        self.snake.reset(self.grid.center());
        self.place_apple();
        self.phase = GamePhase::Running;
        self.resets += 1;
    }

    /// Move the apple to a random free cell. Returns false if the board is full.
    pub fn place_apple(&mut self) -> bool {
        match apple::place(&self.grid, &self.snake.cells(), &mut self.rng) {
            Some(position) => {
                self.apple.position = position;
                true
            }
            None => false,
        }
    }

    /// True once the snake's target length covers the board
    pub fn board_full(&self) -> bool {
        self.snake.length() >= self.grid.cell_count() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;

    #[test]
    fn test_new_state() {
        let state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.snake.head(), Cell::new(16, 12));
        assert_ne!(state.apple.position, state.snake.head());
        assert!(state.grid.contains(state.apple.position));
    }

    #[test]
    fn test_same_seed_same_apple() {
        let a = GameState::new(42);
        let b = GameState::new(42);
        assert_eq!(a.apple, b.apple);
    }

    #[test]
    fn test_reset_bumps_generation() {
        let mut state = GameState::new(1);
        state.snake.grow();
        state.phase = GamePhase::Resetting;
        state.reset();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.snake.length(), 1);
        assert_eq!(state.resets, 1);
        assert!(!state.snake.occupies(state.apple.position));
    }
}
