//! Fixed-cadence simulation tick
//!
//! One call = apply queued turns, advance the snake once, then evaluate
//! eat / self-collision / full-board in that order.

use super::grid::Direction;
use super::snake::SnakeState;
use super::state::{GameEvent, GamePhase, GameState};

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Direction keys in the order they were pressed
    pub directions: Vec<Direction>,
    /// Player asked to leave
    pub quit: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match state.phase {
        GamePhase::Won => return events,
        GamePhase::Resetting => state.reset(),
        GamePhase::Running => {}
    }

    for &dir in &input.directions {
        state.snake.set_pending_direction(dir);
    }

    state.time_ticks += 1;
    let moved = state.snake.advance(&state.grid);

    if state.snake.head() == state.apple.position {
        state.snake.grow();
        events.push(GameEvent::AppleEaten {
            length: state.snake.length(),
        });
        log::debug!("Apple eaten, length {}", state.snake.length());

        // A full board has no free cell left; the win check below ends the run
        if !state.board_full() {
            let placed = state.place_apple();
            debug_assert!(placed, "board below capacity must have a free cell");
        }
    } else if moved == SnakeState::Collided {
        events.push(GameEvent::Collided {
            length: state.snake.length(),
        });
        state.phase = GamePhase::Resetting;
    }

    if state.phase == GamePhase::Running && state.board_full() {
        state.phase = GamePhase::Won;
        events.push(GameEvent::Won {
            length: state.snake.length(),
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::{Cell, Grid};
    use crate::sim::snake::Snake;
    use std::collections::HashSet;

    fn apple_ahead(state: &mut GameState) {
        let dir = state.snake.pending_direction().unwrap_or(state.snake.direction());
        state.apple.position = state.grid.step(state.snake.head(), dir);
    }

    /// Boustrophedon walk covering every cell; consecutive cells are adjacent
    fn serpentine(grid: &Grid) -> Vec<Cell> {
        (0..grid.height)
            .flat_map(|row| {
                let cols: Vec<i32> = if row % 2 == 0 {
                    (0..grid.width).collect()
                } else {
                    (0..grid.width).rev().collect()
                };
                cols.into_iter().map(move |col| Cell::new(col, row))
            })
            .collect()
    }

    #[test]
    fn test_three_eats_from_fresh_start() {
        let mut state = GameState::new(12345);
        assert_eq!(state.snake.length(), 1);

        for expected in 2..=4 {
            apple_ahead(&mut state);
            let events = tick(&mut state, &TickInput::default());
            assert_eq!(events, vec![GameEvent::AppleEaten { length: expected }]);
        }
        assert_eq!(state.snake.length(), 4);

        // The last eat shows up in the body on the following advance
        state.apple.position = Cell::new(0, 0);
        let events = tick(&mut state, &TickInput::default());
        assert!(events.is_empty());
        let body: Vec<Cell> = state.snake.body().collect();
        assert_eq!(body.len(), 4);
        assert_eq!(body.iter().collect::<HashSet<_>>().len(), 4);
        assert!(!state.snake.self_collided());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_apple_replaced_off_snake() {
        let mut state = GameState::new(777);
        for _ in 0..5 {
            apple_ahead(&mut state);
            tick(&mut state, &TickInput::default());
            assert!(!state.snake.occupies(state.apple.position));
        }
    }

    #[test]
    fn test_reverse_input_ignored() {
        let mut state = GameState::new(5);
        state.snake = Snake::from_body(
            [Cell::new(10, 3), Cell::new(9, 3), Cell::new(8, 3)],
            Direction::Right,
        )
        .expect("valid body");
        state.apple.position = Cell::new(0, 20);

        let input = TickInput {
            directions: vec![Direction::Left],
            quit: false,
        };
        tick(&mut state, &input);
        assert_eq!(state.snake.head(), Cell::new(11, 3));
    }

    #[test]
    fn test_turn_sequence_checked_against_current_heading() {
        let mut state = GameState::new(5);
        state.apple.position = Cell::new(0, 0);
        // Heading right: Up is accepted, Left is still a reversal of Right
        let input = TickInput {
            directions: vec![Direction::Up, Direction::Left],
            quit: false,
        };
        tick(&mut state, &input);
        assert_eq!(state.snake.direction(), Direction::Up);
    }

    #[test]
    fn test_collision_resets_next_tick() {
        let mut state = GameState::new(9);
        state.snake = Snake::from_body(
            [
                Cell::new(5, 5),
                Cell::new(5, 6),
                Cell::new(6, 6),
                Cell::new(6, 5),
                Cell::new(6, 4),
            ],
            Direction::Up,
        )
        .expect("valid body");
        state.apple.position = Cell::new(20, 20);

        let input = TickInput {
            directions: vec![Direction::Right],
            quit: false,
        };
        let events = tick(&mut state, &input);
        assert_eq!(events, vec![GameEvent::Collided { length: 5 }]);
        assert_eq!(state.phase, GamePhase::Resetting);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.snake.body().count(), 1);
        assert_eq!(state.resets, 1);
    }

    #[test]
    fn test_chasing_tail_is_not_a_collision() {
        let mut state = GameState::new(9);
        state.snake = Snake::from_body(
            [Cell::new(5, 5), Cell::new(6, 5), Cell::new(6, 6), Cell::new(5, 6)],
            Direction::Left,
        )
        .expect("valid body");
        state.apple.position = Cell::new(20, 20);

        let input = TickInput {
            directions: vec![Direction::Down],
            quit: false,
        };
        assert!(tick(&mut state, &input).is_empty());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.snake.head(), Cell::new(5, 6));
    }

    #[test]
    fn test_win_on_last_free_cell() {
        let grid = Grid::DEFAULT;
        let path = serpentine(&grid);
        let n = path.len();
        assert_eq!(n as u32, grid.cell_count());

        let mut state = GameState::new(3);
        // Head on the second to last cell, heading toward the last one
        state.snake = Snake::from_body(path[..n - 1].iter().rev().copied(), Direction::Left)
            .expect("valid body");
        state.apple.position = path[n - 1];
        assert_eq!(state.snake.length(), n - 1);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(
            events,
            vec![
                GameEvent::AppleEaten { length: n },
                GameEvent::Won { length: n },
            ]
        );
        assert_eq!(state.phase, GamePhase::Won);

        // Terminal
        assert!(tick(&mut state, &TickInput::default()).is_empty());
    }

    #[test]
    fn test_win_on_tiny_board() {
        let grid = Grid::new(2, 1);
        let mut state = GameState::with_grid(grid, 0);
        assert_eq!(state.snake.head(), Cell::new(1, 0));
        assert_eq!(state.apple.position, Cell::new(0, 0));

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(events.last(), Some(&GameEvent::Won { length: 2 }));
    }
}
