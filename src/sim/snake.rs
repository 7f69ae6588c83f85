//! Snake movement state machine
//!
//! The body is an ordered run of unique cells, head first. Growth is driven
//! from outside: `grow()` raises the target length and the next `advance()`
//! keeps its tail instead of dropping it.

use std::collections::{HashSet, VecDeque};

use super::grid::{Cell, Direction, Grid};

/// Outcome of a single `advance()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeState {
    /// Moved, tail followed
    Alive,
    /// Moved without dropping the tail (body is one cell longer)
    Grew,
    /// New head overlaps the body
    Collided,
}

#[derive(Debug, Clone)]
pub struct Snake {
    /// Occupied cells, head at index 0
    body: VecDeque<Cell>,
    /// Length the body is growing toward
    length: usize,
    direction: Direction,
    /// Applied on the next advance so a mid-frame keypress can't flip the body
    pending: Option<Direction>,
    /// Tail cell dropped by the last advance, if any
    last_vacated: Option<Cell>,
}

impl Snake {
    /// One-cell snake at `center` heading right
    pub fn new(center: Cell) -> Self {
        Self {
            body: VecDeque::from([center]),
            length: 1,
            direction: Direction::Right,
            pending: None,
            last_vacated: None,
        }
    }

    /// Build a snake from an explicit body (head first).
    ///
    /// Returns `None` for an empty body or one that repeats a cell.
    pub fn from_body(cells: impl IntoIterator<Item = Cell>, direction: Direction) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        let unique: HashSet<&Cell> = body.iter().collect();
        if body.is_empty() || unique.len() != body.len() {
            return None;
        }
        Some(Self {
            length: body.len(),
            body,
            direction,
            pending: None,
            last_vacated: None,
        })
    }

    /// Queue a turn for the next advance. A reversal of the current heading is ignored.
    pub fn set_pending_direction(&mut self, dir: Direction) {
        if dir != self.direction.opposite() {
            self.pending = Some(dir);
        }
    }

    /// Move one cell along the current heading
    pub fn advance(&mut self, grid: &Grid) -> SnakeState {
        if let Some(dir) = self.pending.take() {
            self.direction = dir;
        }

        let new_head = grid.step(self.head(), self.direction);
        self.body.push_front(new_head);

        let grew = if self.body.len() > self.length {
            self.last_vacated = self.body.pop_back();
            false
        } else {
            self.last_vacated = None;
            true
        };

        if self.self_collided() {
            SnakeState::Collided
        } else if grew {
            SnakeState::Grew
        } else {
            SnakeState::Alive
        }
    }

    /// Raise the target length by one
    pub fn grow(&mut self) {
        self.length += 1;
    }

    pub fn head(&self) -> Cell {
        // body is never empty: constructors seed it and advance pushes before popping
        self.body[0]
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// True when the head sits on any later segment
    pub fn self_collided(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&c| c == head)
    }

    /// Back to a one-cell snake at `center` heading right
    pub fn reset(&mut self, center: Cell) {
        *self = Self::new(center);
    }

    /// Target length
    pub fn length(&self) -> usize {
        self.length
    }

    /// Occupied cells, head first
    pub fn body(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn cells(&self) -> HashSet<Cell> {
        self.body.iter().copied().collect()
    }

    pub fn last_vacated(&self) -> Option<Cell> {
        self.last_vacated
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending
    }
}
