//! Grid geometry for the toroidal board
//!
//! Cells are addressed in grid units. Moving off any edge wraps to the
//! opposite edge of the same row/column.

use rand::Rng;

use crate::consts::*;
use crate::wrap;

/// One grid-aligned position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Pixel rectangle covered by this cell
    pub fn screen_rect(&self) -> ScreenRect {
        ScreenRect {
            x: self.col * CELL_SIZE,
            y: self.row * CELL_SIZE,
            w: CELL_SIZE,
            h: CELL_SIZE,
        }
    }
}

/// Axis-aligned rectangle in screen pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl ScreenRect {
    /// Shrink by `by` pixels on every side
    pub fn inset(&self, by: i32) -> Self {
        Self {
            x: self.x + by,
            y: self.y + by,
            w: (self.w - 2 * by).max(0),
            h: (self.h - 2 * by).max(0),
        }
    }
}

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step as (dcol, drow)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Board dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Grid {
    pub const DEFAULT: Grid = Grid {
        width: GRID_WIDTH,
        height: GRID_HEIGHT,
    };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> u32 {
        (self.width * self.height) as u32
    }

    /// Spawn cell for a fresh snake
    pub fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.col) && (0..self.height).contains(&cell.row)
    }

    /// Neighbor of `cell` in `dir`, wrapping each axis independently
    pub fn step(&self, cell: Cell, dir: Direction) -> Cell {
        let (dc, dr) = dir.delta();
        Cell::new(wrap(cell.col + dc, self.width), wrap(cell.row + dr, self.height))
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |row| (0..width).map(move |col| Cell::new(col, row)))
    }

    /// Uniformly random cell on the board
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        Cell::new(rng.random_range(0..self.width), rng.random_range(0..self.height))
    }
}
