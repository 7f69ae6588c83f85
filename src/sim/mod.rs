//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick cadence only
//! - Seeded RNG only
//! - No rendering, file or platform dependencies

pub mod apple;
pub mod grid;
pub mod snake;
pub mod state;
pub mod tick;

pub use apple::{Apple, place};
pub use grid::{Cell, Direction, Grid, ScreenRect};
pub use snake::{Snake, SnakeState};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
