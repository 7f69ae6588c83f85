//! Grid Snake - classic snake on a wraparound board
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, snake, apple, per-tick rules)
//! - `session`: Game orchestration and score persistence
//! - `highscores`: Append-only score log
//! - `renderer`: Canvas contract, scene drawing, WebGPU pipeline
//! - `platform`: Input events, tick pacing, terminal backend
//! - `settings`: Player preferences

pub mod error;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use highscores::{FileScoreLog, MemoryScoreLog, ScoreLog, ScoreRecord};
pub use session::{ExitReason, Flow, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Board size in pixels
    pub const SCREEN_WIDTH: i32 = 640;
    pub const SCREEN_HEIGHT: i32 = 480;
    /// Side of one grid cell in pixels
    pub const CELL_SIZE: i32 = 20;

    /// Board size in cells
    pub const GRID_WIDTH: i32 = SCREEN_WIDTH / CELL_SIZE;
    pub const GRID_HEIGHT: i32 = SCREEN_HEIGHT / CELL_SIZE;

    /// HUD line drawn below the board
    pub const STATUS_BAR_HEIGHT: i32 = CELL_SIZE;

    /// Fixed simulation rate
    pub const TICKS_PER_SECOND: u32 = 10;

    /// How long the "new record" banner stays up (2 seconds)
    pub const NEW_RECORD_NOTICE_TICKS: u32 = 2 * TICKS_PER_SECOND;

    pub const DEFAULT_NICKNAME: &str = "USER";
    pub const DEFAULT_SCORE_FILE: &str = "game_results.csv";
}

/// Wrap a coordinate onto `[0, dimension)`
#[inline]
pub fn wrap(coordinate: i32, dimension: i32) -> i32 {
    coordinate.rem_euclid(dimension)
}

/// Fixed tick duration derived from [`consts::TICKS_PER_SECOND`]
#[inline]
pub fn tick_duration() -> std::time::Duration {
    std::time::Duration::from_secs(1) / consts::TICKS_PER_SECOND
}
