//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events
//! - Time/ticks
//! - Terminal drawing and keyboard (native only)

pub mod input;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;
pub mod time;

pub use input::{EventQueue, InputEvent, InputSource, Key, tick_input};
#[cfg(not(target_arch = "wasm32"))]
pub use terminal::{Terminal, play};
pub use time::{FixedStep, Ticker};
